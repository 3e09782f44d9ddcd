//! Render-ready view models built from a `FeedbackRecord`.
//!
//! Every builder here is a pure function of its input: no I/O, no mutation of the record.

use serde::Serialize;
use uuid::Uuid;

use crate::feedback::classify::{classify, ScoreView, Tier};
use crate::feedback::models::{AtsFeedback, Category, FeedbackRecord, Tip, TipKind};
use crate::models::resume::ResumeRecord;
use crate::utils::join_classes;

const BADGE_BASE_CLASS: &str = "px-2 py-1 rounded-full text-xs font-medium";
const DETAIL_BADGE_BASE_CLASS: &str = "flex items-center gap-2 px-3 py-1 rounded-full";
const TIP_CHIP_BASE_CLASS: &str = "flex items-start gap-3 p-3 rounded-lg";
const EXPLANATION_BASE_CLASS: &str = "p-4 rounded-lg border-l-4";
const NO_TIPS_MESSAGE: &str = "No tips available for this category.";
const FALLBACK_CARD_TITLE: &str = "Resume";

fn tip_icon(kind: TipKind) -> &'static str {
    match kind {
        TipKind::Good => "/icons/check.svg",
        TipKind::Improve => "/icons/warning.svg",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Score badge
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBadgeView {
    pub tier: Tier,
    pub label: &'static str,
    pub class: String,
}

pub fn score_badge(score: i64) -> ScoreBadgeView {
    let c = classify(score, ScoreView::Badge);
    ScoreBadgeView {
        tier: c.tier,
        label: c.label.unwrap_or_default(),
        class: join_classes(&[BADGE_BASE_CLASS, c.color]),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Summary
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCategoryView {
    pub title: &'static str,
    pub score: i64,
    pub badge: ScoreBadgeView,
    pub score_class: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub overall_score: i64,
    pub categories: Vec<SummaryCategoryView>,
}

pub fn summary_view(record: &FeedbackRecord) -> SummaryView {
    let categories = Category::ALL
        .iter()
        .map(|&category| {
            let score = record.category(category).score;
            SummaryCategoryView {
                title: category.summary_title(),
                score,
                badge: score_badge(score),
                score_class: classify(score, ScoreView::SummaryText).color,
            }
        })
        .collect();

    SummaryView {
        overall_score: record.overall_score,
        categories,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ATS panel
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtsSuggestionView {
    pub kind: TipKind,
    pub icon: &'static str,
    pub tip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtsPanelView {
    pub score: i64,
    pub tier: Tier,
    pub gradient: &'static str,
    pub icon: &'static str,
    pub headline: &'static str,
    pub suggestions: Vec<AtsSuggestionView>,
}

pub fn ats_view(ats: &AtsFeedback) -> AtsPanelView {
    let c = classify(ats.score, ScoreView::Ats);
    AtsPanelView {
        score: ats.score,
        tier: c.tier,
        gradient: c.color,
        icon: c.icon.unwrap_or_default(),
        headline: c.label.unwrap_or_default(),
        suggestions: ats
            .tips
            .iter()
            .map(|s| AtsSuggestionView {
                kind: s.kind,
                icon: tip_icon(s.kind),
                tip: s.tip.clone(),
            })
            .collect(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Detail accordion
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailBadgeView {
    pub score: i64,
    pub tier: Tier,
    pub icon: &'static str,
    pub class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TipView {
    pub kind: TipKind,
    pub tip: String,
    pub explanation: String,
    pub icon: &'static str,
    pub chip_class: String,
    pub emphasis: &'static str,
    pub emphasis_class: &'static str,
    pub explanation_class: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailSectionView {
    pub id: &'static str,
    pub title: &'static str,
    pub badge: DetailBadgeView,
    pub tips: Vec<TipView>,
    pub empty_message: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsView {
    pub sections: Vec<DetailSectionView>,
}

fn detail_badge(score: i64) -> DetailBadgeView {
    let c = classify(score, ScoreView::Detail);
    DetailBadgeView {
        score,
        tier: c.tier,
        icon: c.icon.unwrap_or_default(),
        class: join_classes(&[DETAIL_BADGE_BASE_CLASS, c.color]),
    }
}

fn tip_view(tip: &Tip) -> TipView {
    let (chip_bg, emphasis, emphasis_class, explanation_colors) = match tip.kind {
        TipKind::Good => (
            "bg-green-50",
            "Strength",
            "text-green-700",
            "bg-green-50 border-green-500",
        ),
        TipKind::Improve => (
            "bg-yellow-50",
            "Improvement Needed",
            "text-amber-700",
            "bg-amber-50 border-amber-500",
        ),
    };
    TipView {
        kind: tip.kind,
        tip: tip.tip.clone(),
        explanation: tip.explanation.clone(),
        icon: tip_icon(tip.kind),
        chip_class: join_classes(&[TIP_CHIP_BASE_CLASS, chip_bg]),
        emphasis,
        emphasis_class,
        explanation_class: join_classes(&[EXPLANATION_BASE_CLASS, explanation_colors]),
    }
}

pub fn details_view(record: &FeedbackRecord) -> DetailsView {
    let sections = Category::ALL
        .iter()
        .map(|&category| {
            let feedback = record.category(category);
            DetailSectionView {
                id: category.section_id(),
                title: category.detail_title(),
                badge: detail_badge(feedback.score),
                tips: feedback.tips.iter().map(tip_view).collect(),
                empty_message: feedback.tips.is_empty().then_some(NO_TIPS_MESSAGE),
            }
        })
        .collect();
    DetailsView { sections }
}

// ────────────────────────────────────────────────────────────────────────────
// Combined review panels and resume cards
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackPanels {
    pub summary: SummaryView,
    pub ats: AtsPanelView,
    pub details: DetailsView,
}

pub fn feedback_panels(record: &FeedbackRecord) -> FeedbackPanels {
    FeedbackPanels {
        summary: summary_view(record),
        ats: ats_view(&record.ats),
        details: details_view(record),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeCardView {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub overall_score: i64,
    pub image_path: String,
}

/// Card for the resume list. The title prefers the company, then the job title.
pub fn resume_card(resume: &ResumeRecord, feedback: Option<&FeedbackRecord>) -> ResumeCardView {
    let company = resume.company_name.trim();
    let job_title = resume.job_title.trim();
    let (title, subtitle) = match (company.is_empty(), job_title.is_empty()) {
        (false, false) => (company.to_string(), Some(job_title.to_string())),
        (false, true) => (company.to_string(), None),
        (true, false) => (job_title.to_string(), None),
        (true, true) => (FALLBACK_CARD_TITLE.to_string(), None),
    };

    ResumeCardView {
        id: resume.id,
        title,
        subtitle,
        overall_score: feedback.map(|f| f.overall_score).unwrap_or(0),
        image_path: format!("/api/v1/resumes/{}/image", resume.id),
    }
}
