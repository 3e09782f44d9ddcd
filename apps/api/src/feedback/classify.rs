//! Score classification: maps a 0–100 score to a display tier and its tokens.
//!
//! Each view keeps its own threshold pair. The pairs differ slightly between views
//! and those differences are visible to users, so they are looked up per `ScoreView`
//! and never merged into one global policy.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Strong,
    Moderate,
    Weak,
}

/// Strict lower bounds: a score is strong above `strong_above`,
/// moderate above `moderate_above`, weak otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScorePolicy {
    pub strong_above: i64,
    pub moderate_above: i64,
}

impl ScorePolicy {
    pub fn tier(&self, score: i64) -> Tier {
        let score = clamp_score(score);
        if score > self.strong_above {
            Tier::Strong
        } else if score > self.moderate_above {
            Tier::Moderate
        } else {
            Tier::Weak
        }
    }
}

/// Category badge in the summary card.
pub const BADGE_POLICY: ScorePolicy = ScorePolicy {
    strong_above: 70,
    moderate_above: 49,
};

/// Score badge in the detail accordion headers.
pub const DETAIL_POLICY: ScorePolicy = ScorePolicy {
    strong_above: 69,
    moderate_above: 39,
};

/// ATS panel gradient, icon and headline.
pub const ATS_POLICY: ScorePolicy = ScorePolicy {
    strong_above: 69,
    moderate_above: 49,
};

/// Colour of the `NN/100` text beside each summary category (`>= 70`, `>= 49`).
pub const SUMMARY_TEXT_POLICY: ScorePolicy = ScorePolicy {
    strong_above: 69,
    moderate_above: 48,
};

/// The rendering context a score is classified for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreView {
    Badge,
    Detail,
    Ats,
    SummaryText,
}

impl ScoreView {
    pub fn policy(self) -> ScorePolicy {
        match self {
            ScoreView::Badge => BADGE_POLICY,
            ScoreView::Detail => DETAIL_POLICY,
            ScoreView::Ats => ATS_POLICY,
            ScoreView::SummaryText => SUMMARY_TEXT_POLICY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub tier: Tier,
    pub color: &'static str,
    pub icon: Option<&'static str>,
    pub label: Option<&'static str>,
}

pub fn clamp_score(score: i64) -> i64 {
    score.clamp(0, 100)
}

pub fn classify(score: i64, view: ScoreView) -> Classification {
    let tier = view.policy().tier(score);
    let (color, icon, label) = tokens(view, tier);
    Classification {
        tier,
        color,
        icon,
        label,
    }
}

type Tokens = (&'static str, Option<&'static str>, Option<&'static str>);

fn tokens(view: ScoreView, tier: Tier) -> Tokens {
    use Tier::*;
    match (view, tier) {
        (ScoreView::Badge, Strong) => ("bg-green-100 text-green-700", None, Some("Strong")),
        (ScoreView::Badge, Moderate) => ("bg-yellow-100 text-yellow-700", None, Some("Good Start")),
        (ScoreView::Badge, Weak) => ("bg-red-100 text-red-700", None, Some("Needs Work")),

        (ScoreView::Detail, Strong) => ("bg-green-100 text-green-700", Some("/icons/check.svg"), None),
        (ScoreView::Detail, Moderate) => ("bg-yellow-100 text-yellow-700", Some("/icons/warning.svg"), None),
        (ScoreView::Detail, Weak) => ("bg-red-100 text-red-700", Some("/icons/error.svg"), None),

        (ScoreView::Ats, Strong) => (
            "from-green-100",
            Some("/icons/ats-good.svg"),
            Some("Great ATS Compatibility!"),
        ),
        (ScoreView::Ats, Moderate) => (
            "from-yellow-100",
            Some("/icons/ats-warning.svg"),
            Some("Good Start, Room to Improve"),
        ),
        (ScoreView::Ats, Weak) => (
            "from-red-100",
            Some("/icons/ats-bad.svg"),
            Some("Needs Attention"),
        ),

        (ScoreView::SummaryText, Strong) => ("text-green-600", None, None),
        (ScoreView::SummaryText, Moderate) => ("text-yellow-600", None, None),
        (ScoreView::SummaryText, Weak) => ("text-red-500", None, None),
    }
}
