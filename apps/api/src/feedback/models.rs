use serde::Serialize;

/// Whether a tip praises something or asks for a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TipKind {
    Good,
    #[default]
    Improve,
}

impl TipKind {
    /// Only the literal `good` tag is a strength; anything else renders as an improvement.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("good") => TipKind::Good,
            _ => TipKind::Improve,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tip {
    #[serde(rename = "type")]
    pub kind: TipKind,
    pub tip: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtsSuggestion {
    #[serde(rename = "type")]
    pub kind: TipKind,
    pub tip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryFeedback {
    pub score: i64,
    pub tips: Vec<Tip>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AtsFeedback {
    pub score: i64,
    pub tips: Vec<AtsSuggestion>,
}

/// Fully defaulted feedback for one resume. Field names match the stored JSON
/// so a serialized record normalizes back to itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub overall_score: i64,
    #[serde(rename = "ATS")]
    pub ats: AtsFeedback,
    pub tone_and_style: CategoryFeedback,
    pub content: CategoryFeedback,
    pub structure: CategoryFeedback,
    pub skills: CategoryFeedback,
}

impl FeedbackRecord {
    pub fn category(&self, category: Category) -> &CategoryFeedback {
        match category {
            Category::ToneAndStyle => &self.tone_and_style,
            Category::Content => &self.content,
            Category::Structure => &self.structure,
            Category::Skills => &self.skills,
        }
    }
}

/// The four scored resume categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    ToneAndStyle,
    Content,
    Structure,
    Skills,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::ToneAndStyle,
        Category::Content,
        Category::Structure,
        Category::Skills,
    ];

    /// Key of the category in the raw feedback JSON.
    pub fn key(self) -> &'static str {
        match self {
            Category::ToneAndStyle => "toneAndStyle",
            Category::Content => "content",
            Category::Structure => "structure",
            Category::Skills => "skills",
        }
    }

    pub fn summary_title(self) -> &'static str {
        match self {
            Category::ToneAndStyle => "Tone and Style",
            Category::Content => "Content",
            Category::Structure => "Structure",
            Category::Skills => "Skills",
        }
    }

    pub fn detail_title(self) -> &'static str {
        match self {
            Category::ToneAndStyle => "Tone & Style",
            other => other.summary_title(),
        }
    }

    pub fn section_id(self) -> &'static str {
        match self {
            Category::ToneAndStyle => "tone-style",
            Category::Content => "content",
            Category::Structure => "structure",
            Category::Skills => "skills",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_good_tag_is_good() {
        assert_eq!(TipKind::from_tag(Some("good")), TipKind::Good);
        assert_eq!(TipKind::from_tag(Some("improve")), TipKind::Improve);
        assert_eq!(TipKind::from_tag(Some("GOOD")), TipKind::Improve);
        assert_eq!(TipKind::from_tag(None), TipKind::Improve);
    }

    #[test]
    fn test_serialized_field_names_match_stored_shape() {
        let value = serde_json::to_value(FeedbackRecord::default()).unwrap();
        assert!(value.get("overallScore").is_some());
        assert!(value.get("toneAndStyle").is_some());
        assert!(value["ATS"]["tips"].is_array());
    }

    #[test]
    fn test_category_lookup_follows_display_order() {
        let record = FeedbackRecord {
            structure: CategoryFeedback {
                score: 12,
                tips: vec![],
            },
            ..Default::default()
        };
        let scores: Vec<i64> = Category::ALL
            .iter()
            .map(|c| record.category(*c).score)
            .collect();
        assert_eq!(scores, vec![0, 0, 12, 0]);
    }
}
