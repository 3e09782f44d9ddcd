//! Feedback normalization.
//!
//! Stored feedback arrives as a structured value, a JSON string, or a JSON string that
//! was itself JSON-encoded again on the way into the store. Normalization unwraps at
//! most two string layers and then projects whatever it finds onto a fully defaulted
//! `FeedbackRecord`.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::feedback::models::{
    AtsFeedback, AtsSuggestion, Category, CategoryFeedback, FeedbackRecord, Tip, TipKind,
};

/// Upper bound on string layers decoded before projection.
pub const MAX_ENCODING_LAYERS: usize = 2;

#[derive(Debug, Error)]
#[error("feedback is not valid JSON at encoding layer {layer}: {source}")]
pub struct ParseError {
    pub layer: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Decodes string layers until a non-string appears or the layer bound is hit.
/// A value that is still a string after `MAX_ENCODING_LAYERS` is returned as-is.
pub fn unwrap_encoding(raw: &Value) -> Result<Value, ParseError> {
    let mut current = raw.clone();
    for layer in 1..=MAX_ENCODING_LAYERS {
        let Value::String(text) = &current else {
            break;
        };
        current = serde_json::from_str(text).map_err(|source| ParseError { layer, source })?;
    }
    Ok(current)
}

/// Normalizes raw stored feedback. Absent input yields the all-zero record.
pub fn normalize(raw: Option<&Value>) -> Result<FeedbackRecord, ParseError> {
    let Some(raw) = raw else {
        return Ok(FeedbackRecord::default());
    };
    let decoded = unwrap_encoding(raw)?;
    Ok(project(&decoded))
}

/// Like [`normalize`], but logs decode failures and falls back to the default record.
pub fn normalize_or_default(raw: Option<&Value>) -> FeedbackRecord {
    normalize(raw).unwrap_or_else(|e| {
        warn!("Failed to parse feedback: {e}");
        FeedbackRecord::default()
    })
}

fn project(value: &Value) -> FeedbackRecord {
    let category = |c: Category| read_category(value.get(c.key()));
    FeedbackRecord {
        overall_score: read_score(value.get("overallScore")),
        ats: read_ats(value.get("ATS")),
        tone_and_style: category(Category::ToneAndStyle),
        content: category(Category::Content),
        structure: category(Category::Structure),
        skills: category(Category::Skills),
    }
}

fn read_score(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or(0),
        _ => 0,
    }
}

fn read_category(value: Option<&Value>) -> CategoryFeedback {
    let Some(value) = value else {
        return CategoryFeedback::default();
    };
    CategoryFeedback {
        score: read_score(value.get("score")),
        tips: read_array(value.get("tips"), read_tip),
    }
}

fn read_ats(value: Option<&Value>) -> AtsFeedback {
    let Some(value) = value else {
        return AtsFeedback::default();
    };
    let suggestions = value
        .get("tips")
        .filter(|v| v.is_array())
        .or_else(|| value.get("suggestions"));
    AtsFeedback {
        score: read_score(value.get("score")),
        tips: read_array(suggestions, read_suggestion),
    }
}

fn read_array<T>(value: Option<&Value>, read: impl Fn(&Value) -> Option<T>) -> Vec<T> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(read).collect())
        .unwrap_or_default()
}

fn read_tip(value: &Value) -> Option<Tip> {
    let obj = value.as_object()?;
    Some(Tip {
        kind: TipKind::from_tag(obj.get("type").and_then(Value::as_str)),
        tip: read_text(obj.get("tip")),
        explanation: read_text(obj.get("explanation")),
    })
}

fn read_suggestion(value: &Value) -> Option<AtsSuggestion> {
    let obj = value.as_object()?;
    Some(AtsSuggestion {
        kind: TipKind::from_tag(obj.get("type").and_then(Value::as_str)),
        tip: read_text(obj.get("tip")),
    })
}

fn read_text(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_default()
}
