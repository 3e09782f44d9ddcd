use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Key-value pattern matching every stored resume record.
pub const RESUME_KEY_PATTERN: &str = "resume_*";

pub fn resume_key(id: Uuid) -> String {
    format!("resume_{id}")
}

/// Resume record as persisted in the key-value store, one per upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub id: Uuid,
    pub resume_file_url: String,
    pub resume_image_url: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub job_description: String,
    /// `""` until analysis completes, then the model's text JSON-encoded once more.
    #[serde(default = "pending_feedback")]
    pub feedback: Value,
}

fn pending_feedback() -> Value {
    Value::String(String::new())
}

impl ResumeRecord {
    pub fn new(
        id: Uuid,
        resume_file_url: String,
        resume_image_url: String,
        company_name: String,
        job_title: String,
        job_description: String,
    ) -> Self {
        Self {
            id,
            resume_file_url,
            resume_image_url,
            company_name,
            job_title,
            job_description,
            feedback: pending_feedback(),
        }
    }

    pub fn key(&self) -> String {
        resume_key(self.id)
    }

    /// Stores the model's feedback text the way readers expect it: as a JSON string
    /// literal inside the record, so the record carries it double-encoded.
    pub fn set_feedback_text(&mut self, text: &str) {
        self.feedback = Value::String(Value::String(text.to_owned()).to_string());
    }

    /// Raw feedback to normalize, or `None` while analysis is still pending.
    pub fn raw_feedback(&self) -> Option<&Value> {
        match &self.feedback {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            other => Some(other),
        }
    }
}
