//! AI feedback service. The upload pipeline calls this seam to get resume feedback.
//!
//! Default: `ClaudeFeedback`, which reads the stored resume image and sends it to
//! Claude together with the feedback instructions.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{strip_json_fences, LlmClient, LlmError};
use crate::storage::BlobStore;

/// Response of the feedback service: `message.content` is either plain text or a
/// sequence of blocks whose first `text` is the feedback payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiResponse {
    pub message: AiMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiMessage {
    pub content: AiContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AiContent {
    Text(String),
    Blocks(Vec<AiContentBlock>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiContentBlock {
    #[serde(default)]
    pub text: Option<String>,
}

impl AiResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            message: AiMessage {
                content: AiContent::Text(text.into()),
            },
        }
    }

    /// The feedback payload: the text itself, or the first block's text.
    pub fn feedback_text(&self) -> Option<&str> {
        match &self.message.content {
            AiContent::Text(text) => Some(text.as_str()),
            AiContent::Blocks(blocks) => blocks.first().and_then(|b| b.text.as_deref()),
        }
    }
}

/// Produces feedback for a stored resume image. `Ok(None)` means the service
/// returned nothing usable.
#[async_trait]
pub trait FeedbackService: Send + Sync {
    async fn feedback(
        &self,
        image_path: &str,
        instructions: &str,
    ) -> Result<Option<AiResponse>, LlmError>;
}

pub struct ClaudeFeedback {
    llm: LlmClient,
    blobs: Arc<dyn BlobStore>,
}

impl ClaudeFeedback {
    pub fn new(llm: LlmClient, blobs: Arc<dyn BlobStore>) -> Self {
        Self { llm, blobs }
    }
}

#[async_trait]
impl FeedbackService for ClaudeFeedback {
    async fn feedback(
        &self,
        image_path: &str,
        instructions: &str,
    ) -> Result<Option<AiResponse>, LlmError> {
        let image = self
            .blobs
            .read(image_path)
            .await
            .map_err(|e| LlmError::Image(e.to_string()))?;
        let Some(image) = image else {
            warn!("Resume image {image_path} not found, skipping analysis");
            return Ok(None);
        };

        let response = self
            .llm
            .call_with_image(instructions, JSON_ONLY_SYSTEM, "image/png", &image)
            .await?;

        Ok(response
            .text()
            .map(|text| AiResponse::from_text(strip_json_fences(text))))
    }
}
