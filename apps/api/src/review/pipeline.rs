//! Upload → analysis pipeline.
//!
//! Strictly sequential: upload PDF → convert to image → upload image → persist record →
//! request AI feedback → persist record. The first failing step ends the run and its
//! message becomes the final status. Nothing is retried here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::convert::{ConversionError, PdfConverter};
use crate::feedback::prompts::prepare_instructions;
use crate::llm_client::feedback::{AiResponse, FeedbackService};
use crate::models::resume::ResumeRecord;
use crate::storage::{BlobFile, BlobStore, KvStore, StorageError};
use crate::utils::format_size;

pub const STATUS_STARTED: &str = "Analyzing your resume...";
pub const STATUS_CONVERTING: &str = "Converting to image....";
pub const STATUS_UPLOADING_IMAGE: &str = "Uploading the image...";
pub const STATUS_PREPARING: &str = "Preparing data...";
pub const STATUS_ANALYZING: &str = "Analyzing....";
pub const STATUS_COMPLETE: &str = "Analysis complete! redirecting...";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No file selected.")]
    NoFile,

    #[error("Failed to upload file.")]
    FileUpload(#[source] StorageError),

    #[error("{0}")]
    Conversion(#[from] ConversionError),

    #[error("Failed to upload image.")]
    ImageUpload(#[source] StorageError),

    #[error("Failed to save resume record.")]
    Persist(#[source] StorageError),

    #[error("Error: Failed to analyse resume.")]
    Analysis { resume_id: Uuid },
}

impl PipelineError {
    /// Id of the record written before the failure, if the run got that far.
    pub fn resume_id(&self) -> Option<Uuid> {
        match self {
            PipelineError::Analysis { resume_id } => Some(*resume_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

/// Progress messages of one upload session, oldest first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusLog {
    entries: Vec<StatusEntry>,
}

impl StatusLog {
    pub fn set(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("Upload status: {message}");
        self.entries.push(StatusEntry {
            at: Utc::now(),
            message,
        });
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.last().map(|e| e.message.as_str())
    }

    pub fn entries(&self) -> &[StatusEntry] {
        &self.entries
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalyseRequest {
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    pub file: Option<BlobFile>,
}

/// The upload pipeline with its collaborators injected.
#[derive(Clone)]
pub struct ReviewPipeline {
    kv: Arc<dyn KvStore>,
    blobs: Arc<dyn BlobStore>,
    converter: Arc<dyn PdfConverter>,
    ai: Arc<dyn FeedbackService>,
}

impl ReviewPipeline {
    pub fn new(
        kv: Arc<dyn KvStore>,
        blobs: Arc<dyn BlobStore>,
        converter: Arc<dyn PdfConverter>,
        ai: Arc<dyn FeedbackService>,
    ) -> Self {
        Self {
            kv,
            blobs,
            converter,
            ai,
        }
    }

    /// Runs the pipeline, recording progress in `status`. On failure the error's
    /// message is the last status entry.
    pub async fn analyse(
        &self,
        request: AnalyseRequest,
        status: &mut StatusLog,
    ) -> Result<Uuid, PipelineError> {
        status.set(STATUS_STARTED);
        let result = self.run(request, status).await;
        if let Err(e) = &result {
            status.set(e.to_string());
        }
        result
    }

    async fn run(
        &self,
        request: AnalyseRequest,
        status: &mut StatusLog,
    ) -> Result<Uuid, PipelineError> {
        let file = request.file.ok_or(PipelineError::NoFile)?;
        info!(
            "Uploading {} ({})",
            file.name,
            format_size(file.bytes.len() as u64)
        );
        let uploaded_file = self
            .blobs
            .upload(file.clone())
            .await
            .map_err(PipelineError::FileUpload)?;

        status.set(STATUS_CONVERTING);
        let image = self.converter.convert(&file).await?;

        status.set(STATUS_UPLOADING_IMAGE);
        let uploaded_image = self
            .blobs
            .upload(image)
            .await
            .map_err(PipelineError::ImageUpload)?;

        status.set(STATUS_PREPARING);
        let id = Uuid::new_v4();
        let mut record = ResumeRecord::new(
            id,
            uploaded_file.path,
            uploaded_image.path,
            request.company_name,
            request.job_title,
            request.job_description,
        );
        self.persist(&record).await?;

        status.set(STATUS_ANALYZING);
        let instructions = prepare_instructions(&record.job_title, &record.job_description);
        let response = match self
            .ai
            .feedback(&record.resume_image_url, &instructions)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Feedback request for resume {id} failed: {e}");
                None
            }
        };
        let text = response
            .as_ref()
            .and_then(AiResponse::feedback_text)
            .ok_or(PipelineError::Analysis { resume_id: id })?;

        record.set_feedback_text(text);
        self.persist(&record).await?;

        status.set(STATUS_COMPLETE);
        Ok(id)
    }

    async fn persist(&self, record: &ResumeRecord) -> Result<(), PipelineError> {
        let body = serde_json::to_string(record)
            .map_err(|e| PipelineError::Persist(e.into()))?;
        self.kv
            .set(&record.key(), &body)
            .await
            .map_err(PipelineError::Persist)
    }
}
