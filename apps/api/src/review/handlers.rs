//! Axum route handlers for the Review API.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::normalize::normalize_or_default;
use crate::feedback::views::{feedback_panels, resume_card, FeedbackPanels, ResumeCardView};
use crate::models::resume::{resume_key, ResumeRecord, RESUME_KEY_PATTERN};
use crate::review::pipeline::{AnalyseRequest, PipelineError, StatusEntry, StatusLog};
use crate::state::AppState;
use crate::storage::BlobFile;

/// Request body cap for resume uploads.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: Option<Uuid>,
    pub completed: bool,
    pub status: String,
    pub trail: Vec<StatusEntry>,
}

/// Review page state. `Loading` covers records that do not exist (yet).
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReviewView {
    Loading,
    Ready {
        id: Uuid,
        company_name: String,
        job_title: String,
        job_description: String,
        resume_path: String,
        image_path: String,
        /// `None` while analysis is still pending.
        feedback: Option<FeedbackPanels>,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/resumes
///
/// Lists every stored resume as a card. Records that fail to decode are skipped.
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeCardView>>, AppError> {
    let items = state.kv.list(RESUME_KEY_PATTERN, true).await?;

    let cards = items
        .iter()
        .filter_map(|item| {
            let value = item.value.as_deref()?;
            match serde_json::from_str::<ResumeRecord>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping unreadable record {}: {e}", item.key);
                    None
                }
            }
        })
        .map(|record| {
            let feedback = record
                .raw_feedback()
                .map(|raw| normalize_or_default(Some(raw)));
            resume_card(&record, feedback.as_ref())
        })
        .collect::<Vec<_>>();

    debug!("Listed {} resumes", cards.len());
    Ok(Json(cards))
}

/// POST /api/v1/resumes
///
/// Multipart form: `company-name`, `job-title`, `job-description`, `file` (PDF).
/// Runs the full upload → analysis pipeline and reports its status trail.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let request = read_upload_form(multipart).await?;

    let mut status = StatusLog::default();
    let result = state.pipeline.analyse(request, &mut status).await;

    let (code, id) = match &result {
        Ok(id) => (StatusCode::CREATED, Some(*id)),
        Err(PipelineError::NoFile) => (StatusCode::BAD_REQUEST, None),
        Err(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.resume_id()),
    };

    Ok((
        code,
        Json(UploadResponse {
            id,
            completed: result.is_ok(),
            status: status.current().unwrap_or_default().to_string(),
            trail: status.entries().to_vec(),
        }),
    ))
}

/// GET /api/v1/resumes/:id
///
/// Review view. Unknown ids, unreadable records and records whose PDF or image
/// is not stored yet render as `loading`; undecodable feedback renders as the
/// all-zero record.
pub async fn handle_get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewView>, AppError> {
    let Some(record) = load_record(&state, id).await? else {
        return Ok(Json(ReviewView::Loading));
    };

    for blob in [ResumeBlob::File, ResumeBlob::Image] {
        if !state.blobs.exists(blob.path(&record)).await? {
            debug!("Resume {id} is missing its {blob:?} blob, still loading");
            return Ok(Json(ReviewView::Loading));
        }
    }

    let feedback = record
        .raw_feedback()
        .map(|raw| feedback_panels(&normalize_or_default(Some(raw))));

    Ok(Json(ReviewView::Ready {
        id: record.id,
        resume_path: format!("/api/v1/resumes/{id}/file"),
        image_path: format!("/api/v1/resumes/{id}/image"),
        company_name: record.company_name,
        job_title: record.job_title,
        job_description: record.job_description,
        feedback,
    }))
}

/// GET /api/v1/resumes/:id/file
pub async fn handle_get_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    serve_blob(&state, id, ResumeBlob::File).await
}

/// GET /api/v1/resumes/:id/image
pub async fn handle_get_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    serve_blob(&state, id, ResumeBlob::Image).await
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum ResumeBlob {
    File,
    Image,
}

impl ResumeBlob {
    fn path(self, record: &ResumeRecord) -> &str {
        match self {
            ResumeBlob::File => &record.resume_file_url,
            ResumeBlob::Image => &record.resume_image_url,
        }
    }

    fn content_type(self) -> &'static str {
        match self {
            ResumeBlob::File => "application/pdf",
            ResumeBlob::Image => "image/png",
        }
    }
}

/// Blob bytes, or `202 {"state":"loading"}` while the record or blob is not stored.
async fn serve_blob(state: &AppState, id: Uuid, blob: ResumeBlob) -> Result<Response, AppError> {
    let Some(record) = load_record(state, id).await? else {
        return Ok(still_loading());
    };
    match state.blobs.read(blob.path(&record)).await? {
        Some(bytes) => Ok(([(header::CONTENT_TYPE, blob.content_type())], bytes).into_response()),
        None => {
            debug!("Resume {id} {blob:?} blob not available yet");
            Ok(still_loading())
        }
    }
}

fn still_loading() -> Response {
    (StatusCode::ACCEPTED, Json(ReviewView::Loading)).into_response()
}

async fn load_record(state: &AppState, id: Uuid) -> Result<Option<ResumeRecord>, AppError> {
    let Some(raw) = state.kv.get(&resume_key(id)).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(record) => Ok(Some(record)),
        Err(e) => {
            warn!("Resume {id} has an unreadable record: {e}");
            Ok(None)
        }
    }
}

async fn read_upload_form(mut multipart: Multipart) -> Result<AnalyseRequest, AppError> {
    let mut request = AnalyseRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "company-name" => request.company_name = field.text().await.map_err(invalid_form)?,
            "job-title" => request.job_title = field.text().await.map_err(invalid_form)?,
            "job-description" => {
                request.job_description = field.text().await.map_err(invalid_form)?
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/pdf")
                    .to_string();
                let bytes = field.bytes().await.map_err(invalid_form)?;
                if bytes.is_empty() {
                    continue;
                }
                if !is_pdf(&file_name, &content_type) {
                    return Err(AppError::Validation(format!(
                        "Only PDF resumes are accepted, got {content_type}"
                    )));
                }
                request.file = Some(BlobFile {
                    name: file_name,
                    content_type,
                    bytes,
                });
            }
            other => debug!("Ignoring form field {other}"),
        }
    }

    Ok(request)
}

fn invalid_form(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart body: {e}"))
}

fn is_pdf(file_name: &str, content_type: &str) -> bool {
    content_type == "application/pdf" || file_name.to_ascii_lowercase().ends_with(".pdf")
}
