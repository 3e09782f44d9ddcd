use std::sync::Arc;

use crate::auth::Authenticator;
use crate::review::pipeline::ReviewPipeline;
use crate::storage::{BlobStore, KvStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub kv: Arc<dyn KvStore>,
    pub blobs: Arc<dyn BlobStore>,
    /// Upload pipeline, wired to the same stores plus the PDF converter and AI service.
    pub pipeline: ReviewPipeline,
    pub auth: Arc<dyn Authenticator>,
}
