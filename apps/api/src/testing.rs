//! In-memory collaborators for tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::auth::TokenAuthenticator;
use crate::convert::{ConversionError, PdfConverter};
use crate::llm_client::feedback::{AiContent, AiContentBlock, AiMessage, AiResponse, FeedbackService};
use crate::llm_client::LlmError;
use crate::review::pipeline::ReviewPipeline;
use crate::state::AppState;
use crate::storage::{BlobFile, BlobRef, BlobStore, KvItem, KvStore, StorageError};

pub const TEST_TOKEN: &str = "test-token";

pub fn pdf_file(name: &str) -> BlobFile {
    BlobFile {
        name: name.to_string(),
        content_type: "application/pdf".to_string(),
        bytes: Bytes::from_static(b"%PDF-1.4 test"),
    }
}

/// Glob match supporting only `*`, which is all the key patterns use.
fn glob_match(pattern: &str, key: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == key;
    }
    let (first, last) = (parts[0], parts[parts.len() - 1]);
    if !key.starts_with(first) || key.len() < first.len() + last.len() || !key.ends_with(last) {
        return false;
    }
    let mut rest = &key[first.len()..key.len() - last.len()];
    for middle in &parts[1..parts.len() - 1] {
        match rest.find(middle) {
            Some(i) => rest = &rest[i + middle.len()..],
            None => return false,
        }
    }
    true
}

/// Key-value store kept in memory. A store built with `rejecting_writes` fails every `set`.
#[derive(Default)]
pub struct MemoryKv {
    entries: Mutex<BTreeMap<String, String>>,
    reject_writes: bool,
}

impl MemoryKv {
    pub fn rejecting_writes() -> Self {
        Self {
            reject_writes: true,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.reject_writes {
            let error = redis::RedisError::from((redis::ErrorKind::IoError, "kv unavailable"));
            return Err(error.into());
        }
        self.insert(key, value);
        Ok(())
    }

    async fn list(
        &self,
        pattern: &str,
        include_values: bool,
    ) -> Result<Vec<KvItem>, StorageError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, _)| glob_match(pattern, key))
            .map(|(key, value)| KvItem {
                key: key.clone(),
                value: include_values.then(|| value.clone()),
            })
            .collect())
    }
}

/// Blob store that keeps files in memory. Uploads whose name ends with the
/// rejected suffix fail.
#[derive(Default)]
pub struct MemoryBlobs {
    blobs: Mutex<HashMap<String, Bytes>>,
    reject_suffix: Option<String>,
}

impl MemoryBlobs {
    pub fn rejecting(suffix: &str) -> Self {
        Self {
            reject_suffix: Some(suffix.to_string()),
            ..Default::default()
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(path)
    }

    pub fn insert(&self, path: &str, bytes: &'static [u8]) {
        self.blobs
            .lock()
            .unwrap()
            .insert(path.to_string(), Bytes::from_static(bytes));
    }
}

#[async_trait]
impl BlobStore for MemoryBlobs {
    async fn upload(&self, file: BlobFile) -> Result<BlobRef, StorageError> {
        if let Some(suffix) = &self.reject_suffix {
            if file.name.ends_with(suffix.as_str()) {
                return Err(StorageError::Blob(format!("rejected {}", file.name)));
            }
        }
        let mut blobs = self.blobs.lock().unwrap();
        let path = format!("uploads/{}/{}", blobs.len(), file.name);
        blobs.insert(path.clone(), file.bytes);
        Ok(BlobRef { path })
    }

    async fn read(&self, path: &str) -> Result<Option<Bytes>, StorageError> {
        Ok(self.blobs.lock().unwrap().get(path).cloned())
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        Ok(self.contains(path))
    }
}

pub struct StaticConverter {
    error: Mutex<Option<ConversionError>>,
}

impl StaticConverter {
    pub fn ok() -> Self {
        Self {
            error: Mutex::new(None),
        }
    }

    pub fn failing(error: ConversionError) -> Self {
        Self {
            error: Mutex::new(Some(error)),
        }
    }
}

#[async_trait]
impl PdfConverter for StaticConverter {
    async fn convert(&self, pdf: &BlobFile) -> Result<BlobFile, ConversionError> {
        if let Some(error) = self.error.lock().unwrap().take() {
            return Err(error);
        }
        Ok(BlobFile {
            name: pdf.name.replace(".pdf", ".png"),
            content_type: "image/png".to_string(),
            bytes: Bytes::from_static(b"\x89PNG test"),
        })
    }
}

enum StaticReply {
    Respond(AiResponse),
    Nothing,
    Error,
}

/// Feedback service with a canned reply that counts how often it was asked.
pub struct StaticAi {
    reply: StaticReply,
    calls: AtomicUsize,
}

impl StaticAi {
    fn replying(reply: StaticReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn text(text: &str) -> Self {
        Self::replying(StaticReply::Respond(AiResponse::from_text(text)))
    }

    pub fn blocks(texts: &[&str]) -> Self {
        Self::replying(StaticReply::Respond(AiResponse {
            message: AiMessage {
                content: AiContent::Blocks(
                    texts
                        .iter()
                        .map(|t| AiContentBlock {
                            text: Some(t.to_string()),
                        })
                        .collect(),
                ),
            },
        }))
    }

    pub fn nothing() -> Self {
        Self::replying(StaticReply::Nothing)
    }

    pub fn error() -> Self {
        Self::replying(StaticReply::Error)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedbackService for StaticAi {
    async fn feedback(
        &self,
        _image_path: &str,
        _instructions: &str,
    ) -> Result<Option<AiResponse>, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            StaticReply::Respond(response) => Ok(Some(response.clone())),
            StaticReply::Nothing => Ok(None),
            StaticReply::Error => Err(LlmError::RateLimited { retries: 3 }),
        }
    }
}

pub struct TestApp {
    pub state: AppState,
    pub kv: Arc<MemoryKv>,
    pub blobs: Arc<MemoryBlobs>,
}

/// App state wired to in-memory collaborators, authenticated by [`TEST_TOKEN`].
pub fn test_app(ai: StaticAi) -> TestApp {
    let kv = Arc::new(MemoryKv::default());
    let blobs = Arc::new(MemoryBlobs::default());
    let pipeline = ReviewPipeline::new(
        kv.clone(),
        blobs.clone(),
        Arc::new(StaticConverter::ok()),
        Arc::new(ai),
    );
    let state = AppState {
        kv: kv.clone(),
        blobs: blobs.clone(),
        pipeline,
        auth: Arc::new(TokenAuthenticator::new(TEST_TOKEN.to_string())),
    };
    TestApp { state, kv, blobs }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_match() {
        assert!(glob_match("resume_*", "resume_abc"));
        assert!(glob_match("resume_*", "resume_"));
        assert!(!glob_match("resume_*", "session_abc"));
        assert!(glob_match("a*c*e", "abcde"));
        assert!(!glob_match("a*c*e", "abde"));
        assert!(glob_match("exact", "exact"));
    }
}
