//! External storage collaborators.
//!
//! The service never owns persistence: resume records live in a key-value store and
//! uploaded files in blob storage. Both sit behind traits so handlers and the upload
//! pipeline take them as injected `Arc<dyn …>` dependencies.

pub mod redis_kv;
pub mod s3_blobs;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

pub use redis_kv::RedisKv;
pub use s3_blobs::S3BlobStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Key-value store error: {0}")]
    Kv(#[from] redis::RedisError),

    #[error("Blob storage error: {0}")]
    Blob(String),

    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One entry returned by [`KvStore::list`]. `value` is `None` when values were not requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KvItem {
    pub key: String,
    pub value: Option<String>,
}

/// A file on its way into blob storage.
#[derive(Debug, Clone)]
pub struct BlobFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Location of a stored blob, used later to read it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlobRef {
    pub path: String,
}

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Lists keys matching a glob `pattern` (e.g. `resume_*`), sorted by key.
    async fn list(&self, pattern: &str, include_values: bool)
        -> Result<Vec<KvItem>, StorageError>;
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, file: BlobFile) -> Result<BlobRef, StorageError>;

    /// Returns `None` when nothing is stored at `path`.
    async fn read(&self, path: &str) -> Result<Option<Bytes>, StorageError>;

    async fn exists(&self, path: &str) -> Result<bool, StorageError>;
}
