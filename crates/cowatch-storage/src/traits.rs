//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked object body returned by [`Storage::download_stream`]
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait so the
/// lifecycle service can be handed any of them at construction time.
///
/// **Key format:** keys are bare object names; the backend adds its namespace
/// prefix. See the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `key` and return the canonical (non-presigned) URL.
    ///
    /// An existing object under the same key is overwritten. `size_hint` is the
    /// length the caller observed; backends may use it for logging or sanity checks.
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
        size_hint: Option<u64>,
    ) -> StorageResult<String>;

    /// Generate a time-limited URL granting GET access to the object
    ///
    /// Lets clients fetch (and seek within) the object without going through
    /// the application server.
    async fn presigned_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Download an object as a stream of chunks
    ///
    /// Returns `StorageError::NotFound` when no object exists under `key`.
    async fn download_stream(&self, key: &str) -> StorageResult<ByteStream>;

    /// Delete an object. Deleting a key that does not exist succeeds.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
