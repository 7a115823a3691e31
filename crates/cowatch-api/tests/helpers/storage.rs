//! Storage wrapper with switchable failures.

use async_trait::async_trait;
use bytes::Bytes;
use cowatch_storage::{ByteStream, Storage, StorageBackend, StorageError, StorageResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub struct FlakyStorage {
    inner: Arc<dyn Storage>,
    pub fail_put: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_presign: AtomicBool,
    /// Pretend every blob is missing when `exists` is asked.
    pub report_missing: AtomicBool,
    pub puts: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl FlakyStorage {
    pub fn new(inner: Arc<dyn Storage>) -> Self {
        Self {
            inner,
            fail_put: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            fail_presign: AtomicBool::new(false),
            report_missing: AtomicBool::new(false),
            puts: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Whether the wrapped backend still holds `key`.
    pub async fn holds(&self, key: &str) -> bool {
        self.inner.exists(key).await.unwrap_or(false)
    }
}

#[async_trait]
impl Storage for FlakyStorage {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
        size_hint: Option<u64>,
    ) -> StorageResult<String> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("injected put failure".to_string()));
        }
        self.inner.put(key, data, content_type, size_hint).await
    }

    async fn presigned_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        if self.fail_presign.load(Ordering::SeqCst) {
            return Err(StorageError::BackendError(
                "injected presign failure".to_string(),
            ));
        }
        self.inner.presigned_url(key, expires_in).await
    }

    async fn download_stream(&self, key: &str) -> StorageResult<ByteStream> {
        self.inner.download_stream(key).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed(
                "injected delete failure".to_string(),
            ));
        }
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        if self.report_missing.load(Ordering::SeqCst) {
            return Ok(false);
        }
        self.inner.exists(key).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}
