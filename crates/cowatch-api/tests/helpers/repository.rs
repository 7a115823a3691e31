//! Repository wrapper with switchable failures.

use async_trait::async_trait;
use cowatch_core::{AppError, NewVideoRecord, VideoRecord};
use cowatch_db::{InMemoryVideoRepository, VideoRepositoryTrait};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
pub struct FlakyRepository {
    pub inner: InMemoryVideoRepository,
    pub fail_create: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_list: AtomicBool,
}

impl FlakyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

fn injected(operation: &str) -> AppError {
    AppError::Internal(format!("injected {} failure", operation))
}

#[async_trait]
impl VideoRepositoryTrait for FlakyRepository {
    async fn create(&self, video: NewVideoRecord) -> Result<VideoRecord, AppError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(injected("create"));
        }
        self.inner.create(video).await
    }

    async fn list_all(&self) -> Result<Vec<VideoRecord>, AppError> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(injected("list"));
        }
        self.inner.list_all().await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<VideoRecord>, AppError> {
        self.inner.get_by_id(id).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(injected("delete"));
        }
        self.inner.delete_by_id(id).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.inner.ping().await
    }

    fn backend_name(&self) -> &'static str {
        "flaky-memory"
    }
}
