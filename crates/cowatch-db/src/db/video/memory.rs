//! Process-local video repository.
//!
//! Mirrors the PostgreSQL semantics: monotonically increasing ids starting at 1,
//! unique storage keys, creation-order listing.

use super::repository::VideoRepositoryTrait;
use chrono::Utc;
use cowatch_core::{AppError, NewVideoRecord, VideoRecord};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    next_id: i64,
    rows: BTreeMap<i64, VideoRecord>,
}

#[derive(Default)]
pub struct InMemoryVideoRepository {
    inner: Mutex<Inner>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, AppError> {
        self.inner
            .lock()
            .map_err(|_| AppError::Internal("video repository lock poisoned".to_string()))
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl VideoRepositoryTrait for InMemoryVideoRepository {
    async fn create(&self, video: NewVideoRecord) -> Result<VideoRecord, AppError> {
        let mut inner = self.lock()?;

        if let Some(key) = video.storage_key.as_deref() {
            if inner
                .rows
                .values()
                .any(|row| row.storage_key.as_deref() == Some(key))
            {
                return Err(AppError::MetadataWrite(format!(
                    "storage_key {} already recorded",
                    key
                )));
            }
        }

        inner.next_id += 1;
        let record = VideoRecord {
            id: inner.next_id,
            title: video.title,
            filename: video.filename,
            storage_key: video.storage_key,
            storage_url: video.storage_url,
            content_type: video.content_type,
            file_size: video.file_size,
            created_at: Utc::now(),
        };
        inner.rows.insert(record.id, record.clone());

        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<VideoRecord>, AppError> {
        let inner = self.lock()?;
        let mut records: Vec<VideoRecord> = inner.rows.values().cloned().collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<VideoRecord>, AppError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.lock()?.rows.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.lock().map(|_| ())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
