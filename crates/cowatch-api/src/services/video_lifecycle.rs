//! Video lifecycle: upload, list, stream and delete across the blob store and
//! the metadata store.
//!
//! The two stores are never updated transactionally. Uploads write the blob
//! first and the row second; deletes remove the row first and the blob second.
//! A metadata row therefore never points at a blob that was not written, while
//! an orphaned blob is tolerated and only logged.

use bytes::Bytes;
use cowatch_core::{AppError, NewVideoRecord, VideoResponse};
use cowatch_db::VideoRepositoryTrait;
use cowatch_storage::Storage;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Lifetime of the links handed out by `stream`.
pub const STREAM_URL_TTL: Duration = Duration::from_secs(3600);

const MAX_KEY_EXTENSION_LEN: usize = 8;
const FALLBACK_FILENAME: &str = "video";

/// A fully buffered upload as received from the client.
#[derive(Debug, Clone)]
pub struct VideoUpload {
    pub filename: String,
    pub content_type: String,
    pub title: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    /// Check `exists` after every put and fail the upload if the blob is not visible.
    pub verify_uploads: bool,
    /// Versioned API root used to build streaming URLs (e.g. `/api/v1`).
    pub api_prefix: String,
    pub max_upload_bytes: usize,
}

pub struct VideoLifecycleService {
    storage: Arc<dyn Storage>,
    repository: Arc<dyn VideoRepositoryTrait>,
    options: LifecycleOptions,
}

impl VideoLifecycleService {
    pub fn new(
        storage: Arc<dyn Storage>,
        repository: Arc<dyn VideoRepositoryTrait>,
        options: LifecycleOptions,
    ) -> Self {
        Self {
            storage,
            repository,
            options,
        }
    }

    #[tracing::instrument(
        skip(self, upload),
        fields(
            filename = %upload.filename,
            content_type = %upload.content_type,
            size_bytes = upload.data.len(),
        )
    )]
    pub async fn upload(&self, upload: VideoUpload) -> Result<VideoResponse, AppError> {
        if !is_video_content_type(&upload.content_type) {
            return Err(AppError::InvalidInput(format!(
                "Only video files are allowed, got content type '{}'",
                upload.content_type
            )));
        }
        if upload.data.len() > self.options.max_upload_bytes {
            return Err(AppError::InvalidInput(format!(
                "Video file exceeds the maximum size of {} bytes",
                self.options.max_upload_bytes
            )));
        }

        let filename = sanitize_filename(&upload.filename);
        let storage_key = generate_storage_key(&filename);
        let title = resolve_title(upload.title.as_deref(), &filename);
        let size = upload.data.len();

        let storage_url = self
            .storage
            .put(
                &storage_key,
                upload.data,
                &upload.content_type,
                Some(size as u64),
            )
            .await
            .map_err(|e| AppError::StorageWrite(format!("Failed to store video: {}", e)))?;

        if self.options.verify_uploads {
            self.verify_blob(&storage_key).await?;
        }

        let new_record = NewVideoRecord {
            title,
            filename: Some(filename),
            storage_key: Some(storage_key.clone()),
            storage_url: Some(storage_url),
            content_type: upload.content_type,
            file_size: size as i64,
        };

        let record = match self.repository.create(new_record).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    storage_key = %storage_key,
                    "Failed to save video metadata, removing stored blob"
                );
                self.compensate_blob(&storage_key).await;
                return Err(e.into_metadata_write());
            }
        };

        tracing::info!(
            video_id = record.id,
            storage_key = %storage_key,
            size_bytes = size,
            "Video uploaded"
        );

        Ok(VideoResponse::from_record(record, &self.options.api_prefix))
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<VideoResponse>, AppError> {
        let records = self
            .repository
            .list_all()
            .await
            .map_err(AppError::into_metadata_read)?;

        Ok(records
            .into_iter()
            .map(|record| VideoResponse::from_record(record, &self.options.api_prefix))
            .collect())
    }

    /// Time-limited URL the client should be redirected to.
    #[tracing::instrument(skip(self))]
    pub async fn stream(&self, video_id: i64) -> Result<String, AppError> {
        let record = self
            .repository
            .get_by_id(video_id)
            .await
            .map_err(AppError::into_metadata_read)?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        let storage_key = record.storage_key().ok_or_else(|| {
            AppError::NotFound("Video has no stored file".to_string())
        })?;

        self.storage
            .presigned_url(storage_key, STREAM_URL_TTL)
            .await
            .map_err(|e| {
                AppError::StorageRead(format!("Failed to generate streaming URL: {}", e))
            })
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, video_id: i64) -> Result<(), AppError> {
        let record = self
            .repository
            .get_by_id(video_id)
            .await
            .map_err(AppError::into_metadata_read)?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        let removed = self
            .repository
            .delete_by_id(video_id)
            .await
            .map_err(AppError::into_metadata_write)?;
        if !removed {
            // Lost a race with a concurrent delete.
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        if let Some(storage_key) = record.storage_key() {
            if let Err(e) = self.storage.delete(storage_key).await {
                tracing::warn!(
                    error = %e,
                    video_id = video_id,
                    storage_key = %storage_key,
                    "Video metadata deleted but blob cleanup failed"
                );
            }
        }

        tracing::info!(video_id = video_id, "Video deleted");
        Ok(())
    }

    async fn verify_blob(&self, storage_key: &str) -> Result<(), AppError> {
        let visible = match self.storage.exists(storage_key).await {
            Ok(visible) => visible,
            Err(e) => {
                tracing::warn!(error = %e, storage_key = %storage_key, "Upload verification failed");
                false
            }
        };

        if visible {
            return Ok(());
        }

        self.compensate_blob(storage_key).await;
        Err(AppError::StorageWrite(format!(
            "Stored video '{}' is not readable after upload",
            storage_key
        )))
    }

    /// Best-effort removal of a blob whose metadata will never exist.
    async fn compensate_blob(&self, storage_key: &str) {
        if let Err(e) = self.storage.delete(storage_key).await {
            tracing::error!(
                error = %e,
                storage_key = %storage_key,
                "Compensating blob delete failed, blob is orphaned"
            );
        }
    }
}

/// `video/*` check on the media type, ignoring case and parameters.
pub(crate) fn is_video_content_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    match essence.split_once('/') {
        Some((kind, _)) => kind.eq_ignore_ascii_case("video"),
        None => false,
    }
}

/// Final path component of a client-supplied filename.
fn sanitize_filename(filename: &str) -> String {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();
    if name.is_empty() || name == "." || name == ".." {
        FALLBACK_FILENAME.to_string()
    } else {
        name.to_string()
    }
}

/// Random key with the original extension kept as a cosmetic suffix.
fn generate_storage_key(filename: &str) -> String {
    let id = Uuid::new_v4();
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_KEY_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        });

    match extension {
        Some(ext) => format!("{}.{}", id, ext.to_ascii_lowercase()),
        None => id.to_string(),
    }
}

fn resolve_title(explicit: Option<&str>, filename: &str) -> String {
    if let Some(title) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return title.to_string();
    }

    match Path::new(filename).file_stem().and_then(|stem| stem.to_str()) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => filename.to_string(),
    }
}
