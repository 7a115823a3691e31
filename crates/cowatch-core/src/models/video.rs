use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A persisted video: metadata only, the bytes live in the blob store.
///
/// `storage_key` addresses the object in the blob store and is never repointed
/// once the row exists. It is `None` only for rows written without object
/// storage backing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct VideoRecord {
    pub id: i64,
    pub title: String,
    pub filename: Option<String>,
    pub storage_key: Option<String>,
    /// Canonical (non-presigned) object location. Informational only.
    pub storage_url: Option<String>,
    pub content_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

impl VideoRecord {
    /// Storage key, treating an empty string the same as a missing key.
    pub fn storage_key(&self) -> Option<&str> {
        self.storage_key.as_deref().filter(|key| !key.is_empty())
    }
}

/// Insert payload for a new video row; `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVideoRecord {
    pub title: String,
    pub filename: Option<String>,
    pub storage_key: Option<String>,
    pub storage_url: Option<String>,
    pub content_type: String,
    pub file_size: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub id: i64,
    pub title: String,
    /// Streaming endpoint of this service, not the underlying blob URL
    pub url: String,
    pub size: i64,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

impl VideoResponse {
    /// Build the public view of a record. `api_prefix` is the versioned API
    /// root (e.g. `/api/v1`).
    pub fn from_record(record: VideoRecord, api_prefix: &str) -> Self {
        VideoResponse {
            url: stream_path(api_prefix, record.id),
            id: record.id,
            title: record.title,
            size: record.file_size,
            content_type: record.content_type,
            uploaded_at: record.created_at,
        }
    }
}

/// Relative streaming path for a video id.
pub fn stream_path(api_prefix: &str, id: i64) -> String {
    format!("{}/videos/stream/{}", api_prefix.trim_end_matches('/'), id)
}
