//! Video metadata repository: CRUD for the uploaded_videos table.

use cowatch_core::{AppError, NewVideoRecord, VideoRecord};
use sqlx::{PgPool, Postgres};

/// Trait for video metadata operations
///
/// Implemented for PostgreSQL and for a process-local store. Rows are
/// immutable once created; there is no update operation.
#[async_trait::async_trait]
pub trait VideoRepositoryTrait: Send + Sync {
    /// Insert a row; `id` and `created_at` are assigned by the store.
    async fn create(&self, video: NewVideoRecord) -> Result<VideoRecord, AppError>;

    /// Every row, oldest first (`created_at`, then `id`).
    async fn list_all(&self) -> Result<Vec<VideoRecord>, AppError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<VideoRecord>, AppError>;

    /// Returns whether a row was removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError>;

    /// Cheap reachability probe for health checks
    async fn ping(&self) -> Result<(), AppError>;

    fn backend_name(&self) -> &'static str;
}

#[derive(Clone)]
pub struct PostgresVideoRepository {
    pool: PgPool,
}

impl PostgresVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl VideoRepositoryTrait for PostgresVideoRepository {
    #[tracing::instrument(skip(self, video), fields(
        db.system = "postgresql",
        db.table = "uploaded_videos",
        db.operation = "insert",
        storage_key = ?video.storage_key
    ))]
    async fn create(&self, video: NewVideoRecord) -> Result<VideoRecord, AppError> {
        let record = sqlx::query_as::<Postgres, VideoRecord>(
            r#"
            INSERT INTO uploaded_videos (
                title, filename, storage_key, storage_url, content_type, file_size
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, filename, storage_key, storage_url,
                      content_type, file_size, created_at
            "#,
        )
        .bind(&video.title)
        .bind(&video.filename)
        .bind(&video.storage_key)
        .bind(&video.storage_url)
        .bind(&video.content_type)
        .bind(video.file_size)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, title = %video.title, "Failed to insert video record");
            AppError::Database(e)
        })?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "postgresql",
        db.table = "uploaded_videos",
        db.operation = "select"
    ))]
    async fn list_all(&self) -> Result<Vec<VideoRecord>, AppError> {
        let records = sqlx::query_as::<Postgres, VideoRecord>(
            r#"
            SELECT id, title, filename, storage_key, storage_url,
                   content_type, file_size, created_at
            FROM uploaded_videos
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "postgresql",
        db.table = "uploaded_videos",
        db.operation = "select"
    ))]
    async fn get_by_id(&self, id: i64) -> Result<Option<VideoRecord>, AppError> {
        let record = sqlx::query_as::<Postgres, VideoRecord>(
            r#"
            SELECT id, title, filename, storage_key, storage_url,
                   content_type, file_size, created_at
            FROM uploaded_videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "postgresql",
        db.table = "uploaded_videos",
        db.operation = "delete"
    ))]
    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM uploaded_videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
