pub mod memory;
pub mod repository;

pub use memory::InMemoryVideoRepository;
pub use repository::{PostgresVideoRepository, VideoRepositoryTrait};

use cowatch_core::{AppError, Config, MetadataBackend};
use sqlx::PgPool;
use std::sync::Arc;

/// Build the metadata repository selected by `METADATA_BACKEND`.
///
/// The PostgreSQL backend needs a connected pool; the memory backend ignores it.
pub fn create_video_repository(
    config: &Config,
    pool: Option<PgPool>,
) -> Result<Arc<dyn VideoRepositoryTrait>, AppError> {
    match config.metadata_backend() {
        MetadataBackend::Postgres => {
            let pool = pool.ok_or_else(|| {
                AppError::Internal(
                    "PostgreSQL metadata backend selected but no pool is available".to_string(),
                )
            })?;
            tracing::info!("Initializing PostgreSQL video repository");
            Ok(Arc::new(PostgresVideoRepository::new(pool)))
        }
        MetadataBackend::Memory => {
            tracing::warn!("Using in-memory video repository; metadata is lost on restart");
            Ok(Arc::new(InMemoryVideoRepository::new()))
        }
    }
}
