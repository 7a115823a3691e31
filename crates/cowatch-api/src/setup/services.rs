//! Service wiring and application state

use crate::constants::API_PREFIX;
use crate::services::video_lifecycle::{LifecycleOptions, VideoLifecycleService};
use crate::state::AppState;
use anyhow::Context;
use cowatch_core::Config;
use cowatch_db::{create_video_repository, VideoRepositoryTrait};
use cowatch_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

/// Build the repository for the configured metadata backend, then the state.
pub fn initialize_services(
    config: &Config,
    pool: Option<PgPool>,
    storage: Arc<dyn Storage>,
) -> anyhow::Result<Arc<AppState>> {
    let repository =
        create_video_repository(config, pool).context("Failed to create video repository")?;

    Ok(build_state(config.clone(), storage, repository))
}

/// Assemble the state from already-constructed stores.
pub fn build_state(
    config: Config,
    storage: Arc<dyn Storage>,
    repository: Arc<dyn VideoRepositoryTrait>,
) -> Arc<AppState> {
    let options = LifecycleOptions {
        verify_uploads: config.verify_uploads(),
        api_prefix: API_PREFIX.to_string(),
        max_upload_bytes: config.max_upload_size_bytes(),
    };
    let videos = Arc::new(VideoLifecycleService::new(
        storage.clone(),
        repository.clone(),
        options,
    ));

    tracing::info!(
        metadata_backend = repository.backend_name(),
        storage_backend = %storage.backend_type(),
        verify_uploads = config.verify_uploads(),
        "Services initialized"
    );

    Arc::new(AppState {
        config,
        videos,
        repository,
        storage,
    })
}
