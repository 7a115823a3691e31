//! Storage setup and initialization

use anyhow::{Context, Result};
use cowatch_core::Config;
use cowatch_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing video storage...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(
        backend = %storage.backend_type(),
        prefix = %config.s3_video_prefix(),
        "Video storage initialized"
    );

    Ok(storage)
}
