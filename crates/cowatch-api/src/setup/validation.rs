//! Configuration validation
//!
//! Hard errors come from `Config::validate`; this adds warnings for settings
//! that are legal but questionable for a real deployment.

use anyhow::Result;
use cowatch_core::{Config, MetadataBackend, StorageBackend};

pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() {
        if config.metadata_backend() == MetadataBackend::Memory {
            tracing::warn!(
                "METADATA_BACKEND=memory in production - video metadata will be lost on restart"
            );
        }
        if config.storage_backend() == StorageBackend::Local {
            tracing::warn!(
                path = %config.local_storage_path(),
                "Local file storage in production - videos are served by this process"
            );
        }
    } else if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS allows all origins - not recommended outside development");
    }

    if !config.verify_uploads() {
        tracing::debug!("Upload verification disabled, relying on read-after-write consistency");
    }

    Ok(())
}
