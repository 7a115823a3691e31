//! Cowatch Core Library
//!
//! This crate provides the video domain model, error types and configuration
//! shared by the storage, database and API crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, MetadataBackend, VideoServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{NewVideoRecord, VideoRecord, VideoResponse};
// Note: Storage, StorageError, StorageResult live in the cowatch-storage crate
pub use storage_types::StorageBackend;
