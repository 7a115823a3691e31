//! Cowatch Storage Library
//!
//! Blob storage for uploaded videos. The [`Storage`] trait is implemented by an
//! S3 backend (AWS or any S3-compatible endpoint) and a local filesystem backend.
//!
//! # Storage key format
//!
//! Callers hand over bare keys (for example `4f1c…9a.mp4`). Each backend places
//! the object under its configured namespace prefix (`videos/` by default), so
//! the object actually lives at `{prefix}{key}`. Keys must not be empty, contain
//! `..` or a backslash, or start with `/`.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use cowatch_core::StorageBackend;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
