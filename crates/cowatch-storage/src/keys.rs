//! Key validation and namespace prefixing shared by all backends.

use crate::{StorageError, StorageResult};

/// Reject keys that could escape the namespace or address nothing.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.trim().is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

/// Normalize a namespace prefix: no leading slash, exactly one trailing slash
/// unless empty.
pub fn normalize_prefix(prefix: &str) -> StorageResult<String> {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if trimmed.contains("..") || trimmed.contains('\\') {
        return Err(StorageError::ConfigError(format!(
            "Invalid storage prefix: {}",
            prefix
        )));
    }
    Ok(format!("{}/", trimmed))
}

/// Full object path for `key` under an already normalized `prefix`.
pub fn object_path(prefix: &str, key: &str) -> StorageResult<String> {
    validate_key(key)?;
    Ok(format!("{}{}", prefix, key))
}
