//! Shared key validation for storage operations.

use crate::traits::{StorageError, StorageResult};

/// Split a storage key into its path segments, rejecting keys that could escape
/// the storage root.
///
/// Empty and `.` segments are dropped; an empty key yields no segments and
/// addresses the root itself.
pub fn key_segments(storage_key: &str) -> StorageResult<Vec<&str>> {
    if storage_key.starts_with('/') || storage_key.starts_with('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key must be relative: {}",
            storage_key
        )));
    }

    let mut segments = Vec::new();
    for segment in storage_key.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(StorageError::InvalidKey(format!(
                    "Storage key contains a parent segment: {}",
                    storage_key
                )))
            }
            s if s.contains('\0') => {
                return Err(StorageError::InvalidKey(
                    "Storage key contains invalid characters".to_string(),
                ))
            }
            s => segments.push(s),
        }
    }
    Ok(segments)
}
