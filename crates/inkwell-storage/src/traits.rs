//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use std::io;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Content exceeds the limit of {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("IO error: {0}")]
    Io(io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(err.to_string()),
            io::ErrorKind::NotFound => StorageError::NotFound(err.to_string()),
            _ => StorageError::Io(err),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A stored file found by [`Storage::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Storage-root-relative key, `/` separated.
    pub key: String,
    /// Lowercased extension including the dot, or empty.
    pub extension: String,
}

/// Storage abstraction trait
///
/// The editor handler only ever writes and enumerates assets; it never reads
/// content back or deletes anything.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` at `storage_key`, replacing any existing object, and return
    /// the normalized key.
    async fn put(&self, storage_key: &str, data: Bytes) -> StorageResult<String>;

    /// Store the content of `reader` at `storage_key` and return the number of
    /// bytes written.
    ///
    /// When `max_bytes` is set and the reader yields more than that, nothing is
    /// stored and `TooLarge` is returned.
    async fn put_stream(
        &self,
        storage_key: &str,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
        max_bytes: Option<u64>,
    ) -> StorageResult<u64>;

    /// Recursively enumerate every object under `prefix` (empty for the root).
    ///
    /// Returns `NotFound` when the prefix does not exist.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<StoredObject>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_map_by_kind() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(
            StorageError::from(denied),
            StorageError::PermissionDenied(_)
        ));

        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(matches!(StorageError::from(missing), StorageError::NotFound(_)));

        let other = io::Error::other("disk on fire");
        assert!(matches!(StorageError::from(other), StorageError::Io(_)));
    }
}
