use crate::keys::key_segments;
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use inkwell_core::naming::file_extension;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use uuid::Uuid;

const TEMP_SUFFIX: &str = ".tmp";

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory every key is resolved against (e.g., "./wwwroot")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        let base_path = fs::canonicalize(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys with parent segments, and keys that resolve outside the base
    /// directory through a symlink.
    async fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        let segments = key_segments(storage_key)?;
        let path = segments
            .iter()
            .fold(self.base_path.clone(), |path, segment| path.join(segment));

        if let Ok(canonical) = fs::canonicalize(&path).await {
            if !canonical.starts_with(&self.base_path) {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    /// Key of a filesystem path below the base directory, `/` separated.
    fn path_to_key(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.base_path).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_context("create directory", parent, e))?;
        }
        Ok(())
    }

    /// Sibling temp file the content is written to before the final rename.
    fn temp_path_for(path: &Path) -> PathBuf {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!(".{}.{}{}", file_name, Uuid::new_v4(), TEMP_SUFFIX))
    }

    async fn commit(&self, temp_path: &Path, path: &Path) -> StorageResult<()> {
        if let Err(e) = fs::rename(temp_path, path).await {
            discard(temp_path).await;
            return Err(io_context("rename temp file to", path, e));
        }
        Ok(())
    }
}

/// Rebuild an io error with the failing operation and path, keeping its kind.
fn io_context(action: &str, path: &Path, err: io::Error) -> StorageError {
    io::Error::new(
        err.kind(),
        format!("Failed to {} {}: {}", action, path.display(), err),
    )
    .into()
}

async fn discard(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path).await {
        tracing::warn!(
            path = %temp_path.display(),
            error = %e,
            "Failed to remove temp file"
        );
    }
}

fn is_temp_file(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(TEMP_SUFFIX)
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, storage_key: &str, data: Bytes) -> StorageResult<String> {
        let path = self.key_to_path(storage_key).await?;
        let key = self
            .path_to_key(&path)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| StorageError::InvalidKey("Storage key is empty".to_string()))?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();
        let temp_path = Self::temp_path_for(&path);

        let written: StorageResult<()> = async {
            let mut file = fs::File::create(&temp_path)
                .await
                .map_err(|e| io_context("create file", &temp_path, e))?;
            file.write_all(&data)
                .await
                .map_err(|e| io_context("write file", &temp_path, e))?;
            file.sync_all()
                .await
                .map_err(|e| io_context("sync file", &temp_path, e))
        }
        .await;

        if let Err(e) = written {
            discard(&temp_path).await;
            return Err(e);
        }

        self.commit(&temp_path, &path).await?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage put successful"
        );

        Ok(key)
    }

    async fn put_stream(
        &self,
        storage_key: &str,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
        max_bytes: Option<u64>,
    ) -> StorageResult<u64> {
        let path = self.key_to_path(storage_key).await?;
        if key_segments(storage_key)?.is_empty() {
            return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
        }

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();
        let temp_path = Self::temp_path_for(&path);

        // One byte past the limit is enough to tell an oversized body apart.
        let mut limited = reader.take(max_bytes.map_or(u64::MAX, |m| m.saturating_add(1)));

        let written: StorageResult<u64> = async {
            let mut file = fs::File::create(&temp_path)
                .await
                .map_err(|e| io_context("create file", &temp_path, e))?;
            let copied = tokio::io::copy(&mut limited, &mut file)
                .await
                .map_err(|e| io_context("write stream to file", &temp_path, e))?;
            if let Some(limit) = max_bytes {
                if copied > limit {
                    return Err(StorageError::TooLarge { limit });
                }
            }
            file.sync_all()
                .await
                .map_err(|e| io_context("sync file", &temp_path, e))?;
            Ok(copied)
        }
        .await;

        let bytes_copied = match written {
            Ok(n) => n,
            Err(e) => {
                discard(&temp_path).await;
                return Err(e);
            }
        };

        self.commit(&temp_path, &path).await?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage stream put successful"
        );

        Ok(bytes_copied)
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<StoredObject>> {
        let root = self.key_to_path(prefix).await?;
        let start = std::time::Instant::now();

        let metadata = fs::metadata(&root)
            .await
            .map_err(|e| io_context("read directory", &root, e))?;
        if !metadata.is_dir() {
            return Err(StorageError::NotFound(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        let mut objects = Vec::new();
        let mut pending = vec![root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir)
                .await
                .map_err(|e| io_context("read directory", &dir, e))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| io_context("read directory", &dir, e))?
            {
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| io_context("stat", &entry.path(), e))?;
                let entry_path = entry.path();

                if file_type.is_dir() {
                    pending.push(entry_path);
                } else if file_type.is_file() {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    if is_temp_file(&name) {
                        continue;
                    }
                    if let Some(key) = self.path_to_key(&entry_path) {
                        objects.push(StoredObject {
                            extension: file_extension(&name),
                            key,
                        });
                    }
                }
            }
        }

        tracing::debug!(
            path = %root.display(),
            prefix = %prefix,
            count = objects.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage list successful"
        );

        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_local_storage_put() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let key = storage
            .put("upload/image/a.png", Bytes::from_static(b"abc"))
            .await
            .unwrap();

        assert_eq!(key, "upload/image/a.png");
        let stored = std::fs::read(dir.path().join("upload/image/a.png")).unwrap();
        assert_eq!(stored, b"abc");
    }

    #[tokio::test]
    async fn test_put_overwrites_and_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage.put("a/b.txt", Bytes::from_static(b"first")).await.unwrap();
        storage.put("a/b.txt", Bytes::from_static(b"second")).await.unwrap();

        let stored = std::fs::read(dir.path().join("a/b.txt")).unwrap();
        assert_eq!(stored, b"second");
        let names: Vec<_> = std::fs::read_dir(dir.path().join("a"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.put("../../../etc/passwd", Bytes::new()).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.list("../etc").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.put("/etc/passwd", Bytes::new()).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_local_storage_stream_put() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let data = b"stream test data".to_vec();
        let cursor = std::io::Cursor::new(data.clone());
        let reader = Box::pin(cursor) as Pin<Box<dyn AsyncRead + Send + Unpin>>;

        let written = storage
            .put_stream("remote/stream.txt", reader, Some(data.len() as u64))
            .await
            .unwrap();

        assert_eq!(written, data.len() as u64);
        let stored = std::fs::read(dir.path().join("remote/stream.txt")).unwrap();
        assert_eq!(stored, data);
    }

    #[tokio::test]
    async fn test_stream_put_over_limit_stores_nothing() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let cursor = std::io::Cursor::new(vec![7u8; 64]);
        let reader = Box::pin(cursor) as Pin<Box<dyn AsyncRead + Send + Unpin>>;

        let result = storage.put_stream("remote/big.bin", reader, Some(63)).await;

        assert!(matches!(result, Err(StorageError::TooLarge { limit: 63 })));
        let leftovers = std::fs::read_dir(dir.path().join("remote")).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_list_is_recursive_and_skips_temp_files() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage.put("upload/image/1/a.PNG", Bytes::from_static(b"a")).await.unwrap();
        storage.put("upload/image/2/b.gif", Bytes::from_static(b"b")).await.unwrap();
        storage.put("upload/file/c.txt", Bytes::from_static(b"c")).await.unwrap();
        std::fs::write(dir.path().join("upload/image/.x.png.123.tmp"), b"partial").unwrap();

        let mut objects = storage.list("upload/image").await.unwrap();
        objects.sort_by(|a, b| a.key.cmp(&b.key));

        assert_eq!(
            objects,
            vec![
                StoredObject {
                    key: "upload/image/1/a.PNG".to_string(),
                    extension: ".png".to_string(),
                },
                StoredObject {
                    key: "upload/image/2/b.gif".to_string(),
                    extension: ".gif".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_list_missing_directory() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.list("does/not/exist").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
