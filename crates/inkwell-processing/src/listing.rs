//! Paginated asset listing for the editor's image and file managers.

use std::sync::Arc;

use inkwell_core::{ListResult, ListState};
use inkwell_storage::{Storage, StorageError};

/// Parse a paging parameter; missing or blank means `default`.
fn parse_param(raw: Option<&str>, default: usize) -> Option<usize> {
    match raw.map(str::trim) {
        None | Some("") => Some(default),
        Some(value) => value.parse().ok(),
    }
}

fn list_state_for(err: &StorageError) -> ListState {
    match err {
        StorageError::PermissionDenied(_) => ListState::AuthorizationError,
        StorageError::NotFound(_) | StorageError::InvalidKey(_) => ListState::PathNotFound,
        _ => ListState::IOError,
    }
}

#[derive(Clone)]
pub struct AssetLister {
    storage: Arc<dyn Storage>,
    default_page_size: usize,
}

impl AssetLister {
    pub fn new(storage: Arc<dyn Storage>, default_page_size: usize) -> Self {
        Self {
            storage,
            default_page_size,
        }
    }

    /// List one page of files under `root` whose extension is allowed.
    ///
    /// Matches are sorted by key before paging so repeated calls over an
    /// unchanged tree return the same page.
    pub async fn list(
        &self,
        root: &str,
        allowed_extensions: &[String],
        start: Option<&str>,
        size: Option<&str>,
    ) -> ListResult {
        let parsed_start = parse_param(start, 0);
        let parsed_size = parse_param(size, self.default_page_size);

        let (start, page_size) = match (parsed_start, parsed_size) {
            (Some(start), Some(page_size)) => (start, page_size),
            (start_value, size_value) => {
                tracing::warn!(
                    start = ?start,
                    size = ?size,
                    "Invalid listing parameters"
                );
                return ListResult::failed(
                    ListState::InvalidParam,
                    start_value.unwrap_or(0),
                    size_value.unwrap_or(0),
                );
            }
        };

        let objects = match self.storage.list(root).await {
            Ok(objects) => objects,
            Err(e) => {
                let state = list_state_for(&e);
                tracing::warn!(
                    root = %root,
                    error = %e,
                    state = ?state,
                    "Asset listing failed"
                );
                return ListResult::failed(state, start, page_size);
            }
        };

        let mut matches: Vec<String> = objects
            .into_iter()
            .filter(|object| {
                allowed_extensions
                    .iter()
                    .any(|ext| ext.eq_ignore_ascii_case(&object.extension))
            })
            .map(|object| object.key)
            .collect();
        matches.sort();

        let total = matches.len();
        let entries: Vec<String> = matches.into_iter().skip(start).take(page_size).collect();

        tracing::debug!(
            root = %root,
            start,
            page_size,
            returned = entries.len(),
            total,
            "Asset listing served"
        );

        ListResult::page(entries, start, page_size, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use inkwell_storage::{LocalStorage, StorageResult, StoredObject};
    use std::pin::Pin;
    use tempfile::{tempdir, TempDir};
    use tokio::io::AsyncRead;

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|e| e.to_string()).collect()
    }

    async fn seeded_storage(names: &[&str]) -> (TempDir, Arc<dyn Storage>) {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        for name in names {
            storage.put(name, Bytes::from_static(b"x")).await.unwrap();
        }
        (dir, Arc::new(storage))
    }

    struct BrokenStorage(fn() -> StorageError);

    #[async_trait]
    impl Storage for BrokenStorage {
        async fn put(&self, _storage_key: &str, _data: Bytes) -> StorageResult<String> {
            Err((self.0)())
        }

        async fn put_stream(
            &self,
            _storage_key: &str,
            _reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
            _max_bytes: Option<u64>,
        ) -> StorageResult<u64> {
            Err((self.0)())
        }

        async fn list(&self, _prefix: &str) -> StorageResult<Vec<StoredObject>> {
            Err((self.0)())
        }
    }

    #[tokio::test]
    async fn test_lists_sorted_and_filtered() {
        let (_dir, storage) = seeded_storage(&[
            "upload/image/b/2.png",
            "upload/image/a/1.JPG",
            "upload/image/a/notes.txt",
            "upload/file/3.png",
        ])
        .await;
        let lister = AssetLister::new(storage, 20);

        let result = lister
            .list("upload/image", &exts(&[".png", ".jpg"]), None, None)
            .await;

        assert_eq!(result.state, ListState::Success);
        assert_eq!(
            result.entries,
            vec![
                "upload/image/a/1.JPG".to_string(),
                "upload/image/b/2.png".to_string()
            ]
        );
        assert_eq!(result.total, 2);
        assert_eq!(result.start, 0);
        assert_eq!(result.page_size, 20);
    }

    #[tokio::test]
    async fn test_pagination_invariant() {
        let names: Vec<String> = (0..7).map(|i| format!("img/{:02}.png", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let (_dir, storage) = seeded_storage(&refs).await;
        let lister = AssetLister::new(storage, 20);
        let allowed = exts(&[".png"]);

        for start in 0..10usize {
            for size in 0..9usize {
                let result = lister
                    .list(
                        "img",
                        &allowed,
                        Some(&start.to_string()),
                        Some(&size.to_string()),
                    )
                    .await;
                let expected = size.min(7usize.saturating_sub(start));
                assert_eq!(result.entries.len(), expected, "start={start} size={size}");
                assert_eq!(result.total, 7);
                if start < 7 {
                    assert!(start + result.entries.len() <= result.total);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_listing_is_deterministic() {
        let (_dir, storage) = seeded_storage(&["d/c.png", "d/a.png", "d/b.png"]).await;
        let lister = AssetLister::new(storage, 2);
        let allowed = exts(&[".png"]);

        let first = lister.list("d", &allowed, Some("1"), None).await;
        let second = lister.list("d", &allowed, Some("1"), None).await;

        assert_eq!(first, second);
        assert_eq!(first.entries, vec!["d/b.png".to_string(), "d/c.png".to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_params() {
        let (_dir, storage) = seeded_storage(&["d/a.png"]).await;
        let lister = AssetLister::new(storage, 20);
        let allowed = exts(&[".png"]);

        let result = lister.list("d", &allowed, Some("abc"), Some("5")).await;
        assert_eq!(result.state, ListState::InvalidParam);
        assert_eq!((result.start, result.page_size, result.total), (0, 5, 0));
        assert!(result.entries.is_empty());

        let result = lister.list("d", &allowed, Some("3"), Some("-1")).await;
        assert_eq!(result.state, ListState::InvalidParam);
        assert_eq!((result.start, result.page_size), (3, 0));
        assert_eq!(result.message(), "Invalid parameter.");
    }

    #[tokio::test]
    async fn test_blank_params_use_defaults() {
        let (_dir, storage) = seeded_storage(&["d/a.png"]).await;
        let lister = AssetLister::new(storage, 15);

        let result = lister.list("d", &exts(&[".png"]), Some(" "), Some("")).await;

        assert_eq!(result.state, ListState::Success);
        assert_eq!((result.start, result.page_size), (0, 15));
    }

    #[tokio::test]
    async fn test_missing_root_is_path_not_found() {
        let (_dir, storage) = seeded_storage(&[]).await;
        let lister = AssetLister::new(storage, 20);

        let result = lister.list("nowhere", &exts(&[".png"]), None, None).await;
        assert_eq!(result.state, ListState::PathNotFound);
        assert_eq!(result.total, 0);

        let result = lister.list("../etc", &exts(&[".png"]), None, None).await;
        assert_eq!(result.state, ListState::PathNotFound);
    }

    #[tokio::test]
    async fn test_storage_errors_map_to_states() {
        let cases: [(fn() -> StorageError, ListState); 2] = [
            (
                || StorageError::PermissionDenied("denied".to_string()),
                ListState::AuthorizationError,
            ),
            (
                || StorageError::Io(std::io::Error::other("bad sector")),
                ListState::IOError,
            ),
        ];

        for (make_error, expected) in cases {
            let lister = AssetLister::new(Arc::new(BrokenStorage(make_error)), 20);
            let result = lister.list("any", &exts(&[".png"]), Some("4"), None).await;
            assert_eq!(result.state, expected);
            assert_eq!(result.start, 4);
            assert!(result.entries.is_empty());
        }
    }
}
