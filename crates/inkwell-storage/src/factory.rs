use crate::{LocalStorage, Storage, StorageError, StorageResult};
use inkwell_core::Config;
use std::sync::Arc;

/// Create the storage backend rooted at the configured storage root
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let base_path = config.storage_root();
    if base_path.trim().is_empty() {
        return Err(StorageError::ConfigError(
            "STORAGE_ROOT not configured".to_string(),
        ));
    }

    let storage = LocalStorage::new(base_path).await?;
    tracing::info!(
        path = %storage.base_path().display(),
        "Local storage initialized"
    );
    Ok(Arc::new(storage))
}
