//! Storage setup and initialization

use anyhow::{Context, Result};
use inkwell_core::Config;
use inkwell_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!(root = %config.storage_root(), "Initializing storage...");
    let storage = create_storage(config)
        .await
        .with_context(|| format!("Failed to open storage root '{}'", config.storage_root()))?;
    tracing::info!("Storage initialized successfully");
    Ok(storage)
}
