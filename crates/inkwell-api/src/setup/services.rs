//! Component initialization and application state setup

use anyhow::{Context, Result};
use inkwell_core::Config;
use inkwell_processing::{AssetLister, UploadPipeline};
use inkwell_storage::Storage;
use std::sync::Arc;

use crate::crawler::RemoteFetcher;
use crate::handlers::editor_actions;
use crate::state::AppState;

/// Build every component on top of `storage`, returning the application state
pub fn build_state(config: Arc<Config>, storage: Arc<dyn Storage>) -> Result<Arc<AppState>> {
    let actions = editor_actions().context("Action registry is incomplete")?;
    tracing::info!(actions = ?actions.actions(), "Editor actions registered");

    let fetcher = RemoteFetcher::new(storage.clone(), config.catcher().clone())
        .context("Failed to build remote image client")?;

    let uploads = UploadPipeline::new(storage.clone());
    let image_lister = AssetLister::new(storage.clone(), config.image_manager().list_size);
    let file_lister = AssetLister::new(storage, config.file_manager().list_size);

    Ok(Arc::new(AppState {
        config,
        uploads,
        image_lister,
        file_lister,
        fetcher,
        actions: Arc::new(actions),
    }))
}
