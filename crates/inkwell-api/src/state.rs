//! Application state shared by every request.
//!
//! Everything here is read-only after startup: the configuration snapshot, the
//! components built on top of storage and the action registry.

use inkwell_core::Config;
use inkwell_processing::{AssetLister, UploadPipeline};
use std::sync::Arc;

use crate::crawler::RemoteFetcher;
use crate::dispatch::ActionRegistry;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub uploads: UploadPipeline,
    pub image_lister: AssetLister,
    pub file_lister: AssetLister,
    pub fetcher: RemoteFetcher,
    pub actions: Arc<ActionRegistry>,
}
