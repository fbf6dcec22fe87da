//! Listing actions: `listimage`, `listfile`.

use std::sync::Arc;

use serde_json::Value;

use crate::dispatch::ActionRequest;
use crate::response::list_envelope;
use crate::state::AppState;

pub async fn list_images(state: Arc<AppState>, request: ActionRequest) -> Value {
    let manager = state.config.image_manager();
    let result = state
        .image_lister
        .list(
            &manager.list_path,
            &manager.allow_files,
            request.query.start.as_deref(),
            request.query.size.as_deref(),
        )
        .await;
    list_envelope(&result)
}

pub async fn list_files(state: Arc<AppState>, request: ActionRequest) -> Value {
    let manager = state.config.file_manager();
    let result = state
        .file_lister
        .list(
            &manager.list_path,
            &manager.allow_files,
            request.query.start.as_deref(),
            request.query.size.as_deref(),
        )
        .await;
    list_envelope(&result)
}
