use std::sync::Arc;

use serde_json::Value;

use crate::constants::MSG_MISSING_SOURCE;
use crate::dispatch::ActionRequest;
use crate::response::{catch_envelope, state_envelope};
use crate::state::AppState;

/// Source URLs submitted as `source[]` (the editor's form) or plain `source`.
fn submitted_sources(field_name: &str, request: &ActionRequest) -> Vec<String> {
    let array_name = format!("{}[]", field_name);
    let mut sources: Vec<String> = request
        .form
        .fields_named(&array_name)
        .map(str::to_string)
        .collect();
    if sources.is_empty() {
        sources = request
            .form
            .fields_named(field_name)
            .map(str::to_string)
            .collect();
    }
    sources.retain(|source| !source.trim().is_empty());
    sources
}

/// `catchimage`: fetch every submitted remote image into storage.
pub async fn catch_image(state: Arc<AppState>, request: ActionRequest) -> Value {
    if let Some(detail) = &request.body_error {
        tracing::warn!(error = %detail, "Failed to read catch request body");
    }

    let sources = submitted_sources(&state.config.catcher().field_name, &request);
    if sources.is_empty() {
        return state_envelope(MSG_MISSING_SOURCE);
    }

    tracing::debug!(count = sources.len(), "Fetching remote images");
    let outcomes = state.fetcher.fetch_all(&sources).await;
    catch_envelope(&outcomes)
}
