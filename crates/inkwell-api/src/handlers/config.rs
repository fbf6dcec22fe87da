use std::sync::Arc;

use serde_json::Value;

use crate::dispatch::ActionRequest;
use crate::response::state_envelope;
use crate::state::AppState;

/// `config`: the client-side settings object.
pub async fn editor_config(state: Arc<AppState>, _request: ActionRequest) -> Value {
    match serde_json::to_value(state.config.client_settings()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize client settings");
            state_envelope("Unknown error.")
        }
    }
}
