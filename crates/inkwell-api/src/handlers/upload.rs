//! Upload actions: `uploadimage`, `uploadscrawl`, `uploadvideo`, `uploadfile`.

use std::sync::Arc;

use inkwell_core::{UploadOptions, UploadResult, UploadState};
use serde_json::Value;

use crate::dispatch::{ActionRequest, BodyError};
use crate::response::upload_envelope;
use crate::state::AppState;

/// Result for an upload whose body could not be read.
fn body_failure(error: &BodyError) -> UploadResult {
    let state = match error {
        BodyError::TooLarge(_) => UploadState::SizeLimitExceeded,
        BodyError::Malformed(_) => UploadState::NetworkError,
    };
    UploadResult::failure(state, None, error.to_string())
}

async fn run_upload(state: &AppState, request: &ActionRequest, options: UploadOptions) -> Value {
    let result = match &request.body_error {
        Some(error) => {
            tracing::warn!(error = %error, "Failed to read upload body");
            body_failure(error)
        }
        None => state.uploads.run(&options, &request.form).await,
    };

    if result.is_success() {
        tracing::debug!(
            stored_path = ?result.stored_path,
            original = ?result.original_file_name,
            "Upload stored"
        );
    }

    upload_envelope(&result)
}

pub async fn upload_image(state: Arc<AppState>, request: ActionRequest) -> Value {
    let options = UploadOptions::multipart(state.config.image());
    run_upload(&state, &request, options).await
}

pub async fn upload_scrawl(state: Arc<AppState>, request: ActionRequest) -> Value {
    let options = UploadOptions::scrawl(state.config.scrawl());
    run_upload(&state, &request, options).await
}

pub async fn upload_video(state: Arc<AppState>, request: ActionRequest) -> Value {
    let options = UploadOptions::multipart(state.config.video());
    run_upload(&state, &request, options).await
}

pub async fn upload_file(state: Arc<AppState>, request: ActionRequest) -> Value {
    let options = UploadOptions::multipart(state.config.file());
    run_upload(&state, &request, options).await
}
