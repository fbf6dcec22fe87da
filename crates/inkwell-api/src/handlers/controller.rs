//! The single editor route: every action goes through [`editor_controller`].

use std::sync::Arc;

use axum::extract::{Query, Request, State};
use axum::response::Response;
use inkwell_core::AppError;
use inkwell_infra::get_request_id;

use crate::constants::{MSG_INVALID_CALLBACK, MSG_UNSUPPORTED_ACTION};
use crate::dispatch::{ActionRequest, EditorQuery};
use crate::error::HttpAppError;
use crate::response::{is_valid_callback, render, state_envelope};
use crate::state::AppState;
use crate::utils::form::read_form;

#[tracing::instrument(
    skip(state, query, request),
    fields(
        action = ?query.action,
        method = %request.method(),
        request_id = ?get_request_id(&request)
    )
)]
pub async fn editor_controller(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EditorQuery>,
    request: Request,
) -> Result<Response, HttpAppError> {
    if let Some(callback) = query.callback.as_deref() {
        if !is_valid_callback(callback) {
            return Err(AppError::BadRequest(MSG_INVALID_CALLBACK.to_string()).into());
        }
    }
    let callback = query.callback.clone();

    let handler = query
        .action
        .as_deref()
        .and_then(|action| state.actions.get(action));
    let Some(handler) = handler else {
        tracing::debug!("Unsupported action");
        return Ok(render(
            &state_envelope(MSG_UNSUPPORTED_ACTION),
            callback.as_deref(),
        ));
    };

    let (form, body_error) = match read_form(request).await {
        Ok(form) => (form, None),
        Err(e) => (Default::default(), Some(e)),
    };

    tracing::debug!(empty_body = form.is_empty(), "Dispatching editor action");

    let envelope = handler(
        state.clone(),
        ActionRequest {
            query,
            form,
            body_error,
        },
    )
    .await;

    Ok(render(&envelope, callback.as_deref()))
}
