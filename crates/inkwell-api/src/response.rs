//! Envelope construction and JSON / JSONP rendering.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use inkwell_core::{CrawlOutcome, ListResult, ListState, UploadResult};
use serde_json::{json, Value};

use crate::constants::{CONTENT_TYPE_JAVASCRIPT, CONTENT_TYPE_JSON_TEXT};
use inkwell_core::constants::STATE_SUCCESS;

/// A JSONP callback must be a dotted identifier path such as `jQuery123.cb`.
pub fn is_valid_callback(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.')
}

/// `{"state": message}`
pub fn state_envelope(message: &str) -> Value {
    json!({ "state": message })
}

pub fn upload_envelope(result: &UploadResult) -> Value {
    json!({
        "state": result.message(),
        "url": result.stored_path,
        "title": result.original_file_name,
        "original": result.original_file_name,
        "error": result.error_detail,
    })
}

pub fn list_envelope(result: &ListResult) -> Value {
    let list = if result.state == ListState::Success {
        Value::Array(
            result
                .entries
                .iter()
                .map(|entry| json!({ "url": entry }))
                .collect(),
        )
    } else {
        Value::Null
    };

    json!({
        "state": result.message(),
        "list": list,
        "start": result.start,
        "size": result.page_size,
        "total": result.total,
    })
}

pub fn catch_envelope(outcomes: &[CrawlOutcome]) -> Value {
    let list: Vec<Value> = outcomes
        .iter()
        .map(|outcome| {
            json!({
                "state": outcome.state,
                "source": outcome.source_url,
                "url": outcome.stored_path,
            })
        })
        .collect();

    json!({ "state": STATE_SUCCESS, "list": list })
}

/// Render an envelope as plain JSON, or as `callback(json);` when a callback is
/// given. The callback must already have been checked with [`is_valid_callback`].
pub fn render(envelope: &Value, callback: Option<&str>) -> Response {
    let json = envelope.to_string();
    match callback {
        Some(callback) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, CONTENT_TYPE_JAVASCRIPT)],
            format!("{}({});", callback, json),
        )
            .into_response(),
        None => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, CONTENT_TYPE_JSON_TEXT)],
            json,
        )
            .into_response(),
    }
}
