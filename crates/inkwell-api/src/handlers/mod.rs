//! HTTP handlers and editor action handlers.

pub mod catch;
pub mod config;
pub mod controller;
pub mod health;
pub mod list;
pub mod upload;

use futures::future::BoxFuture;
use inkwell_core::constants::{
    ACTION_CATCH_IMAGE, ACTION_CONFIG, ACTION_LIST_FILE, ACTION_LIST_IMAGE, ACTION_UPLOAD_FILE,
    ACTION_UPLOAD_IMAGE, ACTION_UPLOAD_SCRAWL, ACTION_UPLOAD_VIDEO,
};
use serde_json::Value;
use std::sync::Arc;

use crate::dispatch::{ActionRegistry, ActionRequest};
use crate::state::AppState;

type Boxed = BoxFuture<'static, Value>;

/// Registry with a handler for every editor action, validated.
pub fn editor_actions() -> Result<ActionRegistry, anyhow::Error> {
    let mut registry = ActionRegistry::new();

    registry.register(ACTION_CONFIG, |s: Arc<AppState>, r: ActionRequest| -> Boxed {
        Box::pin(config::editor_config(s, r))
    })?;
    registry.register(ACTION_UPLOAD_IMAGE, |s: Arc<AppState>, r: ActionRequest| -> Boxed {
        Box::pin(upload::upload_image(s, r))
    })?;
    registry.register(ACTION_UPLOAD_SCRAWL, |s: Arc<AppState>, r: ActionRequest| -> Boxed {
        Box::pin(upload::upload_scrawl(s, r))
    })?;
    registry.register(ACTION_UPLOAD_VIDEO, |s: Arc<AppState>, r: ActionRequest| -> Boxed {
        Box::pin(upload::upload_video(s, r))
    })?;
    registry.register(ACTION_UPLOAD_FILE, |s: Arc<AppState>, r: ActionRequest| -> Boxed {
        Box::pin(upload::upload_file(s, r))
    })?;
    registry.register(ACTION_LIST_IMAGE, |s: Arc<AppState>, r: ActionRequest| -> Boxed {
        Box::pin(list::list_images(s, r))
    })?;
    registry.register(ACTION_LIST_FILE, |s: Arc<AppState>, r: ActionRequest| -> Boxed {
        Box::pin(list::list_files(s, r))
    })?;
    registry.register(ACTION_CATCH_IMAGE, |s: Arc<AppState>, r: ActionRequest| -> Boxed {
        Box::pin(catch::catch_image(s, r))
    })?;

    registry.validate()?;
    Ok(registry)
}
