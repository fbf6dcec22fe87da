//! Action dispatch.
//!
//! The editor addresses every operation through the `action` query parameter of
//! a single route. [`ActionRegistry`] maps action names to handler functions; it is
//! built and checked once at startup so a request can only hit a registered
//! handler or the single "unsupported" branch.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::StatusCode;
use futures::future::BoxFuture;
use inkwell_core::constants::EDITOR_ACTIONS;
use inkwell_processing::UploadForm;
use serde::Deserialize;
use serde_json::Value;

use crate::state::AppState;

/// Query parameters understood by the editor route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditorQuery {
    pub action: Option<String>,
    pub callback: Option<String>,
    pub start: Option<String>,
    pub size: Option<String>,
}

/// Why a request body could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BodyError {
    #[error("{0}")]
    TooLarge(String),

    #[error("{0}")]
    Malformed(String),
}

impl BodyError {
    /// Classify an extractor rejection by its status code.
    pub fn from_rejection(status: StatusCode, detail: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            BodyError::TooLarge(detail)
        } else {
            BodyError::Malformed(detail)
        }
    }
}

/// Everything an action handler receives about one request.
#[derive(Debug, Clone, Default)]
pub struct ActionRequest {
    pub query: EditorQuery,
    pub form: UploadForm,
    /// Set when the request body could not be read.
    pub body_error: Option<BodyError>,
}

/// An action handler produces the envelope for its request.
pub type ActionHandler = fn(Arc<AppState>, ActionRequest) -> BoxFuture<'static, Value>;

#[derive(Default)]
pub struct ActionRegistry {
    handlers: HashMap<&'static str, ActionHandler>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; registering the same action twice is an error.
    pub fn register(
        &mut self,
        action: &'static str,
        handler: ActionHandler,
    ) -> Result<(), anyhow::Error> {
        if self.handlers.insert(action, handler).is_some() {
            return Err(anyhow::anyhow!("Action '{}' registered twice", action));
        }
        Ok(())
    }

    pub fn get(&self, action: &str) -> Option<ActionHandler> {
        self.handlers.get(action).copied()
    }

    /// Registered action names, sorted.
    pub fn actions(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Check that every editor action has a handler and nothing else is registered.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let missing: Vec<_> = EDITOR_ACTIONS
            .iter()
            .filter(|action| !self.handlers.contains_key(*action))
            .collect();
        if !missing.is_empty() {
            return Err(anyhow::anyhow!("No handler registered for actions {:?}", missing));
        }

        let unknown: Vec<_> = self
            .handlers
            .keys()
            .filter(|action| !EDITOR_ACTIONS.contains(*action))
            .collect();
        if !unknown.is_empty() {
            return Err(anyhow::anyhow!("Unknown actions registered: {:?}", unknown));
        }

        Ok(())
    }
}
