//! Inkwell API Library
//!
//! This crate provides the HTTP surface of the editor handler: the action
//! dispatcher, envelope rendering, the remote image fetcher and application setup.

pub mod constants;
pub mod crawler;
pub mod dispatch;
pub mod error;
mod handlers;
pub mod response;
pub mod setup;
pub mod state;
mod utils;

// Re-exports
pub use crawler::{FetchError, RemoteFetcher};
pub use dispatch::{ActionRegistry, ActionRequest, EditorQuery};
pub use error::HttpAppError;
pub use state::AppState;
