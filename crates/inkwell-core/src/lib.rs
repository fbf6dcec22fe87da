//! Inkwell Core Library
//!
//! This crate provides the domain models, error types, configuration and naming
//! helpers shared by every Inkwell component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod naming;

// Re-export commonly used types
pub use config::{
    BaseConfig, CatcherSettings, ClientSettings, Config, EditorConfig, ManagerSettings,
    ScrawlSettings, UploadSettings,
};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    list_state_message, upload_state_message, CrawlOutcome, ListResult, ListState, UploadOptions,
    UploadResult, UploadState,
};
