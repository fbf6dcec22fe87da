//! Inkwell Infrastructure Library
//!
//! Shared infrastructure for the editor handler service:
//! - Middleware (request ID, security headers)
//! - Tracing initialization

pub mod middleware;
pub mod telemetry;

// Re-export commonly used types
pub use middleware::{get_request_id, request_id_middleware, security_headers_middleware};
pub use telemetry::{init_telemetry, LogFormat};
