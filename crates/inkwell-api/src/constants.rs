//! HTTP-level constants of the editor protocol.

/// Reported when the `action` query parameter is missing or unknown.
pub const MSG_UNSUPPORTED_ACTION: &str = "Parameter 'action' is null or unsupported.";

/// Reported by `catchimage` when no source URL was submitted.
pub const MSG_MISSING_SOURCE: &str = "Invalid parameter: the source to fetch is not set.";

/// Reported when the JSONP callback name is not a plain identifier path.
pub const MSG_INVALID_CALLBACK: &str = "callback parameter is invalid.";

/// Room for multipart boundaries and headers on top of the largest file limit.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

pub const CONTENT_TYPE_JSON_TEXT: &str = "text/plain; charset=utf-8";
pub const CONTENT_TYPE_JAVASCRIPT: &str = "application/javascript; charset=utf-8";

/// Name used for a fetched image whose URL has no final path segment.
pub const DEFAULT_REMOTE_FILE_NAME: &str = "remote";
