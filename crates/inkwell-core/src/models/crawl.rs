use crate::constants::STATE_SUCCESS;
use serde::Serialize;

/// Result of fetching one remote source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlOutcome {
    pub source_url: String,
    /// `SUCCESS` or a human-readable failure description.
    pub state: String,
    pub stored_path: Option<String>,
}

impl CrawlOutcome {
    pub fn succeeded(source_url: impl Into<String>, stored_path: String) -> Self {
        Self {
            source_url: source_url.into(),
            state: STATE_SUCCESS.to_string(),
            stored_path: Some(stored_path),
        }
    }

    pub fn failed(source_url: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            state: state.into(),
            stored_path: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.state == STATE_SUCCESS
    }
}
