use serde::Serialize;

/// Terminal state of one listing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListState {
    Success,
    InvalidParam,
    AuthorizationError,
    IOError,
    PathNotFound,
}

/// Message reported to the editor for a listing state.
pub fn list_state_message(state: ListState) -> &'static str {
    match state {
        ListState::Success => "SUCCESS",
        ListState::InvalidParam => "Invalid parameter.",
        ListState::PathNotFound => "Path not found.",
        ListState::AuthorizationError => "Insufficient privilege for file system.",
        ListState::IOError => "File system read error.",
    }
}

/// One page of an asset listing.
///
/// On success `entries.len() <= page_size` and, whenever `start < total`,
/// `start + entries.len() <= total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListResult {
    pub state: ListState,
    /// Storage-root-relative paths, `/` separated.
    pub entries: Vec<String>,
    pub start: usize,
    pub page_size: usize,
    pub total: usize,
}

impl ListResult {
    pub fn page(entries: Vec<String>, start: usize, page_size: usize, total: usize) -> Self {
        Self {
            state: ListState::Success,
            entries,
            start,
            page_size,
            total,
        }
    }

    /// A failed listing: no entries, zero total, parameters echoed back.
    pub fn failed(state: ListState, start: usize, page_size: usize) -> Self {
        Self {
            state,
            entries: Vec::new(),
            start,
            page_size,
            total: 0,
        }
    }

    pub fn message(&self) -> &'static str {
        list_state_message(self.state)
    }
}
