use crate::config::{ScrawlSettings, UploadSettings};
use crate::constants::SCRAWL_FILE_NAME;
use serde::Serialize;

/// Terminal state of one upload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadState {
    Success,
    SizeLimitExceeded,
    TypeNotAllowed,
    FileAccessError,
    NetworkError,
    /// Sentinel only; a reached code path never returns it.
    Unknown,
}

/// Message reported to the editor for an upload state.
pub fn upload_state_message(state: UploadState) -> &'static str {
    match state {
        UploadState::Success => "SUCCESS",
        UploadState::FileAccessError => {
            "File access error, please check if you have enough rights."
        }
        UploadState::SizeLimitExceeded => "The file size exceeds the server limits.",
        UploadState::TypeNotAllowed => "The file format is not allowed on this server.",
        UploadState::NetworkError => "Network error.",
        UploadState::Unknown => "Unknown error.",
    }
}

/// Per-request upload options, built from configuration for one action.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Lowercase, dot-prefixed extensions.
    pub allowed_extensions: Vec<String>,
    pub path_template: String,
    pub size_limit_bytes: u64,
    pub form_field_name: String,
    pub is_base64: bool,
    /// Filename used for base64 payloads.
    pub base64_file_name: String,
    /// Apply type and size checks to base64 payloads as well.
    pub validate_base64: bool,
}

impl UploadOptions {
    /// Options for a multipart upload action (image, video, file).
    pub fn multipart(settings: &UploadSettings) -> Self {
        Self {
            allowed_extensions: settings.allow_files.clone(),
            path_template: settings.path_format.clone(),
            size_limit_bytes: settings.max_size,
            form_field_name: settings.field_name.clone(),
            is_base64: false,
            base64_file_name: String::new(),
            validate_base64: false,
        }
    }

    /// Options for the base64 scrawl action.
    pub fn scrawl(settings: &ScrawlSettings) -> Self {
        Self {
            allowed_extensions: vec![".png".to_string()],
            path_template: settings.path_format.clone(),
            size_limit_bytes: settings.max_size,
            form_field_name: settings.field_name.clone(),
            is_base64: true,
            base64_file_name: SCRAWL_FILE_NAME.to_string(),
            validate_base64: settings.validate,
        }
    }
}

/// Outcome of one upload attempt.
///
/// Built through the constructors below; the pipeline creates exactly one per
/// invocation and never changes it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResult {
    pub state: UploadState,
    /// Storage-root-relative path of the stored asset.
    pub stored_path: Option<String>,
    pub original_file_name: Option<String>,
    pub error_detail: Option<String>,
}

impl Default for UploadResult {
    fn default() -> Self {
        Self {
            state: UploadState::Unknown,
            stored_path: None,
            original_file_name: None,
            error_detail: None,
        }
    }
}

impl UploadResult {
    pub fn success(stored_path: String, original_file_name: String) -> Self {
        Self {
            state: UploadState::Success,
            stored_path: Some(stored_path),
            original_file_name: Some(original_file_name),
            error_detail: None,
        }
    }

    /// A validation rejection: no detail, no stored path.
    pub fn rejected(state: UploadState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub fn failure(
        state: UploadState,
        original_file_name: Option<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            state,
            stored_path: None,
            original_file_name,
            error_detail: Some(detail.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.state == UploadState::Success
    }

    pub fn message(&self) -> &'static str {
        upload_state_message(self.state)
    }
}
