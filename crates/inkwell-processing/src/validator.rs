use inkwell_core::naming::file_extension;
use inkwell_core::{UploadOptions, UploadState};

/// Reasons an upload is rejected before anything is written
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid file extension: '{extension}' (allowed: {allowed:?})")]
    TypeNotAllowed {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("File too large: {size} bytes (limit: {limit} bytes)")]
    SizeLimitExceeded { size: u64, limit: u64 },
}

impl ValidationError {
    /// Upload state reported for this rejection.
    pub fn state(&self) -> UploadState {
        match self {
            ValidationError::TypeNotAllowed { .. } => UploadState::TypeNotAllowed,
            ValidationError::SizeLimitExceeded { .. } => UploadState::SizeLimitExceeded,
        }
    }
}

/// Extension allow-list and size ceiling checks for one upload action.
pub struct UploadValidator<'a> {
    options: &'a UploadOptions,
}

impl<'a> UploadValidator<'a> {
    pub fn new(options: &'a UploadOptions) -> Self {
        Self { options }
    }

    /// Validate the file extension against the allow-list
    ///
    /// An empty allow-list rejects every file. Configured extensions are never
    /// blank, so a name without an extension never matches.
    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let extension = file_extension(filename);
        let allowed = self
            .options
            .allowed_extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(&extension));

        if !allowed {
            return Err(ValidationError::TypeNotAllowed {
                extension,
                allowed: self.options.allowed_extensions.clone(),
            });
        }

        Ok(())
    }

    /// Validate file size; a file exactly at the limit is rejected.
    pub fn validate_size(&self, size: u64) -> Result<(), ValidationError> {
        if size >= self.options.size_limit_bytes {
            return Err(ValidationError::SizeLimitExceeded {
                size,
                limit: self.options.size_limit_bytes,
            });
        }
        Ok(())
    }

    /// Type check first, then size; the first failure wins.
    pub fn validate_all(&self, filename: &str, size: u64) -> Result<(), ValidationError> {
        self.validate_extension(filename)?;
        self.validate_size(size)
    }
}

pub fn check_file_type(options: &UploadOptions, filename: &str) -> bool {
    UploadValidator::new(options)
        .validate_extension(filename)
        .is_ok()
}

pub fn check_file_size(options: &UploadOptions, size: u64) -> bool {
    UploadValidator::new(options).validate_size(size).is_ok()
}
