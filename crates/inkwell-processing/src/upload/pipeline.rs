//! Upload pipeline: decode → validate → resolve path → persist.
//!
//! Every invocation ends in exactly one [`UploadResult`]. Client payload problems
//! and validation rejections are reported as result states, never as errors,
//! so the caller can always render an envelope.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use chrono::{DateTime, Local, TimeZone};
use rand::Rng;
use std::sync::Arc;

use inkwell_core::{UploadOptions, UploadResult, UploadState};
use inkwell_storage::Storage;

use super::types::UploadForm;
use crate::path_format::format_path;
use crate::validator::UploadValidator;

/// Decoded and validated upload with its resolved storage key.
struct PreparedUpload {
    key: String,
    data: Bytes,
    original_file_name: String,
}

/// Strip an optional `data:<mime>;base64,` prefix and all whitespace.
fn base64_payload(raw: &str) -> String {
    let trimmed = raw.trim();
    let body = match trimmed.strip_prefix("data:") {
        Some(rest) => rest
            .find(";base64,")
            .map(|idx| &rest[idx + ";base64,".len()..])
            .unwrap_or(trimmed),
        None => trimmed,
    };
    body.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

#[derive(Clone)]
pub struct UploadPipeline {
    storage: Arc<dyn Storage>,
}

impl UploadPipeline {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Run the pipeline with the current local time and the thread RNG.
    pub async fn run(&self, options: &UploadOptions, form: &UploadForm) -> UploadResult {
        // The thread RNG is not Send; keep it out of the awaited section.
        let prepared = {
            let mut rng = rand::rng();
            Self::prepare(options, form, &Local::now(), &mut rng)
        };
        match prepared {
            Ok(upload) => self.persist(upload).await,
            Err(result) => result,
        }
    }

    /// Run the pipeline with an explicit instant and random source.
    pub async fn run_with<Tz, R>(
        &self,
        options: &UploadOptions,
        form: &UploadForm,
        now: &DateTime<Tz>,
        rng: &mut R,
    ) -> UploadResult
    where
        Tz: TimeZone,
        R: Rng + ?Sized,
    {
        match Self::prepare(options, form, now, rng) {
            Ok(upload) => self.persist(upload).await,
            Err(result) => result,
        }
    }

    fn prepare<Tz, R>(
        options: &UploadOptions,
        form: &UploadForm,
        now: &DateTime<Tz>,
        rng: &mut R,
    ) -> Result<PreparedUpload, UploadResult>
    where
        Tz: TimeZone,
        R: Rng + ?Sized,
    {
        let (original_file_name, data) = if options.is_base64 {
            Self::decode_base64(options, form)?
        } else {
            Self::decode_multipart(options, form)?
        };

        if !options.is_base64 || options.validate_base64 {
            if let Err(e) = UploadValidator::new(options)
                .validate_all(&original_file_name, data.len() as u64)
            {
                tracing::warn!(
                    file_name = %original_file_name,
                    size_bytes = data.len(),
                    error = %e,
                    "Upload rejected"
                );
                return Err(UploadResult::rejected(e.state()));
            }
        }

        let key = format_path(&original_file_name, &options.path_template, now, rng).map_err(
            |e| {
                tracing::error!(
                    template = %options.path_template,
                    error = %e,
                    "Failed to resolve upload path"
                );
                UploadResult::failure(
                    UploadState::FileAccessError,
                    Some(original_file_name.clone()),
                    e.to_string(),
                )
            },
        )?;

        Ok(PreparedUpload {
            key,
            data,
            original_file_name,
        })
    }

    fn decode_base64(
        options: &UploadOptions,
        form: &UploadForm,
    ) -> Result<(String, Bytes), UploadResult> {
        let file_name = options.base64_file_name.clone();
        let raw = form.field(&options.form_field_name).ok_or_else(|| {
            UploadResult::failure(
                UploadState::NetworkError,
                None,
                format!("Field '{}' is missing", options.form_field_name),
            )
        })?;

        let data = STANDARD.decode(base64_payload(raw)).map_err(|e| {
            tracing::warn!(
                field = %options.form_field_name,
                error = %e,
                "Malformed base64 upload payload"
            );
            UploadResult::failure(
                UploadState::NetworkError,
                Some(file_name.clone()),
                format!("Invalid base64 payload: {}", e),
            )
        })?;

        Ok((file_name, Bytes::from(data)))
    }

    fn decode_multipart(
        options: &UploadOptions,
        form: &UploadForm,
    ) -> Result<(String, Bytes), UploadResult> {
        let part = form.file(&options.form_field_name).ok_or_else(|| {
            UploadResult::failure(
                UploadState::NetworkError,
                None,
                format!("File part '{}' is missing", options.form_field_name),
            )
        })?;
        Ok((part.file_name.clone(), part.data.clone()))
    }

    async fn persist(&self, upload: PreparedUpload) -> UploadResult {
        let PreparedUpload {
            key,
            data,
            original_file_name,
        } = upload;

        match self.storage.put(&key, data).await {
            Ok(stored_path) => UploadResult::success(stored_path, original_file_name),
            Err(e) => {
                tracing::error!(
                    key = %key,
                    file_name = %original_file_name,
                    error = %e,
                    "Failed to store upload"
                );
                UploadResult::failure(
                    UploadState::FileAccessError,
                    Some(original_file_name),
                    e.to_string(),
                )
            }
        }
    }
}
