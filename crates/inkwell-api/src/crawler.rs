//! Remote image fetching for the `catchimage` action.
//!
//! Each source is fetched independently: a failure becomes that source's
//! [`CrawlOutcome`] state and never affects the other sources of a batch.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use futures::future::join_all;
use futures::TryStreamExt;
use percent_encoding::percent_decode_str;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use tokio_util::io::StreamReader;

use inkwell_core::naming::file_extension;
use inkwell_core::{CatcherSettings, CrawlOutcome};
use inkwell_processing::{format_path, PathFormatError};
use inkwell_storage::{Storage, StorageError};

use crate::constants::DEFAULT_REMOTE_FILE_NAME;
use crate::utils::ssrf_validation::validate_url_for_ssrf;

const MAX_REDIRECTS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Blocked URL: {0}")]
    Blocked(String),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Path(#[from] PathFormatError),

    #[error("{0}")]
    Storage(#[from] StorageError),
}

/// Name to store a fetched image under: the last URL path segment, with an
/// extension derived from the MIME type when the segment has none.
fn remote_file_name(url: &Url, content_type: &str) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_REMOTE_FILE_NAME.to_string());

    if !file_extension(&segment).is_empty() {
        return segment;
    }

    let subtype = content_type
        .split(';')
        .next()
        .and_then(|mime| mime.trim().split('/').nth(1))
        .map(|sub| sub.split('+').next().unwrap_or(sub).trim())
        .filter(|sub| !sub.is_empty() && sub.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));

    match subtype {
        Some(sub) => format!("{}.{}", segment, sub),
        None => segment,
    }
}

#[derive(Clone)]
pub struct RemoteFetcher {
    client: reqwest::Client,
    storage: Arc<dyn Storage>,
    settings: CatcherSettings,
}

impl RemoteFetcher {
    pub fn new(storage: Arc<dyn Storage>, settings: CatcherSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self {
            client,
            storage,
            settings,
        })
    }

    /// Fetch one remote image into storage.
    #[tracing::instrument(skip(self), fields(operation = "catch_image"))]
    pub async fn fetch(&self, source_url: &str) -> CrawlOutcome {
        match self.try_fetch(source_url).await {
            Ok(outcome) => {
                if !outcome.is_success() {
                    tracing::warn!(source = %source_url, state = %outcome.state, "Remote image rejected");
                }
                outcome
            }
            Err(e) => {
                tracing::warn!(source = %source_url, error = %e, "Remote image fetch failed");
                CrawlOutcome::failed(source_url, format!("Fetch failed: {}", e))
            }
        }
    }

    /// Fetch every source concurrently; outcomes keep the input order.
    pub async fn fetch_all(&self, sources: &[String]) -> Vec<CrawlOutcome> {
        join_all(sources.iter().map(|source| self.fetch(source))).await
    }

    async fn try_fetch(&self, source_url: &str) -> Result<CrawlOutcome, FetchError> {
        let url = Url::parse(source_url.trim()).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(FetchError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }
        if self.settings.block_private_networks {
            validate_url_for_ssrf(&url).await.map_err(FetchError::Blocked)?;
        }

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(CrawlOutcome::failed(
                source_url,
                format!(
                    "Url returns {}, {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();
        if !content_type.contains("image") {
            return Ok(CrawlOutcome::failed(source_url, "Url is not an image"));
        }

        let file_name = remote_file_name(&url, &content_type);
        let key = {
            let mut rng = rand::rng();
            format_path(&file_name, &self.settings.path_format, &Local::now(), &mut rng)?
        };

        let body = response.bytes_stream().map_err(io::Error::other);
        let reader = StreamReader::new(Box::pin(body));
        let max_bytes = (self.settings.max_size > 0).then_some(self.settings.max_size);

        let written = self
            .storage
            .put_stream(&key, Box::pin(reader), max_bytes)
            .await?;

        tracing::info!(
            source = %source_url,
            key = %key,
            size_bytes = written,
            "Remote image stored"
        );

        Ok(CrawlOutcome::succeeded(source_url, key))
    }
}
