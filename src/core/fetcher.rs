//! Sheet text fetching
//!
//! The catalog only needs "give me the whole CSV text for this source". Two
//! sources are supported:
//! - published spreadsheet exports over HTTP(S)
//! - local CSV files (offline copies, `file://` URLs)
//!
//! Failures are reported once and never retried here; the caller decides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::utils::encoding::{charset_from_content_type, decode_text};
use crate::utils::network::{get_user_agent, DEFAULT_TIMEOUT};
use crate::utils::validation::is_http_url;

/// Upstream fetch failures
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch data: {code} {reason}")]
    Status { code: u16, reason: String },

    #[error("Failed to fetch data: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid data source: {0}")]
    InvalidSource(String),
}

impl FetchError {
    /// HTTP status code, when the server answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Anything that can produce the raw CSV text for a source
#[async_trait]
pub trait TextFetcher: Send + Sync {
    async fn fetch_text(&self, source: &str) -> Result<String, FetchError>;
}

/// HTTP fetcher settings
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: get_user_agent(),
        }
    }
}

/// Fetches published sheet exports over HTTP(S)
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TextFetcher for HttpFetcher {
    async fn fetch_text(&self, source: &str) -> Result<String, FetchError> {
        info!("Fetching sheet export: {}", source);

        let response = self.client.get(source).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;
        debug!("Received {} bytes ({:?})", body.len(), content_type);

        let charset = content_type.as_deref().and_then(charset_from_content_type);
        Ok(decode_text(&body, charset))
    }
}

/// Reads a local CSV export
#[derive(Debug, Default, Clone, Copy)]
pub struct FileFetcher;

impl FileFetcher {
    fn resolve_path(source: &str) -> Result<PathBuf, FetchError> {
        let trimmed = source.trim();
        if trimmed.starts_with("file://") {
            let url = Url::parse(trimmed)
                .map_err(|e| FetchError::InvalidSource(format!("{trimmed}: {e}")))?;
            return url
                .to_file_path()
                .map_err(|_| FetchError::InvalidSource(trimmed.to_string()));
        }
        if trimmed.is_empty() {
            return Err(FetchError::InvalidSource("empty source".to_string()));
        }
        Ok(Path::new(trimmed).to_path_buf())
    }
}

#[async_trait]
impl TextFetcher for FileFetcher {
    async fn fetch_text(&self, source: &str) -> Result<String, FetchError> {
        let path = Self::resolve_path(source)?;
        info!("Reading sheet export: {}", path.display());

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|err| FetchError::Io {
                path: path.clone(),
                source: err,
            })?;
        Ok(decode_text(&bytes, None))
    }
}

/// Pick the fetcher matching a source string
pub fn fetcher_for(source: &str, config: &FetcherConfig) -> Result<Box<dyn TextFetcher>, FetchError> {
    if is_http_url(source) {
        Ok(Box::new(HttpFetcher::new(config)?))
    } else {
        Ok(Box::new(FileFetcher))
    }
}
