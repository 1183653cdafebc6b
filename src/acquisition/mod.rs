//! Document acquisition: remote downloads and inline base64 payloads.
//!
//! A [`ContentFetcher`] retrieves the bytes behind a file URL. The HTTP implementation applies
//! the configured connect and read timeouts and treats any non-success status, transport error,
//! timeout, or empty body as a failed download. Inline payloads go through [`decode_inline`].

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use sha2::{Digest, Sha256};
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

/// Errors raised while downloading a remote document.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// Transport-level failure (DNS, connection refused, TLS, body read).
    #[error("Failed to reach {url}: {message}")]
    Http {
        /// Requested location.
        url: String,
        /// Underlying transport error.
        message: String,
    },
    /// Connect or read timeout elapsed.
    #[error("Timed out fetching {0}")]
    Timeout(String),
    /// Remote answered with a non-success status.
    #[error("{url} returned {status}")]
    UnexpectedStatus {
        /// Requested location.
        url: String,
        /// HTTP status code received.
        status: u16,
    },
    /// Remote answered successfully with zero bytes.
    #[error("{0} returned an empty body")]
    EmptyBody(String),
}

/// Errors raised while decoding an inline base64 payload.
#[derive(Debug, Error)]
pub enum InlineDecodeError {
    /// The payload is not valid standard base64.
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The payload was not a JSON string.
    #[error("Inline payload must be a base64 string")]
    NotText,
}

/// Bytes retrieved from a remote location plus the content type it advertised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedContent {
    /// Raw document bytes. Never empty.
    pub bytes: Vec<u8>,
    /// `Content-Type` header returned by the remote, if any.
    pub content_type: Option<String>,
}

/// Retrieves document bytes from a URL.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the document behind `url`.
    async fn fetch(&self, url: &str) -> Result<FetchedContent, AcquisitionError>;
}

/// [`ContentFetcher`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    /// Build a fetcher applying the given connect and overall read timeouts.
    pub fn new(connect_timeout: Duration, read_timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("rusty-digest/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(connect_timeout)
            .timeout(read_timeout)
            .build()?;
        Ok(Self { http })
    }

    /// Build a fetcher from the runtime configuration.
    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        Self::new(config.connect_timeout, config.read_timeout)
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedContent, AcquisitionError> {
        let transport = |error: reqwest::Error| {
            if error.is_timeout() {
                AcquisitionError::Timeout(url.to_string())
            } else {
                AcquisitionError::Http {
                    url: url.to_string(),
                    message: error.to_string(),
                }
            }
        };

        let response = self.http.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(AcquisitionError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await.map_err(transport)?;
        if bytes.is_empty() {
            return Err(AcquisitionError::EmptyBody(url.to_string()));
        }

        tracing::debug!(
            bytes = bytes.len(),
            content_type = content_type.as_deref().unwrap_or(""),
            "Downloaded document"
        );
        Ok(FetchedContent {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

/// Decode a standard-alphabet base64 body, ignoring embedded ASCII whitespace.
pub fn decode_inline(body: &str) -> Result<Vec<u8>, InlineDecodeError> {
    let compact: String = body
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    Ok(STANDARD.decode(compact)?)
}

/// Hex-encoded SHA-256 of the document bytes, used to correlate logs without logging content.
pub fn content_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
