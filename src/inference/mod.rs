//! Summary request construction and text-generation clients.
//!
//! [`SummaryRequest::build`] wraps extracted text in the fixed instruction prefix with fixed
//! generation parameters. An [`InferenceClient`] sends the request to a provider and returns the
//! provider's output text, which [`InferenceOutput::summary_text`] normalizes.

mod ollama;
mod titan;

pub use ollama::OllamaClient;
pub use titan::TitanClient;

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{Config, InferenceProvider};

/// Instruction prepended to every document before inference.
pub const SUMMARY_PROMPT_PREFIX: &str =
    "Summarize this content in a concise, human-readable way:\n\n";
/// Output token ceiling requested from the provider.
pub const MAX_OUTPUT_TOKENS: u32 = 200;
/// Sampling temperature requested from the provider.
pub const TEMPERATURE: f32 = 0.5;
/// Summary reported when the provider returns no output text.
pub const NO_SUMMARY: &str = "No summary available";

/// Errors surfaced while invoking the text-generation service.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Provider could not be reached.
    #[error("Inference provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Connect or read timeout elapsed.
    #[error("Inference request timed out: {0}")]
    Timeout(String),
    /// Provider returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Prompt and generation parameters sent to the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRequest {
    /// Instruction prefix followed by the extracted text.
    pub prompt_text: String,
    /// Output token ceiling.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl SummaryRequest {
    /// Wrap `text` in the summary instruction. No truncation is applied.
    pub fn build(text: &str) -> Self {
        Self {
            prompt_text: format!("{SUMMARY_PROMPT_PREFIX}{text}"),
            max_output_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

/// Raw provider answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferenceOutput {
    /// First output text returned by the provider, if any.
    pub output_text: Option<String>,
}

impl InferenceOutput {
    /// Provider text trimmed of surrounding whitespace, or [`NO_SUMMARY`] when absent.
    pub fn summary_text(&self) -> String {
        self.output_text
            .as_deref()
            .map(str::trim)
            .unwrap_or(NO_SUMMARY)
            .to_string()
    }
}

/// Interface implemented by text-generation providers.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Send one request. Implementations never retry.
    async fn invoke(&self, request: &SummaryRequest) -> Result<InferenceOutput, InferenceError>;
}

/// Build the inference client selected by `config`.
pub fn client_from_config(config: &Config) -> reqwest::Result<Arc<dyn InferenceClient>> {
    let http = http_client(config)?;
    let client: Arc<dyn InferenceClient> = match config.inference_provider {
        InferenceProvider::Titan => Arc::new(TitanClient::new(
            http,
            config.inference_url.clone(),
            config.inference_model.clone(),
            config.inference_api_key.clone(),
        )),
        InferenceProvider::Ollama => Arc::new(OllamaClient::new(
            http,
            config.inference_url.clone(),
            config.inference_model.clone(),
        )),
    };
    Ok(client)
}

fn http_client(config: &Config) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("rusty-digest/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(config.connect_timeout)
        .timeout(config.read_timeout)
        .build()
}

/// Map a transport error onto the inference taxonomy.
fn transport_error(error: reqwest::Error, endpoint: &str) -> InferenceError {
    if error.is_timeout() {
        InferenceError::Timeout(endpoint.to_string())
    } else {
        InferenceError::ProviderUnavailable(format!("failed to reach {endpoint}: {error}"))
    }
}
