use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_INFERENCE_MODEL: &str = "amazon.titan-tg1-large";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Rusty Digest server.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the text-generation service.
    pub inference_url: String,
    /// Wire contract spoken by the text-generation service.
    pub inference_provider: InferenceProvider,
    /// Model identifier passed to the provider.
    pub inference_model: String,
    /// Optional bearer token attached to inference requests.
    pub inference_api_key: Option<String>,
    /// Connect timeout applied to document downloads and inference calls.
    pub connect_timeout: Duration,
    /// Read timeout applied to document downloads and inference calls.
    pub read_timeout: Duration,
    /// Executable used for optical character recognition.
    pub tesseract_cmd: String,
    /// Tesseract language pack.
    pub ocr_language: String,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

/// Supported text-generation backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferenceProvider {
    /// Bedrock-style `invoke` endpoint speaking the Titan text contract.
    Titan,
    /// Local Ollama runtime.
    Ollama,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            inference_url: load_env("INFERENCE_URL")?,
            inference_provider: load_env_optional("INFERENCE_PROVIDER")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|()| ConfigError::InvalidValue("INFERENCE_PROVIDER".into()))
                })
                .transpose()?
                .unwrap_or(InferenceProvider::Titan),
            inference_model: load_env_optional("INFERENCE_MODEL")
                .unwrap_or_else(|| DEFAULT_INFERENCE_MODEL.to_string()),
            inference_api_key: load_env_optional("INFERENCE_API_KEY"),
            connect_timeout: load_secs("CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
            read_timeout: load_secs("READ_TIMEOUT_SECS", DEFAULT_READ_TIMEOUT_SECS)?,
            tesseract_cmd: load_env_optional("TESSERACT_CMD")
                .unwrap_or_else(|| "tesseract".to_string()),
            ocr_language: load_env_optional("OCR_LANGUAGE").unwrap_or_else(|| "eng".to_string()),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    load_env_optional(key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn load_secs(key: &str, default: u64) -> Result<Duration, ConfigError> {
    let secs = match load_env_optional(key) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| ConfigError::InvalidValue(key.to_string()))?,
        None => default,
    };
    Ok(Duration::from_secs(secs))
}

impl std::str::FromStr for InferenceProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "titan" | "bedrock" => Ok(Self::Titan),
            "ollama" => Ok(Self::Ollama),
            _ => Err(()),
        }
    }
}

impl InferenceProvider {
    /// Lowercase label used in logs and health payloads.
    pub fn label(self) -> &'static str {
        match self {
            Self::Titan => "titan",
            Self::Ollama => "ollama",
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        inference_url = %config.inference_url,
        provider = config.inference_provider.label(),
        model = %config.inference_model,
        connect_timeout = ?config.connect_timeout,
        read_timeout = ?config.read_timeout,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!("Titan".parse(), Ok(InferenceProvider::Titan));
        assert_eq!("bedrock".parse(), Ok(InferenceProvider::Titan));
        assert_eq!(" OLLAMA ".parse(), Ok(InferenceProvider::Ollama));
        assert_eq!("openai".parse::<InferenceProvider>(), Err(()));
    }

    #[test]
    fn timeouts_fall_back_to_defaults() {
        let secs = load_secs("RUSTY_DIGEST_TEST_UNSET_TIMEOUT", 30).expect("default");
        assert_eq!(secs, Duration::from_secs(30));
    }
}
