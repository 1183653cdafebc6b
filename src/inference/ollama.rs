use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{InferenceClient, InferenceError, InferenceOutput, SummaryRequest, transport_error};

/// Client for a local Ollama runtime.
pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Build a client posting to `{base_url}/api/generate`.
    pub fn new(http: Client, base_url: String, model: String) -> Self {
        Self {
            http,
            base_url,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: Option<String>,
    #[serde(default)]
    done: bool,
}

#[async_trait]
impl InferenceClient for OllamaClient {
    async fn invoke(&self, request: &SummaryRequest) -> Result<InferenceOutput, InferenceError> {
        let endpoint = self.endpoint();
        let payload = json!({
            "model": self.model,
            "prompt": request.prompt_text,
            "stream": false,
            "options": {
                "temperature": request.temperature,
                "num_predict": request.max_output_tokens,
            }
        });

        let response = self
            .http
            .post(&endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|error| transport_error(error, &endpoint))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(InferenceError::ProviderUnavailable(format!(
                "Ollama endpoint {endpoint} returned 404"
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            InferenceError::InvalidResponse(format!("failed to decode Ollama response: {error}"))
        })?;

        if !body.done {
            return Err(InferenceError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        Ok(InferenceOutput {
            output_text: body.response,
        })
    }
}
