use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{InferenceClient, InferenceError, InferenceOutput, SummaryRequest, transport_error};

/// Client for Bedrock-style `invoke` endpoints speaking the Titan text contract.
pub struct TitanClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl TitanClient {
    /// Build a client posting to `{base_url}/model/{model}/invoke`.
    pub fn new(http: Client, base_url: String, model: String, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url,
            model,
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/model/{}/invoke",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Deserialize)]
struct TitanResponse {
    #[serde(default)]
    results: Vec<TitanResult>,
}

#[derive(Debug, Deserialize)]
struct TitanResult {
    #[serde(rename = "outputText")]
    output_text: Option<String>,
}

#[async_trait]
impl InferenceClient for TitanClient {
    async fn invoke(&self, request: &SummaryRequest) -> Result<InferenceOutput, InferenceError> {
        let endpoint = self.endpoint();
        let payload = json!({
            "inputText": request.prompt_text,
            "textGenerationConfig": {
                "maxTokenCount": request.max_output_tokens,
                "temperature": request.temperature,
            }
        });

        let mut builder = self
            .http
            .post(&endpoint)
            .header("accept", "application/json")
            .json(&payload);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|error| transport_error(error, &endpoint))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(InferenceError::ProviderUnavailable(format!(
                "model endpoint {endpoint} returned 404"
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::GenerationFailed(format!(
                "provider returned {status}: {body}"
            )));
        }

        let body: TitanResponse = response.json().await.map_err(|error| {
            if error.is_timeout() {
                InferenceError::Timeout(endpoint.clone())
            } else {
                InferenceError::InvalidResponse(format!("failed to decode response: {error}"))
            }
        })?;

        Ok(InferenceOutput {
            output_text: body
                .results
                .into_iter()
                .next()
                .and_then(|result| result.output_text),
        })
    }
}
