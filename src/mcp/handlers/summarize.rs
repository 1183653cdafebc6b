//! Handler for the `summarize-document` tool.
//!
//! The tool accepts the same shapes as `POST /analyze`. A 200 envelope becomes a structured
//! result; 400 and 500 envelopes become structured error results carrying the same envelope, so
//! hosts see the caller-facing message instead of a protocol fault.

use std::sync::Arc;

use crate::pipeline::{PipelineApi, SummarizeInput};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use schemars::JsonSchema;
use serde::Deserialize;

use super::parse_arguments;

/// Request payload accepted by the `summarize-document` tool.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SummarizeToolRequest {
    /// URL of the document to download (takes precedence over body).
    #[serde(default, alias = "file_url")]
    pub(crate) file_url: Option<String>,
    /// Standard base64 encoding of the document bytes.
    #[serde(default)]
    pub(crate) body: Option<String>,
    /// Declared MIME type of the inline body; generic values fall back to fileName.
    #[serde(default, alias = "content_type")]
    pub(crate) content_type: Option<String>,
    /// File name of the inline body, used to infer its type from the extension.
    #[serde(default, alias = "file_name")]
    pub(crate) file_name: Option<String>,
}

pub(crate) async fn handle_summarize(
    pipeline: &Arc<dyn PipelineApi>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let SummarizeToolRequest {
        file_url,
        body,
        content_type,
        file_name,
    } = parse_arguments(arguments)?;

    let envelope = pipeline
        .summarize(SummarizeInput {
            file_url,
            body,
            content_type,
            file_name,
        })
        .await;

    let payload = serde_json::to_value(&envelope)
        .map_err(|err| McpError::internal_error(err.to_string(), None))?;
    if envelope.is_success() {
        Ok(CallToolResult::structured(payload))
    } else {
        Ok(CallToolResult::structured_error(payload))
    }
}
