//! Handler for the `detect-format` tool.

use std::sync::Arc;

use crate::pipeline::PipelineApi;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use schemars::JsonSchema;
use serde::Deserialize;

use super::parse_arguments;

/// Request payload accepted by the `detect-format` tool.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DetectToolRequest {
    /// Declared content type, possibly generic such as binary/octet-stream.
    #[serde(default, alias = "content_type")]
    pub(crate) content_type: Option<String>,
    /// File name or URL whose extension is used when the declared type is generic.
    #[serde(default, alias = "file_name", alias = "fileUrl", alias = "file_url")]
    pub(crate) file_name: Option<String>,
}

/// Resolve the effective type and extractor family.
pub(crate) async fn handle_detect(
    pipeline: &Arc<dyn PipelineApi>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: DetectToolRequest = parse_arguments(arguments)?;
    if args.content_type.is_none() && args.file_name.is_none() {
        return Err(McpError::invalid_params(
            "Provide `contentType`, `fileName`, or both",
            None,
        ));
    }
    let report = pipeline.detect(args.content_type.as_deref(), args.file_name.as_deref());
    let payload = serde_json::to_value(&report)
        .map_err(|err| McpError::internal_error(err.to_string(), None))?;
    Ok(CallToolResult::structured(payload))
}
