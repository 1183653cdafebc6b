//! Handler for the metrics tool.

use std::sync::Arc;

use crate::pipeline::PipelineApi;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use serde_json::json;

/// Handle the `metrics` tool, returning the current summarization counters.
pub(crate) async fn handle_metrics(
    pipeline: &Arc<dyn PipelineApi>,
) -> Result<CallToolResult, McpError> {
    let snapshot = pipeline.metrics_snapshot();
    Ok(CallToolResult::structured(json!({
        "summarized": snapshot.summarized,
        "rejected": snapshot.rejected,
        "failed": snapshot.failed,
        "extractionFallbacks": snapshot.extraction_fallbacks,
    })))
}
