use serde::Serialize;
use serde_json::{Value, json};

use super::types::PipelineError;

/// Status code plus exactly one of a summary or an error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    /// HTTP-style status code.
    pub status_code: u16,
    /// Effective content type, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    /// Generated summary, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Caller-facing error message, present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultEnvelope {
    /// Successful envelope with status 200.
    pub fn success(file_type: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            file_type: Some(file_type.into()),
            summary: Some(summary.into()),
            error: None,
        }
    }

    /// Failure envelope carrying the error's status and caller-facing message.
    pub fn from_error(error: &PipelineError) -> Self {
        Self {
            status_code: error.status_code(),
            file_type: None,
            summary: None,
            error: Some(error.to_string()),
        }
    }

    /// True when the envelope carries a summary.
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    /// Response body: `{fileType, summary}` on success, `{error}` otherwise.
    pub fn body(&self) -> Value {
        match (&self.summary, &self.error) {
            (Some(summary), _) => json!({
                "fileType": self.file_type,
                "summary": summary,
            }),
            (None, error) => json!({ "error": error.as_deref().unwrap_or_default() }),
        }
    }
}

impl From<Result<(String, String), PipelineError>> for ResultEnvelope {
    fn from(result: Result<(String, String), PipelineError>) -> Self {
        match result {
            Ok((file_type, summary)) => Self::success(file_type, summary),
            Err(error) => Self::from_error(&error),
        }
    }
}
