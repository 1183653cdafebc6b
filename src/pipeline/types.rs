//! Inputs, results, and the error taxonomy of a summarization invocation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::acquisition::{AcquisitionError, InlineDecodeError};
use crate::extraction::FormatTag;
use crate::inference::InferenceError;

/// One summarization request.
///
/// `file_url` takes precedence over `body` when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeInput {
    /// Locator of a remote document.
    pub file_url: Option<String>,
    /// Inline document, base64 encoded.
    pub body: Option<String>,
    /// Declared content type of the inline document.
    pub content_type: Option<String>,
    /// File name of the inline document, used to infer its type.
    pub file_name: Option<String>,
}

/// Failures that end an invocation before a summary is produced.
///
/// Display strings are the messages returned to callers.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Neither a file URL nor an inline body was supplied.
    #[error("No file uploaded or URL provided.")]
    MissingInput,
    /// The inline body was not valid base64.
    #[error("Invalid Base64 encoding.")]
    InvalidEncoding(#[from] InlineDecodeError),
    /// The remote document could not be downloaded.
    #[error("Failed to download file from remote object store.")]
    Acquisition(#[from] AcquisitionError),
    /// Extraction produced only whitespace.
    #[error("Uploaded file is empty or unreadable.")]
    EmptyContent,
    /// The text-generation service failed.
    #[error("{0}")]
    Inference(#[from] InferenceError),
    /// Anything unanticipated.
    #[error("{0}")]
    Internal(String),
}

impl PipelineError {
    /// HTTP-style status code reported for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingInput
            | Self::InvalidEncoding(_)
            | Self::Acquisition(_)
            | Self::EmptyContent => 400,
            Self::Inference(_) | Self::Internal(_) => 500,
        }
    }
}

/// Resolution result for a declared type and source hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    /// Effective content type string.
    pub file_type: String,
    /// Extractor family selected for that type.
    pub format: FormatTag,
}
