//! Core data types shared by the resolver, the dispatcher, and the format extractors.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Literal reported as extracted content when no extractor handles the format.
pub const UNSUPPORTED_FORMAT: &str = "Unsupported file format";

/// Raw bytes supplied to the pipeline together with their typing hints.
///
/// A document is owned by the invocation that created it and never shared across requests.
#[derive(Debug, Clone)]
pub struct RawDocument {
    bytes: Vec<u8>,
    declared_type: Option<String>,
    source_hint: Option<String>,
}

impl RawDocument {
    /// Build a document from its bytes, declared content type, and a locator or file name.
    pub fn new(bytes: Vec<u8>, declared_type: Option<String>, source_hint: Option<String>) -> Self {
        Self {
            bytes,
            declared_type,
            source_hint,
        }
    }

    /// Raw document contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Content type declared by the uploader or the object store, if any.
    pub fn declared_type(&self) -> Option<&str> {
        self.declared_type.as_deref()
    }

    /// Locator or file name used to infer a type when the declared one is unusable.
    pub fn source_hint(&self) -> Option<&str> {
        self.source_hint.as_deref()
    }

    /// Consume the document, returning the owned bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Closed classification of a document's content family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatTag {
    /// Plain text and source code.
    PlainText,
    /// Comma-delimited tables.
    DelimitedTable,
    /// PDF documents with a text layer.
    PortableDocument,
    /// Word-processor documents (DOCX).
    WordProcessorDocument,
    /// Raster images routed through optical character recognition.
    Image,
    /// Anything without a matching extractor.
    Unsupported,
}

impl FormatTag {
    /// Every tag, in classification precedence order.
    pub const ALL: [FormatTag; 6] = [
        FormatTag::PortableDocument,
        FormatTag::DelimitedTable,
        FormatTag::PlainText,
        FormatTag::WordProcessorDocument,
        FormatTag::Image,
        FormatTag::Unsupported,
    ];

    /// Stable snake_case label used in logs and API payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            FormatTag::PlainText => "plain_text",
            FormatTag::DelimitedTable => "delimited_table",
            FormatTag::PortableDocument => "portable_document",
            FormatTag::WordProcessorDocument => "word_processor_document",
            FormatTag::Image => "image",
            FormatTag::Unsupported => "unsupported",
        }
    }

    /// Catalog entry describing how the tag is selected and what it extracts.
    pub fn descriptor(self) -> FormatDescriptor {
        let (markers, example_types, description): (&[&str], &[&str], &str) = match self {
            FormatTag::PortableDocument => (
                &["pdf"],
                &["application/pdf"],
                "Text layer of PDF documents. Scanned pages without text yield nothing.",
            ),
            FormatTag::DelimitedTable => (
                &["csv"],
                &["text/csv"],
                "UTF-8 comma-separated rows, cells joined with \" | \" and rows with newlines.",
            ),
            FormatTag::PlainText => (
                &["plain", "text"],
                &["text/plain", "text/markdown", "text/x-python"],
                "Text and source files in any detectable encoding.",
            ),
            FormatTag::WordProcessorDocument => (
                &["msword", "vnd.openxmlformats-officedocument.wordprocessingml.document"],
                &["application/vnd.openxmlformats-officedocument.wordprocessingml.document"],
                "Body paragraphs of DOCX documents. Legacy binary .doc files are not readable.",
            ),
            FormatTag::Image => (
                &["image"],
                &["image/png", "image/jpeg", "image/tiff"],
                "Optical character recognition over raster images.",
            ),
            FormatTag::Unsupported => (
                &[],
                &["application/zip", "audio/mpeg"],
                "Reported as the literal \"Unsupported file format\".",
            ),
        };
        FormatDescriptor {
            format: self,
            markers,
            example_types,
            description,
        }
    }
}

/// Catalog entry for one extractor family.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatDescriptor {
    /// Tag the entry describes.
    pub format: FormatTag,
    /// Case-insensitive substrings of a content type that select the tag.
    pub markers: &'static [&'static str],
    /// Representative content types.
    pub example_types: &'static [&'static str],
    /// Human-readable summary of the extractor.
    pub description: &'static str,
}

/// Catalog of every format, in classification precedence order.
pub fn format_catalog() -> Vec<FormatDescriptor> {
    FormatTag::ALL.iter().map(|tag| tag.descriptor()).collect()
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of an extraction fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionErrorKind {
    /// Text bytes could not be decoded. Malformed sequences are dropped, so this is raised only
    /// when the decoder cannot size its output for the input.
    TextDecoding,
    /// Delimited table could not be parsed.
    TableParsing,
    /// PDF text layer could not be read.
    PdfParsing,
    /// Word-processor container or markup was unreadable.
    WordParsing,
    /// Image could not be decoded or recognized.
    ImageRecognition,
    /// Unanticipated fault raised inside an extractor.
    Internal,
}

impl ExtractionErrorKind {
    /// Fixed text reported in place of content for this kind of fault.
    pub fn sentinel(self) -> &'static str {
        match self {
            ExtractionErrorKind::TextDecoding => "Error extracting text from code file",
            ExtractionErrorKind::TableParsing => "Error extracting CSV content",
            ExtractionErrorKind::PdfParsing => {
                "Error: Unable to extract text from PDF, possibly corrupted."
            }
            ExtractionErrorKind::WordParsing => "Error extracting text from Word document",
            ExtractionErrorKind::ImageRecognition => "Error extracting text from image",
            ExtractionErrorKind::Internal => "Error reading file",
        }
    }
}

/// Typed fault produced by a format extractor before it is folded into an outcome.
#[derive(Debug, Error)]
#[error("{kind:?}: {cause}")]
pub struct ExtractionError {
    /// Fault category.
    pub kind: ExtractionErrorKind,
    /// Human-readable cause, kept for logs.
    pub cause: String,
}

impl ExtractionError {
    /// Construct an extraction error of the given kind.
    pub fn new(kind: ExtractionErrorKind, cause: impl Into<String>) -> Self {
        Self {
            kind,
            cause: cause.into(),
        }
    }
}

/// Result of turning a document into text: content or a structured failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// Extracted text; may be empty, the caller decides what emptiness means.
    Success {
        /// Normalized text.
        text: String,
    },
    /// Extraction failed; `message` carries the sentinel reported downstream.
    Failure {
        /// Fault category.
        kind: ExtractionErrorKind,
        /// Sentinel text standing in for content.
        message: String,
    },
}

impl ExtractionOutcome {
    /// Successful outcome carrying `text`.
    pub fn success(text: impl Into<String>) -> Self {
        ExtractionOutcome::Success { text: text.into() }
    }

    /// Failure outcome whose message is the kind's sentinel.
    pub fn failure(kind: ExtractionErrorKind) -> Self {
        ExtractionOutcome::Failure {
            kind,
            message: kind.sentinel().to_string(),
        }
    }

    /// Whether this outcome is the failure branch.
    pub fn is_failure(&self) -> bool {
        matches!(self, ExtractionOutcome::Failure { .. })
    }

    /// Text that flows downstream: the extracted content or the failure sentinel.
    pub fn text(&self) -> &str {
        match self {
            ExtractionOutcome::Success { text } => text,
            ExtractionOutcome::Failure { message, .. } => message,
        }
    }

    /// Consume the outcome, returning the downstream text.
    pub fn into_text(self) -> String {
        match self {
            ExtractionOutcome::Success { text } => text,
            ExtractionOutcome::Failure { message, .. } => message,
        }
    }
}

impl From<ExtractionError> for ExtractionOutcome {
    fn from(error: ExtractionError) -> Self {
        match error.kind {
            ExtractionErrorKind::Internal => ExtractionOutcome::Failure {
                kind: error.kind,
                message: format!("{}: {}", error.kind.sentinel(), error.cause),
            },
            kind => ExtractionOutcome::failure(kind),
        }
    }
}
