//! Content-type resolution and format-specific text extraction.
//!
//! The [`Dispatcher`] is the boundary of this module: it resolves a [`FormatTag`] for a
//! [`RawDocument`], runs the matching extractor, and always answers with an
//! [`ExtractionOutcome`]. Extractor errors become failure outcomes carrying their sentinel text,
//! and panics raised inside third-party parsers are caught and reported the same way.

pub mod image;
pub mod pdf;
pub mod resolver;
pub mod table;
pub mod text;
pub mod types;
pub mod word;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

pub use self::image::{OcrEngine, OcrError, TesseractCli};
pub use resolver::{classify, resolve, resolve_content_type};
pub use types::{
    ExtractionError, ExtractionErrorKind, ExtractionOutcome, FormatDescriptor, FormatTag,
    RawDocument, UNSUPPORTED_FORMAT, format_catalog,
};

/// Selects and runs the extractor for a document's format.
#[derive(Clone)]
pub struct Dispatcher {
    ocr: Arc<dyn OcrEngine>,
}

impl Dispatcher {
    /// Build a dispatcher that uses `ocr` for image documents.
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self { ocr }
    }

    /// Resolve the document's format and extract its text.
    pub fn extract(&self, doc: &RawDocument) -> ExtractionOutcome {
        let tag = resolve(doc.declared_type(), doc.source_hint());
        self.extract_as(doc.bytes(), tag)
    }

    /// Extract text from `bytes` using the extractor selected by `tag`.
    pub fn extract_as(&self, bytes: &[u8], tag: FormatTag) -> ExtractionOutcome {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.run_extractor(bytes, tag)));
        let outcome = match result {
            Ok(Ok(text)) => ExtractionOutcome::success(text),
            Ok(Err(error)) => {
                tracing::warn!(
                    format = %tag,
                    kind = ?error.kind,
                    cause = %error.cause,
                    "Extraction failed"
                );
                ExtractionOutcome::from(error)
            }
            Err(payload) => {
                let cause = panic_message(payload.as_ref());
                tracing::error!(format = %tag, %cause, "Extractor panicked");
                ExtractionOutcome::from(ExtractionError::new(ExtractionErrorKind::Internal, cause))
            }
        };
        tracing::debug!(
            format = %tag,
            bytes = bytes.len(),
            failed = outcome.is_failure(),
            chars = outcome.text().len(),
            "Extraction finished"
        );
        outcome
    }

    fn run_extractor(&self, bytes: &[u8], tag: FormatTag) -> Result<String, ExtractionError> {
        match tag {
            FormatTag::PlainText => text::extract(bytes),
            FormatTag::DelimitedTable => table::extract(bytes),
            FormatTag::PortableDocument => pdf::extract(bytes),
            FormatTag::WordProcessorDocument => word::extract(bytes),
            FormatTag::Image => self::image::extract(bytes, self.ocr.as_ref()),
            FormatTag::Unsupported => Ok(UNSUPPORTED_FORMAT.to_string()),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Arc::new(TesseractCli::default()))
    }
}

/// Render a caught panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
