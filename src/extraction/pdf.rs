//! PDF text-layer extraction.
//!
//! Reads the text shown by `Tj`/`TJ` operators page by page with lopdf. Nothing here writes to
//! stdout, which the MCP binary reserves for protocol frames. Scanned PDFs without a text layer
//! come back empty; no OCR fallback is attempted here.

use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;

use super::panic_message;
use super::types::{ExtractionError, ExtractionErrorKind};

/// Extract the text layer of a PDF document, pages in order.
///
/// Pages whose content cannot be decoded are skipped; the document fails only when it cannot be
/// parsed or when every page fails.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    // The parser panics on some malformed inputs instead of returning an error.
    panic::catch_unwind(AssertUnwindSafe(|| extract_pages(bytes))).unwrap_or_else(|payload| {
        Err(pdf_error(format!(
            "pdf parser panicked: {}",
            panic_message(payload.as_ref())
        )))
    })
}

fn extract_pages(bytes: &[u8]) -> Result<String, ExtractionError> {
    let document =
        Document::load_mem(bytes).map_err(|e| pdf_error(format!("Failed to parse PDF: {e}")))?;
    let pages: Vec<u32> = document.get_pages().into_keys().collect();
    if pages.is_empty() {
        return Err(pdf_error("PDF has no pages".into()));
    }

    let mut text = String::new();
    let mut failed = 0;
    for page in &pages {
        match document.extract_text(&[*page]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(error) => {
                failed += 1;
                tracing::debug!(page, %error, "Skipping unreadable PDF page");
            }
        }
    }

    if failed == pages.len() {
        return Err(pdf_error(format!("none of {} pages could be read", pages.len())));
    }
    Ok(text)
}

fn pdf_error(cause: String) -> ExtractionError {
    ExtractionError::new(ExtractionErrorKind::PdfParsing, cause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    fn pdf_with_pages(lines: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let mut kids: Vec<Object> = Vec::new();
        for line in lines {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("content stream"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }
        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("serialize pdf");
        bytes
    }

    #[test]
    fn reads_text_layer() {
        let text = extract(&pdf_with_pages(&["Hello quarterly report"])).expect("pdf text");
        assert_eq!(text.trim(), "Hello quarterly report");
    }

    #[test]
    fn pages_are_read_in_order() {
        let text = extract(&pdf_with_pages(&["First page", "Second page"])).expect("pdf text");
        assert_eq!(text, "First page\nSecond page\n");
    }

    #[test]
    fn document_without_pages_is_a_pdf_error() {
        let error = extract(&pdf_with_pages(&[])).expect_err("no pages");
        assert_eq!(error.kind, ExtractionErrorKind::PdfParsing);
    }

    #[test]
    fn corrupted_bytes_are_pdf_errors() {
        let error = extract(b"%PDF-1.4\nthis is not really a pdf").expect_err("corrupt pdf");
        assert_eq!(error.kind, ExtractionErrorKind::PdfParsing);

        let error = extract(b"").expect_err("empty pdf");
        assert_eq!(error.kind, ExtractionErrorKind::PdfParsing);
    }
}
