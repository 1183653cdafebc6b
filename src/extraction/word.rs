//! Word-processor (DOCX) extraction.
//!
//! A DOCX file is a zip container whose main part, `word/document.xml`, holds the body. Only the
//! paragraphs that are direct children of `<w:body>` are collected, in document order; table
//! cells and text boxes are skipped. Within a paragraph `<w:t>` runs are concatenated, `<w:tab/>`
//! becomes a tab and `<w:br/>`/`<w:cr/>` a newline. Legacy binary `.doc` files fail here.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;

use super::types::{ExtractionError, ExtractionErrorKind};

const DOCUMENT_PART: &str = "word/document.xml";
const MAX_PART_BYTES: u64 = 64 * 1024 * 1024;

/// Concatenate body paragraphs of a DOCX document, newline separated.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let xml = read_document_part(bytes)?;
    let paragraphs = parse_paragraphs(&xml)?;
    Ok(paragraphs.join("\n"))
}

fn read_document_part(bytes: &[u8]) -> Result<Vec<u8>, ExtractionError> {
    read_part(bytes, DOCUMENT_PART, MAX_PART_BYTES)
}

/// Read one archive member, refusing to inflate more than `limit` bytes.
///
/// The size recorded in the archive headers is ignored.
fn read_part(bytes: &[u8], name: &str, limit: u64) -> Result<Vec<u8>, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| word_error(format!("Failed to open DOCX container: {e}")))?;
    let part = archive
        .by_name(name)
        .map_err(|e| word_error(format!("Missing {name}: {e}")))?;
    let mut xml = Vec::new();
    part.take(limit + 1)
        .read_to_end(&mut xml)
        .map_err(|e| word_error(format!("Failed to read {name}: {e}")))?;
    if xml.len() as u64 > limit {
        return Err(word_error(format!("{name} inflates past {limit} bytes")));
    }
    Ok(xml)
}

fn parse_paragraphs(xml: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(4096);
    // Local names of the currently open elements.
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut paragraph_depth = 0usize;
    let mut in_text = false;
    // Open `w:txbxContent` elements; their runs belong to drawings, not the paragraph.
    let mut text_box_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.local_name().as_ref().to_vec();
                if name == b"txbxContent" {
                    text_box_depth += 1;
                } else if current.is_none() && name == b"p" && parent_is_body(&stack) {
                    current = Some(String::new());
                    paragraph_depth = stack.len();
                } else if current.is_some() && text_box_depth == 0 && name == b"t" {
                    in_text = true;
                }
                stack.push(name);
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.local_name();
                let text = current.as_mut().filter(|_| text_box_depth == 0);
                match (text, name.as_ref()) {
                    (None, b"p") if parent_is_body(&stack) => paragraphs.push(String::new()),
                    (Some(text), b"tab") => text.push('\t'),
                    (Some(text), b"br" | b"cr") => text.push('\n'),
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                if let (true, Some(text)) = (in_text, current.as_mut()) {
                    let unescaped = e
                        .unescape()
                        .map_err(|err| word_error(format!("Invalid text run: {err}")))?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(ref e)) => {
                if let (true, Some(text)) = (in_text, current.as_mut()) {
                    text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::End(_)) => {
                let closed = stack.pop();
                match closed.as_deref() {
                    Some(b"t") => in_text = false,
                    Some(b"txbxContent") => text_box_depth = text_box_depth.saturating_sub(1),
                    _ => {}
                }
                if closed.as_deref() == Some(b"p".as_slice()) && stack.len() == paragraph_depth {
                    if let Some(text) = current.take() {
                        paragraphs.push(text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(word_error(format!(
                    "Malformed document XML at position {}: {e}",
                    reader.buffer_position()
                )));
            }
        }
        buf.clear();
    }

    Ok(paragraphs)
}

fn parent_is_body(stack: &[Vec<u8>]) -> bool {
    stack.last().is_some_and(|name| name == b"body")
}

fn word_error(cause: String) -> ExtractionError {
    ExtractionError::new(ExtractionErrorKind::WordParsing, cause)
}
