//! Content-type resolution.
//!
//! Declared types are frequently missing or generic (`binary/octet-stream` is what object stores
//! hand back for untyped uploads), so resolution runs in two tiers: the declared type when it is
//! usable, otherwise a MIME type guessed from the source hint's extension, otherwise
//! `application/pdf`. The effective type string is then classified by substring markers in a
//! fixed precedence order.

use super::types::FormatTag;

/// Type assumed when neither the declared type nor the source hint is usable.
pub const DEFAULT_CONTENT_TYPE: &str = "application/pdf";

/// Declared types that carry no format information.
pub const GENERIC_TYPES: [&str; 4] = ["binary/octet-stream", "application/json", "unknown", ""];

const WORD_MARKERS: [&str; 2] = [
    "msword",
    "vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Resolve the format tag for a document from its declared type and source hint.
pub fn resolve(declared_type: Option<&str>, source_hint: Option<&str>) -> FormatTag {
    classify(&resolve_content_type(declared_type, source_hint))
}

/// Resolve the effective content type string: declared, inferred from the hint, or the default.
pub fn resolve_content_type(declared_type: Option<&str>, source_hint: Option<&str>) -> String {
    if let Some(declared) = declared_type.filter(|value| !is_generic(value)) {
        return declared.trim().to_string();
    }

    source_hint
        .and_then(guess_from_hint)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}

/// Whether a declared type should be ignored in favour of inference.
pub fn is_generic(content_type: &str) -> bool {
    let normalized = content_type.trim().to_ascii_lowercase();
    GENERIC_TYPES.contains(&normalized.as_str())
}

/// Map a content type string onto a format tag.
///
/// Precedence is pdf, csv, plain/text, word-processor, image. `text/csv` therefore lands on the
/// table extractor even though it also contains `text`.
pub fn classify(content_type: &str) -> FormatTag {
    let normalized = content_type.to_ascii_lowercase();
    if normalized.contains("pdf") {
        FormatTag::PortableDocument
    } else if normalized.contains("csv") {
        FormatTag::DelimitedTable
    } else if normalized.contains("plain") || normalized.contains("text") {
        FormatTag::PlainText
    } else if WORD_MARKERS
        .iter()
        .any(|marker| normalized.contains(marker))
    {
        FormatTag::WordProcessorDocument
    } else if normalized.contains("image") {
        FormatTag::Image
    } else {
        FormatTag::Unsupported
    }
}

/// Guess a MIME type from the extension of a file name or URL.
pub fn guess_from_hint(hint: &str) -> Option<&'static str> {
    let path = hint
        .split(['?', '#'])
        .next()
        .unwrap_or(hint)
        .trim_end_matches('/');
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let (stem, extension) = file_name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    mime_type_from_extension(&extension.to_ascii_lowercase())
}

fn mime_type_from_extension(extension: &str) -> Option<&'static str> {
    let mime = match extension {
        "pdf" => "application/pdf",
        "csv" => "text/csv",
        "tsv" => "text/tab-separated-values",
        "txt" | "text" | "log" | "conf" | "ini" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "xml" => "text/xml",
        "js" | "mjs" => "text/javascript",
        "py" => "text/x-python",
        "rs" => "text/x-rust",
        "java" => "text/x-java",
        "c" | "h" => "text/x-c",
        "cpp" | "cc" | "hpp" => "text/x-c++",
        "go" => "text/x-go",
        "rb" => "text/x-ruby",
        "sh" => "text/x-sh",
        "yaml" | "yml" => "text/yaml",
        "toml" => "text/x-toml",
        "json" => "application/json",
        "doc" | "dot" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_pdf_wins_regardless_of_hint() {
        for declared in ["application/pdf", "APPLICATION/PDF", "application/x-pdf; v=1"] {
            assert_eq!(
                resolve(Some(declared), Some("notes.csv")),
                FormatTag::PortableDocument
            );
        }
    }

    #[test]
    fn csv_takes_precedence_over_text() {
        assert_eq!(classify("text/csv"), FormatTag::DelimitedTable);
        assert_eq!(classify("text/plain; charset=utf-8"), FormatTag::PlainText);
        assert_eq!(classify("text/x-python"), FormatTag::PlainText);
    }

    #[test]
    fn word_and_image_markers_classify() {
        assert_eq!(
            classify("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
            FormatTag::WordProcessorDocument
        );
        assert_eq!(classify("application/msword"), FormatTag::WordProcessorDocument);
        assert_eq!(classify("image/png"), FormatTag::Image);
        assert_eq!(classify("application/zip"), FormatTag::Unsupported);
    }

    #[test]
    fn generic_declared_type_falls_back_to_hint() {
        assert_eq!(
            resolve_content_type(Some("binary/octet-stream"), Some("https://bucket/a/report.CSV")),
            "text/csv"
        );
        assert_eq!(
            resolve(Some("unknown"), Some("scan.jpeg?X-Amz-Signature=abc")),
            FormatTag::Image
        );
        assert_eq!(resolve(Some(" "), Some("main.rs")), FormatTag::PlainText);
    }

    #[test]
    fn unresolvable_input_defaults_to_pdf() {
        assert_eq!(resolve_content_type(None, None), DEFAULT_CONTENT_TYPE);
        assert_eq!(resolve(Some("application/json"), None), FormatTag::PortableDocument);
        assert_eq!(
            resolve(None, Some("https://bucket/uploads/blob")),
            FormatTag::PortableDocument
        );
        assert_eq!(resolve(None, Some(".bashrc")), FormatTag::PortableDocument);
    }

    #[test]
    fn inferred_types_without_extractor_are_unsupported() {
        assert_eq!(resolve(None, Some("archive.zip")), FormatTag::Unsupported);
        assert_eq!(resolve(None, Some("data.json")), FormatTag::Unsupported);
        assert_eq!(
            resolve(Some("application/octet-stream"), Some("a.pdf")),
            FormatTag::Unsupported
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let inputs = [
            (Some("text/plain"), None),
            (None, Some("photo.png")),
            (Some("unknown"), Some("x")),
        ];
        for (declared, hint) in inputs {
            assert_eq!(resolve(declared, hint), resolve(declared, hint));
        }
    }
}
