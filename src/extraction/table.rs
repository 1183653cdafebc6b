//! Delimited table extraction.

use csv::ReaderBuilder;

use super::types::{ExtractionError, ExtractionErrorKind};

/// Separator placed between the fields of a row.
pub const FIELD_SEPARATOR: &str = " | ";

/// Flatten comma-delimited rows into `a | b` lines joined by newlines.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut lines = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| {
            ExtractionError::new(ExtractionErrorKind::TableParsing, error.to_string())
        })?;
        lines.push(record.iter().collect::<Vec<_>>().join(FIELD_SEPARATOR));
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_fields_and_rows() {
        assert_eq!(extract(b"a,b\nc,d").expect("table"), "a | b\nc | d");
    }

    #[test]
    fn keeps_quoted_commas_and_ragged_rows() {
        let text = extract(b"name,notes\n\"Doe, Jane\",\"said \"\"hi\"\"\"\nsolo\n").expect("table");
        assert_eq!(text, "name | notes\nDoe, Jane | said \"hi\"\nsolo");
    }

    #[test]
    fn rejects_invalid_utf8() {
        let error = extract(b"a,b\n\xff\xfe,c\n").expect_err("invalid utf8");
        assert_eq!(error.kind, ExtractionErrorKind::TableParsing);
    }
}
