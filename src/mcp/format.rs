//! Formatting helpers shared across MCP handlers and resources.

use crate::extraction::format_catalog;
use rmcp::model::ResourceContents;
use serde::Serialize;
use serde_json::json;

pub(crate) const APPLICATION_JSON: &str = "application/json";

/// Serialize a value to JSON, falling back to compact formatting on error.
pub(crate) fn serialize_json<T: Serialize>(value: &T, context_uri: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|error| {
        tracing::warn!(uri = context_uri, %error, "Failed to serialize JSON prettily");
        serde_json::to_string(value).unwrap_or_else(|_| "{}".into())
    })
}

/// Build JSON resource contents for MCP resource responses.
pub(crate) fn json_resource_contents(uri: &str, text: String) -> ResourceContents {
    ResourceContents::TextResourceContents {
        uri: uri.to_string(),
        mime_type: Some(APPLICATION_JSON.into()),
        text,
        meta: None,
    }
}

/// Supported formats manifest returned by the `formats` resource.
pub(crate) fn formats_payload(uri: &str) -> String {
    serialize_json(
        &json!({
            "formats": format_catalog(),
            "fallbackType": crate::extraction::resolver::DEFAULT_CONTENT_TYPE,
            "genericTypes": crate::extraction::resolver::GENERIC_TYPES,
        }),
        uri,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn formats_payload_is_valid_json() {
        let body = formats_payload("mcp://formats");
        let value: Value = serde_json::from_str(&body).expect("formats payload must be JSON");
        let formats = value["formats"].as_array().expect("formats array");
        assert_eq!(formats.len(), 6);
        assert_eq!(formats[1]["format"], "delimited_table");
        assert_eq!(value["fallbackType"], "application/pdf");
        assert!(
            value["genericTypes"]
                .as_array()
                .expect("generic types")
                .contains(&Value::String("binary/octet-stream".into()))
        );
    }

    #[test]
    fn resource_contents_are_tagged_json() {
        match json_resource_contents("mcp://formats", "{}".into()) {
            ResourceContents::TextResourceContents { mime_type, .. } => {
                assert_eq!(mime_type.as_deref(), Some(APPLICATION_JSON));
            }
            other => panic!("unexpected contents: {other:?}"),
        }
    }
}
