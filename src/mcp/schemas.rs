//! JSON schema builders for MCP tools.

use schemars::JsonSchema;
use serde_json::{Map, Value, json};

use super::handlers::{detect::DetectToolRequest, summarize::SummarizeToolRequest};

/// Build the schema describing the `summarize-document` tool input.
pub(crate) fn summarize_input_schema() -> Map<String, Value> {
    let mut schema = object_schema::<SummarizeToolRequest>();
    schema.insert(
        "examples".into(),
        Value::Array(vec![
            json!({ "fileUrl": "https://bucket.s3.amazonaws.com/uploads/report.pdf" }),
            json!({
                "body": "aGVsbG8gd29ybGQ=",
                "contentType": "text/plain",
                "fileName": "notes.txt"
            }),
        ]),
    );
    schema
}

/// Build the schema describing the `detect-format` tool input.
pub(crate) fn detect_input_schema() -> Map<String, Value> {
    object_schema::<DetectToolRequest>()
}

/// Schema representing an empty object (used for parameterless tools).
pub(crate) fn empty_object_schema() -> Map<String, Value> {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("object".into()));
    schema.insert("properties".into(), Value::Object(Map::new()));
    schema.insert("additionalProperties".into(), Value::Bool(false));
    schema
}

/// Derive an object schema from a request type, closed to unknown properties.
fn object_schema<T: JsonSchema>() -> Map<String, Value> {
    let mut schema = match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(Value::Object(map)) => map,
        _ => return empty_object_schema(),
    };
    schema.remove("$schema");
    schema.insert("additionalProperties".into(), Value::Bool(false));
    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_schema_lists_both_input_shapes() {
        let schema = summarize_input_schema();
        let properties = schema["properties"].as_object().expect("properties");
        assert!(properties.contains_key("fileUrl"));
        assert!(properties.contains_key("body"));
        assert!(properties["body"]["description"]
            .as_str()
            .is_some_and(|text| text.contains("base64")));
        assert!(schema.get("required").is_none_or(|required| required == &json!([])));
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], Value::Bool(false));
        assert!(!schema.contains_key("$schema"));
    }

    #[test]
    fn detect_schema_uses_camel_case_names() {
        let schema = detect_input_schema();
        let properties = schema["properties"].as_object().expect("properties");
        assert!(properties.contains_key("contentType"));
        assert!(properties.contains_key("fileName"));
        assert!(!properties.contains_key("content_type"));
    }

    #[test]
    fn empty_schema_has_no_properties() {
        let schema = empty_object_schema();
        assert_eq!(schema["properties"], json!({}));
    }
}
