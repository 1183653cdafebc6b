//! HTTP surface for Rusty Digest.
//!
//! This module exposes a compact Axum router:
//!
//! - `POST /analyze` – Summarize a document given as `fileUrl` or as a base64 `body`. The
//!   response status mirrors the result envelope (200, 400, or 500).
//! - `POST /detect` – Resolve the effective content type and extractor family for a declared type
//!   and a file name or URL, without reading any bytes.
//! - `GET /formats` – Catalog of supported formats and the markers that select them.
//! - `GET /metrics` – Summarization counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! The HTTP surface shares the same pipeline with the MCP server, so behavior is identical across
//! interfaces.

use crate::extraction::{FormatDescriptor, format_catalog};
use crate::acquisition::InlineDecodeError;
use crate::metrics::MetricsSnapshot;
use crate::pipeline::{DetectionReport, PipelineApi, PipelineError, ResultEnvelope, SummarizeInput};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

/// Build the HTTP router exposing the summarization API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: PipelineApi + 'static,
{
    Router::new()
        .route("/analyze", post(analyze::<S>))
        .route("/detect", post(detect::<S>))
        .route("/formats", get(list_formats))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(service)
}

/// Request body for `POST /analyze`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    #[serde(default)]
    file_url: Option<String>,
    /// Base64-encoded document; any non-string value other than null is an encoding error.
    #[serde(default)]
    body: Option<Value>,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    file_name: Option<String>,
    /// Out-of-band headers forwarded by a gateway; only `content-type` is read.
    #[serde(default)]
    headers: HashMap<String, String>,
}

impl AnalyzeRequest {
    fn into_input(self) -> Result<SummarizeInput, PipelineError> {
        let body = match self.body {
            None | Some(Value::Null) => None,
            Some(Value::String(body)) => Some(body),
            Some(_) => return Err(InlineDecodeError::NotText.into()),
        };
        let content_type = self.content_type.or_else(|| {
            self.headers
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
                .map(|(_, value)| value.clone())
        });
        Ok(SummarizeInput {
            file_url: self.file_url,
            body,
            content_type,
            file_name: self.file_name,
        })
    }
}

/// Summarize a remote or inline document.
///
/// Requests that are not a JSON object of the expected shape get the same `{error}` body as
/// any other rejected invocation.
async fn analyze<S>(
    State(service): State<Arc<S>>,
    request: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response
where
    S: PipelineApi,
{
    let input = match request {
        Ok(Json(request)) => request.into_input(),
        Err(rejection) => {
            tracing::info!(error = %rejection.body_text(), "Malformed analyze request");
            Err(PipelineError::MissingInput)
        }
    };
    let envelope = match input {
        Ok(input) => service.summarize(input).await,
        Err(error) => {
            tracing::info!(%error, "Summarization rejected");
            ResultEnvelope::from_error(&error)
        }
    };
    envelope_response(&envelope)
}

fn envelope_response(envelope: &ResultEnvelope) -> Response {
    let status =
        StatusCode::from_u16(envelope.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(envelope.body())).into_response()
}

/// Request body for `POST /detect`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetectRequest {
    #[serde(default)]
    content_type: Option<String>,
    /// File name or URL whose extension is used when the declared type is generic.
    #[serde(default, alias = "fileUrl")]
    file_name: Option<String>,
}

async fn detect<S>(
    State(service): State<Arc<S>>,
    request: Result<Json<DetectRequest>, JsonRejection>,
) -> Response
where
    S: PipelineApi,
{
    match request {
        Ok(Json(request)) => Json::<DetectionReport>(service.detect(
            request.content_type.as_deref(),
            request.file_name.as_deref(),
        ))
        .into_response(),
        Err(rejection) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": rejection.body_text() })),
        )
            .into_response(),
    }
}

/// Response body for `GET /formats`.
#[derive(Serialize)]
struct FormatsResponse {
    formats: Vec<FormatDescriptor>,
}

async fn list_formats() -> Json<FormatsResponse> {
    Json(FormatsResponse {
        formats: format_catalog(),
    })
}

/// Return summarization counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: PipelineApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "analyze",
                method: "POST",
                path: "/analyze",
                description: "Extract text from a document and summarize it. Supply either \"fileUrl\" or a base64 \"body\" with an optional \"contentType\"/\"fileName\". Success returns { \"fileType\": string, \"summary\": string }; failures return { \"error\": string }.",
                request_example: Some(json!({
                    "body": "aGVsbG8gd29ybGQ=",
                    "contentType": "text/plain",
                    "fileName": "notes.txt"
                })),
            },
            CommandDescriptor {
                name: "detect",
                method: "POST",
                path: "/detect",
                description: "Resolve the effective content type and extractor family without downloading anything.",
                request_example: Some(json!({
                    "contentType": "binary/octet-stream",
                    "fileName": "report.docx"
                })),
            },
            CommandDescriptor {
                name: "formats",
                method: "GET",
                path: "/formats",
                description: "List supported formats with the content-type markers that select them.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return summarization counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::{create_router, get_commands};
    use crate::metrics::MetricsSnapshot;
    use crate::pipeline::{PipelineApi, PipelineError, ResultEnvelope, SummarizeInput};
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    #[tokio::test]
    async fn commands_catalog_exposes_analyze_endpoint() {
        let response = get_commands().await;
        let commands = response.0.commands;
        let analyze = commands
            .iter()
            .find(|cmd| cmd.name == "analyze")
            .expect("analyze command present");

        assert_eq!(analyze.method, "POST");
        assert_eq!(analyze.path, "/analyze");
        assert!(analyze.description.contains("fileUrl"));
        assert!(commands.len() >= 3);
    }

    #[tokio::test]
    async fn analyze_forwards_header_content_type() {
        let service = Arc::new(StubPipeline::new(ResultEnvelope::success(
            "text/plain",
            "Greeting.",
        )));
        let app = create_router(service.clone());

        let response = post_json(
            app,
            "/analyze",
            json!({
                "body": "aGVsbG8gd29ybGQ=",
                "headers": {"Content-Type": "text/plain"},
                "fileName": "hello.txt"
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body, json!({"fileType": "text/plain", "summary": "Greeting."}));

        let calls = service.recorded_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].body.as_deref(), Some("aGVsbG8gd29ybGQ="));
        assert_eq!(calls[0].content_type.as_deref(), Some("text/plain"));
        assert_eq!(calls[0].file_name.as_deref(), Some("hello.txt"));
    }

    #[tokio::test]
    async fn analyze_uses_envelope_status() {
        let service = Arc::new(StubPipeline::new(ResultEnvelope::from_error(
            &PipelineError::MissingInput,
        )));
        let response = post_json(create_router(service), "/analyze", json!({})).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"error": "No file uploaded or URL provided."})
        );
    }

    #[tokio::test]
    async fn non_string_body_is_an_encoding_error() {
        let service = Arc::new(StubPipeline::new(ResultEnvelope::success("x", "y")));
        let response =
            post_json(create_router(service.clone()), "/analyze", json!({"body": 123})).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Invalid Base64 encoding."})
        );
        assert!(service.recorded_calls().await.is_empty());
    }

    #[tokio::test]
    async fn unparseable_request_is_a_structured_error() {
        let service = Arc::new(StubPipeline::new(ResultEnvelope::success("x", "y")));
        let app = create_router(service.clone());

        for (content_type, payload) in [
            ("application/json", "not json at all"),
            ("application/json", r#"{"fileUrl": 7}"#),
            ("text/plain", r#"{"fileUrl": "https://b/x.pdf"}"#),
        ] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(Method::POST)
                        .uri("/analyze")
                        .header("content-type", content_type)
                        .body(Body::from(payload))
                        .expect("request"),
                )
                .await
                .expect("router response");

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{payload}");
            assert_eq!(
                json_body(response).await,
                json!({"error": "No file uploaded or URL provided."})
            );
        }
        assert!(service.recorded_calls().await.is_empty());
    }

    #[tokio::test]
    async fn null_body_counts_as_absent() {
        let service = Arc::new(StubPipeline::new(ResultEnvelope::success("x", "y")));
        let response = post_json(
            create_router(service.clone()),
            "/analyze",
            json!({"body": null, "fileUrl": "https://b/x.pdf"}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let calls = service.recorded_calls().await;
        assert!(calls[0].body.is_none());
        assert_eq!(calls[0].file_url.as_deref(), Some("https://b/x.pdf"));
    }

    #[tokio::test]
    async fn detect_reports_hint_based_type() {
        let service = Arc::new(StubPipeline::new(ResultEnvelope::success("x", "y")));
        let response = post_json(
            create_router(service),
            "/detect",
            json!({"contentType": "binary/octet-stream", "fileUrl": "https://b/x/report.docx?v=2"}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["format"], "word_processor_document");
        assert_eq!(
            body["fileType"],
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }

    #[tokio::test]
    async fn formats_and_metrics_are_listed() {
        let service = Arc::new(StubPipeline::new(ResultEnvelope::success("x", "y")));
        let app = create_router(service);

        let formats = app
            .clone()
            .oneshot(get("/formats"))
            .await
            .expect("formats response");
        assert_eq!(formats.status(), StatusCode::OK);
        let body = json_body(formats).await;
        assert_eq!(body["formats"].as_array().map(Vec::len), Some(6));
        assert_eq!(body["formats"][0]["format"], "portable_document");

        let metrics = app.oneshot(get("/metrics")).await.expect("metrics response");
        let body = json_body(metrics).await;
        assert_eq!(body["summarized"], 3);
        assert_eq!(body["extractionFallbacks"], 1);
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    async fn post_json(app: axum::Router, uri: &str, payload: Value) -> Response {
        app.oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("router response")
    }

    async fn json_body(response: Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json body")
    }

    #[derive(Clone)]
    struct StubPipeline {
        calls: Arc<Mutex<Vec<SummarizeInput>>>,
        envelope: ResultEnvelope,
    }

    impl StubPipeline {
        fn new(envelope: ResultEnvelope) -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                envelope,
            }
        }

        async fn recorded_calls(&self) -> Vec<SummarizeInput> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl PipelineApi for StubPipeline {
        async fn summarize(&self, input: SummarizeInput) -> ResultEnvelope {
            self.calls.lock().await.push(input);
            self.envelope.clone()
        }

        fn metrics_snapshot(&self) -> MetricsSnapshot {
            MetricsSnapshot {
                summarized: 3,
                rejected: 0,
                failed: 0,
                extraction_fallbacks: 1,
            }
        }
    }
}
