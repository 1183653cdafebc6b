use std::io::{Cursor, Write};
use std::sync::Arc;
use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use httpmock::{
    Method::{GET, POST},
    MockServer,
};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use rustydigest::{
    acquisition::HttpFetcher,
    config::{Config, InferenceProvider},
    extraction::{Dispatcher, OcrEngine, OcrError},
    inference::client_from_config,
    pipeline::{PipelineApi, SummarizeInput, SummaryService},
};
use serde_json::json;
use zip::write::SimpleFileOptions;

const INVOKE_PATH: &str = "/model/amazon.titan-tg1-large/invoke";

struct FixedOcr;

impl OcrEngine for FixedOcr {
    fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
        Ok("RECEIPT TOTAL 42.00\n".into())
    }
}

fn config(base_url: String) -> Config {
    Config {
        inference_url: base_url,
        inference_provider: InferenceProvider::Titan,
        inference_model: "amazon.titan-tg1-large".into(),
        inference_api_key: None,
        connect_timeout: Duration::from_secs(2),
        read_timeout: Duration::from_secs(5),
        tesseract_cmd: "tesseract".into(),
        ocr_language: "eng".into(),
        server_port: None,
    }
}

fn service(server: &MockServer) -> SummaryService {
    let config = config(server.base_url());
    SummaryService::new(
        Arc::new(HttpFetcher::from_config(&config).expect("fetcher")),
        client_from_config(&config).expect("inference client"),
        Dispatcher::new(Arc::new(FixedOcr)),
    )
}

fn docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|text| format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>"))
        .collect();
    let document = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}</w:body></w:document>"
    );
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .expect("document entry");
    writer.write_all(document.as_bytes()).expect("write document");
    writer.finish().expect("finish zip").into_inner()
}

fn png() -> Vec<u8> {
    let img = ImageBuffer::from_pixel(8, 8, Rgb([255u8, 255, 255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    bytes
}

#[tokio::test]
async fn untyped_csv_download_is_flattened_before_inference() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/uploads/q3.csv");
            then.status(200)
                .header("content-type", "binary/octet-stream")
                .body("region,total\nnorth,12\n");
        })
        .await;
    let inference = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(INVOKE_PATH)
                .body_contains("region | total\\nnorth | 12");
            then.status(200)
                .json_body(json!({"results": [{"outputText": "Northern sales were 12."}]}));
        })
        .await;

    let envelope = service(&server)
        .summarize(SummarizeInput {
            file_url: Some(server.url("/uploads/q3.csv")),
            ..SummarizeInput::default()
        })
        .await;

    inference.assert_async().await;
    assert_eq!(envelope.status_code, 200);
    assert_eq!(
        envelope.body(),
        json!({"fileType": "text/csv", "summary": "Northern sales were 12."})
    );
}

#[tokio::test]
async fn docx_download_is_read_paragraph_by_paragraph() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/uploads/minutes.docx");
            then.status(200).body(docx(&["Attendees", "Decisions"]));
        })
        .await;
    let inference = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(INVOKE_PATH)
                .body_contains("Attendees\\nDecisions");
            then.status(200)
                .json_body(json!({"results": [{"outputText": "Meeting minutes."}]}));
        })
        .await;

    let envelope = service(&server)
        .summarize(SummarizeInput {
            file_url: Some(server.url("/uploads/minutes.docx")),
            ..SummarizeInput::default()
        })
        .await;

    inference.assert_async().await;
    assert_eq!(envelope.summary.as_deref(), Some("Meeting minutes."));
    assert_eq!(
        envelope.file_type.as_deref(),
        Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
    );
}

#[tokio::test]
async fn failed_or_empty_downloads_never_reach_inference() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/uploads/gone.pdf");
            then.status(403).body("AccessDenied");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/uploads/empty.txt");
            then.status(200).header("content-type", "text/plain").body("");
        })
        .await;
    let inference = server
        .mock_async(|when, then| {
            when.method(POST).path(INVOKE_PATH);
            then.status(200).json_body(json!({"results": []}));
        })
        .await;
    let service = service(&server);

    for path in ["/uploads/gone.pdf", "/uploads/empty.txt"] {
        let envelope = service
            .summarize(SummarizeInput {
                file_url: Some(server.url(path)),
                ..SummarizeInput::default()
            })
            .await;
        assert_eq!(envelope.status_code, 400, "{path}");
        assert_eq!(
            envelope.body(),
            json!({"error": "Failed to download file from remote object store."})
        );
    }

    assert_eq!(inference.hits_async().await, 0);
    assert_eq!(service.metrics_snapshot().rejected, 2);
}

#[tokio::test]
async fn inline_image_goes_through_ocr() {
    let server = MockServer::start_async().await;
    let inference = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(INVOKE_PATH)
                .body_contains("RECEIPT TOTAL 42.00");
            then.status(200).json_body(json!({"results": [{}]}));
        })
        .await;

    let envelope = service(&server)
        .summarize(SummarizeInput {
            body: Some(STANDARD.encode(png())),
            content_type: Some("binary/octet-stream".into()),
            file_name: Some("receipt.png".into()),
            ..SummarizeInput::default()
        })
        .await;

    inference.assert_async().await;
    assert_eq!(envelope.status_code, 200);
    assert_eq!(envelope.file_type.as_deref(), Some("image/png"));
    assert_eq!(envelope.summary.as_deref(), Some("No summary available"));
}

#[tokio::test]
async fn provider_failure_is_a_server_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(INVOKE_PATH);
            then.status(503).body("ServiceUnavailable");
        })
        .await;

    let service = service(&server);
    let envelope = service
        .summarize(SummarizeInput {
            body: Some(STANDARD.encode("quarterly numbers")),
            content_type: Some("text/plain".into()),
            ..SummarizeInput::default()
        })
        .await;

    assert_eq!(envelope.status_code, 500);
    assert!(
        envelope
            .error
            .as_deref()
            .is_some_and(|message| message.contains("503"))
    );
    assert_eq!(service.metrics_snapshot().failed, 1);
}

#[tokio::test]
async fn concurrent_invocations_are_independent() {
    let server = MockServer::start_async().await;
    let inference = server
        .mock_async(|when, then| {
            when.method(POST).path(INVOKE_PATH);
            then.status(200)
                .json_body(json!({"results": [{"outputText": "ok"}]}));
        })
        .await;
    let service = Arc::new(service(&server));

    let mut handles = Vec::new();
    for index in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .summarize(SummarizeInput {
                    body: Some(STANDARD.encode(format!("document number {index}"))),
                    content_type: Some("text/plain".into()),
                    ..SummarizeInput::default()
                })
                .await
        }));
    }
    for handle in handles {
        let envelope = handle.await.expect("task");
        assert_eq!(envelope.status_code, 200);
    }

    assert_eq!(inference.hits_async().await, 8);
    assert_eq!(service.metrics_snapshot().summarized, 8);
}
