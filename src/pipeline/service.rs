//! Summary service running acquire, resolve, extract, and summarize for one request.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    acquisition::{ContentFetcher, HttpFetcher, content_digest, decode_inline},
    config::Config,
    extraction::{Dispatcher, RawDocument, TesseractCli, classify, resolve_content_type},
    inference::{InferenceClient, SummaryRequest, client_from_config},
    metrics::{MetricsSnapshot, PipelineMetrics},
    pipeline::{
        envelope::ResultEnvelope,
        types::{DetectionReport, PipelineError, SummarizeInput},
    },
};

/// Abstraction over the summary pipeline used by external surfaces (HTTP, MCP, CLI).
#[async_trait]
pub trait PipelineApi: Send + Sync {
    /// Run one invocation and describe its result as an envelope.
    async fn summarize(&self, input: SummarizeInput) -> ResultEnvelope;

    /// Resolve the effective type and extractor family without reading any bytes.
    fn detect(&self, declared_type: Option<&str>, source_hint: Option<&str>) -> DetectionReport {
        let file_type = resolve_content_type(declared_type, source_hint);
        DetectionReport {
            format: classify(&file_type),
            file_type,
        }
    }

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

/// Owns the collaborators of the pipeline.
///
/// Each invocation is independent; the only state shared between invocations is the metrics
/// registry. Construct the service once near process start and share it through an `Arc`.
pub struct SummaryService {
    fetcher: Arc<dyn ContentFetcher>,
    inference: Arc<dyn InferenceClient>,
    dispatcher: Dispatcher,
    metrics: Arc<PipelineMetrics>,
}

/// Text and type produced by a successful invocation.
struct Summarized {
    file_type: String,
    summary: String,
}

impl SummaryService {
    /// Assemble a service from explicit collaborators.
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        inference: Arc<dyn InferenceClient>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            fetcher,
            inference,
            dispatcher,
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    /// Build the HTTP fetcher, inference client, and Tesseract-backed dispatcher from `config`.
    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        tracing::info!(
            provider = config.inference_provider.label(),
            model = %config.inference_model,
            "Initializing inference client"
        );
        let fetcher = Arc::new(HttpFetcher::from_config(config)?);
        let inference = client_from_config(config)?;
        let ocr = TesseractCli::new(config.tesseract_cmd.clone(), config.ocr_language.clone());
        match ocr.version() {
            Some(version) => tracing::info!(%version, "OCR engine available"),
            None => tracing::warn!(
                command = %config.tesseract_cmd,
                "OCR engine not found; image documents will report extraction errors"
            ),
        }
        Ok(Self::new(
            fetcher,
            inference,
            Dispatcher::new(Arc::new(ocr)),
        ))
    }

    async fn run(&self, input: SummarizeInput) -> Result<Summarized, PipelineError> {
        let document = self.acquire(input).await?;
        let file_type = resolve_content_type(document.declared_type(), document.source_hint());
        let format = classify(&file_type);
        tracing::info!(
            file_type = %file_type,
            %format,
            bytes = document.bytes().len(),
            digest = %content_digest(document.bytes()),
            "Document acquired"
        );

        let dispatcher = self.dispatcher.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            dispatcher.extract_as(&document.into_bytes(), format)
        })
        .await
        .map_err(|error| PipelineError::Internal(format!("Extraction task failed: {error}")))?;

        if outcome.is_failure() {
            self.metrics.record_extraction_fallback();
            tracing::warn!(%format, "Summarizing extraction failure text");
        }

        let text = outcome.into_text();
        if text.trim().is_empty() {
            return Err(PipelineError::EmptyContent);
        }

        let request = SummaryRequest::build(&text);
        tracing::debug!(prompt_chars = request.prompt_text.len(), "Invoking inference");
        let output = self.inference.invoke(&request).await?;

        Ok(Summarized {
            file_type,
            summary: output.summary_text(),
        })
    }

    async fn acquire(&self, input: SummarizeInput) -> Result<RawDocument, PipelineError> {
        let SummarizeInput {
            file_url,
            body,
            content_type,
            file_name,
        } = input;

        if let Some(url) = file_url {
            let fetched = self.fetcher.fetch(&url).await.inspect_err(|error| {
                tracing::warn!(%error, "Download failed");
            })?;
            return Ok(RawDocument::new(
                fetched.bytes,
                fetched.content_type,
                Some(url),
            ));
        }

        if let Some(body) = body {
            let bytes = decode_inline(&body).inspect_err(|error| {
                tracing::warn!(%error, "Inline payload rejected");
            })?;
            return Ok(RawDocument::new(bytes, content_type, file_name));
        }

        Err(PipelineError::MissingInput)
    }
}

#[async_trait]
impl PipelineApi for SummaryService {
    async fn summarize(&self, input: SummarizeInput) -> ResultEnvelope {
        let span = tracing::info_span!("summarize", request_id = %Uuid::new_v4());
        async move {
            let envelope = match self.run(input).await {
                Ok(Summarized { file_type, summary }) => {
                    self.metrics.record_summarized();
                    ResultEnvelope::success(file_type, summary)
                }
                Err(error) => {
                    if error.status_code() >= 500 {
                        self.metrics.record_failed();
                        tracing::error!(%error, "Summarization failed");
                    } else {
                        self.metrics.record_rejected();
                        tracing::info!(%error, "Summarization rejected");
                    }
                    ResultEnvelope::from_error(&error)
                }
            };
            tracing::info!(status = envelope.status_code, "Invocation finished");
            envelope
        }
        .instrument(span)
        .await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
