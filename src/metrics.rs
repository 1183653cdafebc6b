use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing summarization activity.
#[derive(Default)]
pub struct PipelineMetrics {
    summarized: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
    extraction_fallbacks: AtomicU64,
}

impl PipelineMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an invocation that produced a summary.
    pub fn record_summarized(&self) {
        self.summarized.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an invocation rejected with a client error.
    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an invocation that failed with a server error.
    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an extraction that fell back to a failure sentinel.
    pub fn record_extraction_fallback(&self) {
        self.extraction_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            summarized: self.summarized.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            extraction_fallbacks: self.extraction_fallbacks.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of summarization counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Invocations answered with a summary.
    pub summarized: u64,
    /// Invocations rejected with a 400-class envelope.
    pub rejected: u64,
    /// Invocations that ended with a 500-class envelope.
    pub failed: u64,
    /// Extractions that produced a failure sentinel instead of document text.
    pub extraction_fallbacks: u64,
}
