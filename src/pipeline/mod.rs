//! Request orchestration: acquisition, extraction, inference, and the response envelope.

mod envelope;
mod service;
pub mod types;

pub use envelope::ResultEnvelope;
pub use service::{PipelineApi, SummaryService};
pub use types::{DetectionReport, PipelineError, SummarizeInput};
