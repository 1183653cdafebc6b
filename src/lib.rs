#![deny(missing_docs)]

//! Core library for the Rusty Digest document summarization server.

/// Document download and inline payload decoding.
pub mod acquisition;
/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Content-type resolution and text extraction.
pub mod extraction;
/// Summary request building and text-generation clients.
pub mod inference;
/// Structured logging and tracing setup.
pub mod logging;
/// Model Context Protocol server implementation.
pub mod mcp;
/// Summarization metrics helpers.
pub mod metrics;
/// Request orchestration and the response envelope.
pub mod pipeline;
