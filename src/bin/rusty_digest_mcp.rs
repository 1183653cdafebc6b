//! MCP server entrypoint (stdio transport).
//!
//! Launches an MCP server that exposes Rusty Digest's tools and resources over stdio. Console logs
//! go to stderr so stdout carries only protocol frames. Runtime configuration is shared with the
//! HTTP binary.
use anyhow::{Context, Result};
use rmcp::{service::ServiceExt, transport::stdio};
use rustydigest::{config, logging, mcp::RustyDigestMcpServer, pipeline::SummaryService};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    config::init_config();
    logging::init_tracing(logging::Console::Stderr);

    let pipeline = SummaryService::from_config(config::get_config())
        .context("failed to build HTTP clients")?;
    let server = RustyDigestMcpServer::new(Arc::new(pipeline));

    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server over stdio")?;

    service
        .waiting()
        .await
        .context("MCP server terminated unexpectedly")?;

    Ok(())
}
