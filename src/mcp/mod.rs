//! Model Context Protocol (MCP) integration for Rusty Digest.
//!
//! This module wires the summary pipeline into an MCP server so editors and agent hosts can
//! summarize documents over stdio. The surface area consists of:
//!
//! - Tools: `summarize-document`, `detect-format`, and `metrics`.
//! - Resources: `mcp://formats`.

mod format;
mod handlers;
mod registry;
mod schemas;
mod server;

pub use server::RustyDigestMcpServer;
