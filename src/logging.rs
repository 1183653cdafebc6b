//! Tracing configuration and log routing.
//!
//! Console output uses a compact formatter on stdout, or on stderr for the MCP binary whose stdout
//! carries protocol frames. File output goes to `RUSTY_DIGEST_LOG_FILE` when set and to
//! `logs/rusty-digest.log` otherwise, through a non-blocking writer.
use std::io;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Stream receiving human-readable console logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Console {
    /// Log to standard output.
    Stdout,
    /// Log to standard error.
    Stderr,
}

/// Configure tracing subscribers for console and file logging.
///
/// - Respects `RUST_LOG` for filtering (defaults to `info`, with lopdf font warnings muted).
/// - Uses a global guard to keep the non-blocking writer alive for the process lifetime.
pub fn init_tracing(console: Console) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,lopdf=error"));
    let console_layer = match console {
        Console::Stdout => fmt::layer()
            .with_target(false)
            .compact()
            .with_writer(io::stdout)
            .boxed(),
        Console::Stderr => fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .compact()
            .with_writer(io::stderr)
            .boxed(),
    };

    let file_layer = configure_file_writer().map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();
}

fn configure_file_writer() -> Option<NonBlocking> {
    if let Ok(path) = std::env::var("RUSTY_DIGEST_LOG_FILE") {
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            Ok(file) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(file);
                let _ = LOG_GUARD.set(guard);
                Some(non_blocking)
            }
            Err(err) => {
                eprintln!("Failed to open log file {path}: {err}");
                None
            }
        }
    } else {
        if let Err(err) = std::fs::create_dir_all("logs") {
            eprintln!("Failed to create logs directory: {err}");
            return None;
        }
        let file_appender = tracing_appender::rolling::never("logs", "rusty-digest.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let _ = LOG_GUARD.set(guard);
        Some(non_blocking)
    }
}
