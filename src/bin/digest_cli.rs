//! Local companion CLI: preview type detection, run extraction over files, or summarize one file.
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use base64::{Engine, engine::general_purpose::STANDARD};
use clap::{Parser, Subcommand};
use rustydigest::{
    acquisition::content_digest,
    config, logging,
    extraction::{Dispatcher, TesseractCli, classify, resolve_content_type},
    pipeline::{PipelineApi, SummarizeInput, SummaryService},
};
use serde_json::json;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(
    name = "digest-cli",
    about = "Inspect how Rusty Digest reads documents and summarize them from the shell"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the effective content type and extractor for file names or URLs.
    Detect {
        /// Declared content type applied to every name.
        #[arg(long)]
        content_type: Option<String>,
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Extract text from files or directory trees, one JSON line per file.
    Extract {
        /// Declared content type applied to every file.
        #[arg(long)]
        content_type: Option<String>,
        #[arg(long, env = "TESSERACT_CMD", default_value = "tesseract")]
        tesseract_cmd: String,
        #[arg(long, env = "OCR_LANGUAGE", default_value = "eng")]
        ocr_language: String,
        /// Include the extracted text in each line.
        #[arg(long)]
        with_text: bool,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Run the full pipeline on a local file or a URL and print the envelope.
    Summarize {
        #[arg(long)]
        content_type: Option<String>,
        #[arg(long, conflicts_with = "path")]
        url: Option<String>,
        #[arg(required_unless_present = "url")]
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Detect {
            content_type,
            names,
        } => detect(content_type.as_deref(), &names),
        Command::Extract {
            content_type,
            tesseract_cmd,
            ocr_language,
            with_text,
            paths,
        } => {
            let dispatcher = Dispatcher::new(Arc::new(TesseractCli::new(tesseract_cmd, ocr_language)));
            extract(&dispatcher, content_type.as_deref(), with_text, &paths)
        }
        Command::Summarize {
            content_type,
            url,
            path,
        } => summarize(content_type, url, path).await,
    }
}

fn detect(content_type: Option<&str>, names: &[String]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    for name in names {
        let file_type = resolve_content_type(content_type, Some(name));
        let line = json!({
            "name": name,
            "fileType": file_type,
            "format": classify(&file_type),
        });
        writeln!(stdout, "{line}").context("failed to write to stdout")?;
    }
    Ok(())
}

fn extract(
    dispatcher: &Dispatcher,
    content_type: Option<&str>,
    with_text: bool,
    paths: &[PathBuf],
) -> Result<()> {
    let mut stdout = io::stdout().lock();
    for root in paths {
        if !root.exists() {
            bail!("{} does not exist", root.display());
        }
        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let line = extract_file(dispatcher, entry.path(), content_type, with_text)?;
            writeln!(stdout, "{line}").context("failed to write to stdout")?;
        }
    }
    Ok(())
}

fn extract_file(
    dispatcher: &Dispatcher,
    path: &Path,
    content_type: Option<&str>,
    with_text: bool,
) -> Result<serde_json::Value> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let name = path.to_string_lossy();
    let file_type = resolve_content_type(content_type, Some(&name));
    let format = classify(&file_type);
    let outcome = dispatcher.extract_as(&bytes, format);

    let mut line = json!({
        "path": name,
        "digest": content_digest(&bytes),
        "bytes": bytes.len(),
        "fileType": file_type,
        "format": format,
        "failed": outcome.is_failure(),
        "chars": outcome.text().chars().count(),
    });
    if with_text {
        line["outcome"] = serde_json::to_value(&outcome).context("failed to encode outcome")?;
    }
    Ok(line)
}

async fn summarize(
    content_type: Option<String>,
    url: Option<String>,
    path: Option<PathBuf>,
) -> Result<()> {
    config::init_config();
    logging::init_tracing(logging::Console::Stderr);
    let service = SummaryService::from_config(config::get_config())
        .context("failed to build HTTP clients")?;

    let input = match (url, path) {
        (Some(url), _) => SummarizeInput {
            file_url: Some(url),
            ..SummarizeInput::default()
        },
        (None, Some(path)) => {
            let bytes =
                fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
            SummarizeInput {
                body: Some(STANDARD.encode(bytes)),
                content_type,
                file_name: Some(path.to_string_lossy().into_owned()),
                ..SummarizeInput::default()
            }
        }
        (None, None) => bail!("either a path or --url is required"),
    };

    let envelope = service.summarize(input).await;
    println!(
        "{}",
        serde_json::to_string_pretty(&envelope).context("failed to encode envelope")?
    );
    if !envelope.is_success() {
        bail!("summarization returned status {}", envelope.status_code);
    }
    Ok(())
}
