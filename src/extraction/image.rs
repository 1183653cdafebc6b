//! Image text extraction through optical character recognition.
//!
//! Bytes are decoded into a raster with the `image` crate, normalized to PNG, and handed to an
//! [`OcrEngine`]. The default engine shells out to the Tesseract CLI, streaming the PNG on stdin
//! and reading recognized text from stdout. Recognized text is returned verbatim.

use std::io::{self, Cursor, Write};
use std::process::{Command, Stdio};
use std::thread;

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

use super::types::{ExtractionError, ExtractionErrorKind};

/// Errors raised by OCR engines.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The OCR executable could not be started or fed.
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),
    /// The engine ran but reported a failure.
    #[error("OCR engine failed: {0}")]
    Failed(String),
}

/// Recognizes text in a decoded raster image.
pub trait OcrEngine: Send + Sync {
    /// Return the text recognized in `image`.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// OCR engine backed by the `tesseract` command-line tool.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    command: String,
    language: String,
}

impl TesseractCli {
    /// Build an engine invoking `command` with the given language pack.
    pub fn new(command: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }

    /// Report the installed Tesseract version, if the executable can be run.
    pub fn version(&self) -> Option<String> {
        let output = Command::new(&self.command).arg("--version").output().ok()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        stdout
            .lines()
            .chain(stderr.lines())
            .find(|line| line.starts_with("tesseract"))
            .map(|line| line.trim().to_string())
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

impl OcrEngine for TesseractCli {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| OcrError::Failed(format!("failed to encode PNG for OCR: {e}")))?;

        let mut child = Command::new(&self.command)
            .args(["stdin", "stdout", "-l", &self.language])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| OcrError::Unavailable(format!("{}: {e}", self.command)))?;
        let stdin = child.stdin.take();

        // Feed stdin on a separate thread so the child is always reaped, even when it stops
        // reading early, and stdout/stderr are drained concurrently.
        let (streamed, output) = thread::scope(|scope| {
            let writer = scope.spawn(|| match stdin {
                Some(mut stdin) => stdin.write_all(&png),
                None => Err(io::Error::other("stdin was not captured")),
            });
            let output = child.wait_with_output();
            let streamed = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (streamed, output)
        });

        let output =
            output.map_err(|e| OcrError::Failed(format!("failed to collect OCR output: {e}")))?;
        if !output.status.success() {
            return Err(OcrError::Failed(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        if let Err(e) = streamed {
            return Err(OcrError::Failed(format!(
                "{} stopped reading the image: {e}",
                self.command
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Decode an image and run OCR over it.
pub fn extract(bytes: &[u8], engine: &dyn OcrEngine) -> Result<String, ExtractionError> {
    let image = image::load_from_memory(bytes).map_err(|e| {
        ExtractionError::new(
            ExtractionErrorKind::ImageRecognition,
            format!("Failed to load image: {e}"),
        )
    })?;
    tracing::debug!(
        width = image.width(),
        height = image.height(),
        "Running OCR over image"
    );
    engine
        .recognize(&image)
        .map_err(|e| ExtractionError::new(ExtractionErrorKind::ImageRecognition, e.to_string()))
}
