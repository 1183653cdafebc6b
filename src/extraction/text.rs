//! Plain text and source code extraction with encoding detection.

use chardetng::EncodingDetector;
use encoding_rs::{DecoderResult, Encoding};

use super::types::{ExtractionError, ExtractionErrorKind};

/// Decode text bytes using a best-guess encoding, dropping undecodable sequences.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guess = detector.guess(None, true);

    // A byte order mark overrides the guess.
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((guess, 0));
    let (text, dropped) = decode_dropping_malformed(encoding, &bytes[bom_len..])?;
    if dropped > 0 {
        tracing::debug!(
            encoding = encoding.name(),
            dropped,
            "Dropped undecodable sequences from text"
        );
    }
    Ok(text)
}

/// Decode `input` without inserting replacement characters, skipping malformed sequences.
///
/// Returns the text and the number of sequences skipped. U+FFFD present in the source survives.
fn decode_dropping_malformed(
    encoding: &'static Encoding,
    input: &[u8],
) -> Result<(String, usize), ExtractionError> {
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let capacity = decoder
        .max_utf8_buffer_length_without_replacement(input.len())
        .ok_or_else(|| {
            ExtractionError::new(
                ExtractionErrorKind::TextDecoding,
                format!("{} bytes exceed the {} decoder's buffer", input.len(), encoding.name()),
            )
        })?;

    let mut text = String::with_capacity(capacity);
    let mut read = 0;
    let mut dropped = 0;
    loop {
        let (result, consumed) =
            decoder.decode_to_string_without_replacement(&input[read..], &mut text, true);
        read += consumed;
        match result {
            DecoderResult::InputEmpty => break,
            DecoderResult::Malformed(_, _) => dropped += 1,
            DecoderResult::OutputFull => text.reserve((input.len() - read).max(4) * 3),
        }
    }
    Ok((text, dropped))
}
