//! MIME decoding utilities.
//!
//! Supports Base64, Quoted-Printable, and RFC 2047 encoded words in header values.

use crate::error::Result;
use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use encoding_rs::Encoding;

/// Engine for encoded words, which are often emitted without padding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes Base64 data, ignoring any whitespace (line breaks included).
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(cleaned).map_err(Into::into)
}

/// Decodes Quoted-Printable text (RFC 2045).
///
/// Soft line breaks (`=` before the line end, optionally with trailing
/// whitespace) are removed. `=` not followed by two hex digits is kept
/// literally, so decoding never fails.
#[must_use]
pub fn decode_quoted_printable(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        if byte != b'=' {
            result.push(byte);
            i += 1;
            continue;
        }

        let rest = &bytes[i + 1..];
        let padding = rest
            .iter()
            .take_while(|b| matches!(b, b' ' | b'\t'))
            .count();
        match rest.get(padding..) {
            Some([b'\r', b'\n', ..]) => {
                i += 1 + padding + 2;
                continue;
            }
            Some([b'\n', ..]) => {
                i += 1 + padding + 1;
                continue;
            }
            Some([]) => {
                i = bytes.len();
                continue;
            }
            _ => {}
        }

        match (
            rest.first().copied().and_then(hex_value),
            rest.get(1).copied().and_then(hex_value),
        ) {
            (Some(high), Some(low)) => {
                result.push((high << 4) | low);
                i += 3;
            }
            _ => {
                result.push(b'=');
                i += 1;
            }
        }
    }

    result
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Decodes every RFC 2047 encoded word in a header value.
///
/// Format: `=?charset?encoding?encoded-text?=`, encoding `B` or `Q`.
///
/// Decoded words are concatenated with the literal text between them;
/// whitespace separating two adjacent encoded words is dropped. A word that
/// cannot be decoded (unknown charset, bad Base64) is kept verbatim.
#[must_use]
pub fn decode_encoded_words(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;
    let mut after_word = false;

    while let Some(start) = rest.find("=?") {
        let literal = &rest[..start];
        if let Some((decoded, consumed)) = decode_encoded_word(&rest[start..]) {
            if !(after_word && literal.chars().all(char::is_whitespace)) {
                result.push_str(literal);
            }
            result.push_str(&decoded);
            rest = &rest[start + consumed..];
            after_word = true;
        } else {
            result.push_str(&rest[..start + 2]);
            rest = &rest[start + 2..];
            after_word = false;
        }
    }

    result.push_str(rest);
    result
}

/// Decodes the encoded word at the start of `word`, returning the text and
/// the number of bytes it spans.
fn decode_encoded_word(word: &str) -> Option<(String, usize)> {
    let inner = word.strip_prefix("=?")?;
    let (charset, after) = inner.split_once('?')?;
    let (encoding, after) = after.split_once('?')?;
    let end = after.find("?=")?;
    let text = &after[..end];

    if charset.is_empty()
        || charset.contains(char::is_whitespace)
        || encoding.len() != 1
        || text.contains(char::is_whitespace)
    {
        return None;
    }

    let bytes = match encoding {
        "B" | "b" => match LENIENT.decode(text) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(?e, "undecodable encoded word kept verbatim");
                return None;
            }
        },
        "Q" | "q" => decode_quoted_printable(&text.replace('_', " ")),
        _ => return None,
    };

    // RFC 2231 allows a language suffix: `utf-8*en`.
    let label = charset.split('*').next().unwrap_or(charset);
    let Some(charset_encoding) = Encoding::for_label(label.as_bytes()) else {
        tracing::warn!(charset, "unknown charset in encoded word kept verbatim");
        return None;
    };

    let (decoded, _) = charset_encoding.decode_without_bom_handling(&bytes);
    let consumed = 2 + charset.len() + 1 + encoding.len() + 1 + end + 2;
    Some((decoded.into_owned(), consumed))
}
