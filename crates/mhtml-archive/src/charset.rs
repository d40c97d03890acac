//! Character set detection and lossy text decoding.

use chardetng::EncodingDetector;
use encoding_rs::{DecoderResult, Encoding, UTF_8};
use std::fmt;
use std::sync::Arc;

/// Guesses the character encoding of a byte sequence.
///
/// Returning `None` means the guess is inconclusive and the caller falls back
/// to its default encoding.
pub trait CharsetDetector: fmt::Debug + Send + Sync {
    /// Detects the encoding of `bytes`.
    fn detect(&self, bytes: &[u8]) -> Option<&'static Encoding>;
}

/// Statistical detector backed by `chardetng`.
///
/// A byte order mark wins outright. Pure ASCII input is inconclusive, since
/// every ASCII-compatible encoding decodes it identically.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticalDetector;

impl CharsetDetector for StatisticalDetector {
    fn detect(&self, bytes: &[u8]) -> Option<&'static Encoding> {
        if let Some((encoding, _)) = Encoding::for_bom(bytes) {
            return Some(encoding);
        }
        if Encoding::ascii_valid_up_to(bytes) == bytes.len() {
            return None;
        }

        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);
        Some(detector.guess(None, true))
    }
}

/// Picks an encoding for a text part and decodes it.
#[derive(Debug, Clone)]
pub struct CharsetResolver {
    detector: Arc<dyn CharsetDetector>,
    fallback: &'static Encoding,
}

impl CharsetResolver {
    /// Creates a resolver from a detector and the encoding used when
    /// detection is inconclusive.
    #[must_use]
    pub fn new(detector: Arc<dyn CharsetDetector>, fallback: &'static Encoding) -> Self {
        Self { detector, fallback }
    }

    /// Returns the detected encoding, or the fallback.
    #[must_use]
    pub fn resolve(&self, bytes: &[u8]) -> &'static Encoding {
        self.detector.detect(bytes).unwrap_or(self.fallback)
    }

    /// Decodes `bytes` with the resolved encoding, dropping malformed sequences.
    #[must_use]
    pub fn decode_text(&self, bytes: &[u8]) -> String {
        let encoding = self.resolve(bytes);
        tracing::debug!(
            encoding = encoding.name(),
            len = bytes.len(),
            "decoding text part"
        );
        decode_lossy(bytes, encoding)
    }
}

impl Default for CharsetResolver {
    fn default() -> Self {
        Self::new(Arc::new(StatisticalDetector), UTF_8)
    }
}

/// Decodes `bytes` as `encoding`, silently skipping malformed sequences.
///
/// A leading byte order mark is stripped and takes precedence over `encoding`.
#[must_use]
pub fn decode_lossy(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (encoding, bom_length) = Encoding::for_bom(bytes).unwrap_or((encoding, 0));
    let mut input = &bytes[bom_length..];
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut output = String::with_capacity(
        decoder
            .max_utf8_buffer_length_without_replacement(input.len())
            .unwrap_or(input.len()),
    );

    loop {
        let (result, read) = decoder.decode_to_string_without_replacement(input, &mut output, true);
        input = &input[read..];
        match result {
            DecoderResult::InputEmpty => break,
            DecoderResult::OutputFull => {
                let needed = decoder
                    .max_utf8_buffer_length_without_replacement(input.len())
                    .unwrap_or(input.len())
                    .max(4);
                output.reserve(needed);
            }
            DecoderResult::Malformed(_, _) => {}
        }
    }

    output
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use encoding_rs::{UTF_16LE, WINDOWS_1252};

    #[derive(Debug)]
    struct Fixed(Option<&'static Encoding>);

    impl CharsetDetector for Fixed {
        fn detect(&self, _bytes: &[u8]) -> Option<&'static Encoding> {
            self.0
        }
    }

    #[test]
    fn test_detector_ascii_inconclusive() {
        assert_eq!(StatisticalDetector.detect(b"<!DOCTYPE html><html>"), None);
        assert_eq!(StatisticalDetector.detect(b""), None);
    }

    #[test]
    fn test_detector_bom() {
        assert_eq!(StatisticalDetector.detect(b"\xef\xbb\xbfhi"), Some(UTF_8));
        assert_eq!(StatisticalDetector.detect(b"\xff\xfeh\x00"), Some(UTF_16LE));
    }

    #[test]
    fn test_detector_utf8() {
        let text = "Grüße aus Köln, schöne Straße, Übermut und Ärger".as_bytes();
        assert_eq!(StatisticalDetector.detect(text), Some(UTF_8));
    }

    #[test]
    fn test_resolver_fallback() {
        let resolver = CharsetResolver::new(Arc::new(Fixed(None)), UTF_8);
        assert_eq!(resolver.resolve(b"abc"), UTF_8);

        let resolver = CharsetResolver::new(Arc::new(Fixed(Some(WINDOWS_1252))), UTF_8);
        assert_eq!(resolver.resolve(b"abc"), WINDOWS_1252);
        assert_eq!(resolver.decode_text(b"caf\xe9"), "café");
    }

    #[test]
    fn test_decode_lossy_ignores_malformed() {
        assert_eq!(decode_lossy(b"ab\xffcd\xc3", UTF_8), "abcd");
        assert_eq!(decode_lossy("héllo".as_bytes(), UTF_8), "héllo");
    }

    #[test]
    fn test_decode_lossy_strips_bom() {
        assert_eq!(decode_lossy(b"\xef\xbb\xbfbody", WINDOWS_1252), "body");
    }
}
