//! MIME header block handling.

use crate::encoding::decode_encoded_words;
use crate::error::{Error, Result};
use crate::source::LineSource;
use std::fmt;
use std::io::BufRead;

/// `Content-Type` header name.
pub const CONTENT_TYPE: &str = "Content-Type";
/// `Content-Transfer-Encoding` header name.
pub const CONTENT_TRANSFER_ENCODING: &str = "Content-Transfer-Encoding";
/// `Content-Location` header name.
pub const CONTENT_LOCATION: &str = "Content-Location";

/// Ordered collection of headers, one value per name.
///
/// Names keep the case they were written with; lookups ignore ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header value, replacing any existing value for the name.
    ///
    /// A replaced header keeps its original position. Returns the entry index.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> usize {
        let name = name.into();
        let value = value.into();
        if let Some(index) = self.position(&name) {
            self.entries[index].1 = value;
            index
        } else {
            self.entries.push((name, value));
            self.entries.len() - 1
        }
    }

    /// Gets the value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|index| self.entries[index].1.as_str())
    }

    /// Returns true if the header is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over all headers in the order they were read.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    /// Reads one header block from `source`, stopping after the first blank
    /// line or at the end of the stream.
    ///
    /// A line starting with a space or tab continues the previous header: the
    /// line minus that one whitespace character is appended to its value.
    /// Encoded words (RFC 2047) are decoded once the whole block is read.
    ///
    /// # Errors
    ///
    /// Returns an error if a line is neither a continuation nor contains a
    /// colon, or if reading from the source fails.
    pub fn parse_block<R: BufRead>(source: &mut LineSource<R>) -> Result<Self> {
        let mut headers = Self::new();
        let mut current: Option<usize> = None;
        let mut line = String::new();

        while source.next_line(&mut line)? {
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                break;
            }

            if trimmed.starts_with([' ', '\t']) {
                if let Some(index) = current {
                    headers.entries[index].1.push_str(&trimmed[1..]);
                }
                continue;
            }

            let Some((name, value)) = trimmed.split_once(':') else {
                return Err(Error::InvalidHeader {
                    line: source.line_number(),
                    text: trimmed.to_string(),
                });
            };
            current = Some(headers.insert(name.trim(), value.trim()));
        }

        for (_, value) in &mut headers.entries {
            if value.contains("=?") {
                *value = decode_encoded_words(value);
            }
        }

        tracing::trace!(
            count = headers.len(),
            line = source.line_number(),
            "parsed header block"
        );
        Ok(headers)
    }

    /// Parses a header block from text.
    ///
    /// # Errors
    ///
    /// Returns an error if a line is neither a continuation nor contains a colon.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_block(&mut LineSource::new(text.as_bytes()))
    }
}

impl fmt::Display for HeaderMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.entries {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}
