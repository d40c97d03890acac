//! Content-Transfer-Encoding handling.

use crate::encoding::{decode_base64, decode_quoted_printable};
use crate::error::{Error, Result};
use std::fmt;

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    #[default]
    SevenBit,
    /// 8-bit text.
    EightBit,
    /// Binary (no encoding).
    Binary,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
}

impl TransferEncoding {
    /// Parses transfer encoding from a header value, ignoring case and
    /// surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedEncoding`] for any other mechanism.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "7bit" => Ok(Self::SevenBit),
            "8bit" => Ok(Self::EightBit),
            "binary" => Ok(Self::Binary),
            "base64" => Ok(Self::Base64),
            "quoted-printable" => Ok(Self::QuotedPrintable),
            _ => Err(Error::UnsupportedEncoding(s.trim().to_string())),
        }
    }

    /// Parses an optional `Content-Transfer-Encoding` header; absent means 7bit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedEncoding`] for an unknown mechanism.
    pub fn from_header(value: Option<&str>) -> Result<Self> {
        value.map_or(Ok(Self::SevenBit), Self::parse)
    }

    /// Decodes a raw body into bytes.
    ///
    /// Identity encodings return the body's own bytes unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if Base64 decoding fails.
    pub fn decode(self, raw_body: &str) -> Result<Vec<u8>> {
        match self {
            Self::Base64 => decode_base64(raw_body),
            Self::QuotedPrintable => Ok(decode_quoted_printable(raw_body)),
            Self::SevenBit | Self::EightBit | Self::Binary => Ok(raw_body.as_bytes().to_vec()),
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Binary => write!(f, "binary"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
        }
    }
}

/// Decodes `raw_body` according to a `Content-Transfer-Encoding` header value.
///
/// # Errors
///
/// Returns [`Error::UnsupportedEncoding`] for an unknown mechanism, or a
/// decode error if the body is not valid for the named one.
pub fn decode(raw_body: &str, transfer_encoding: Option<&str>) -> Result<Vec<u8>> {
    TransferEncoding::from_header(transfer_encoding)?.decode(raw_body)
}
