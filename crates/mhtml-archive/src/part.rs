//! A single archived resource.

use crate::charset::CharsetResolver;
use crate::content_type::{ContentType, primary_type};
use crate::error::{Error, Result};
use crate::header::{CONTENT_LOCATION, CONTENT_TRANSFER_ENCODING, CONTENT_TYPE, HeaderMap};
use crate::transfer::TransferEncoding;
use std::fmt;
use std::sync::OnceLock;

/// One part of an MHTML archive.
///
/// A part owns copies of its headers and encoded body, so it stays valid after
/// the archive moves on. Decoded bytes and text are computed on first access
/// and cached; the cache is thread-safe.
#[derive(Debug, Clone)]
pub struct Part {
    headers: HeaderMap,
    body: String,
    content_type: String,
    resolver: CharsetResolver,
    decoded: OnceLock<Vec<u8>>,
    text: OnceLock<String>,
}

impl Part {
    /// Creates a part decoded with the default charset resolver.
    #[must_use]
    pub fn new(headers: HeaderMap, body: impl Into<String>) -> Self {
        Self::with_resolver(headers, body, CharsetResolver::default())
    }

    /// Creates a part decoded with `resolver`.
    #[must_use]
    pub fn with_resolver(
        headers: HeaderMap,
        body: impl Into<String>,
        resolver: CharsetResolver,
    ) -> Self {
        let content_type = headers
            .get(CONTENT_TYPE)
            .map_or_else(|| ContentType::text_plain().essence(), primary_type);

        Self {
            headers,
            body: body.into(),
            content_type,
            resolver,
            decoded: OnceLock::new(),
            text: OnceLock::new(),
        }
    }

    /// Part headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Content type without parameters, lowercased (e.g. `text/html`).
    ///
    /// A part without a `Content-Type` header is `text/plain`.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Fully parsed `Content-Type` header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header has no `type/subtype` form.
    pub fn content_type_params(&self) -> Result<ContentType> {
        self.headers
            .get(CONTENT_TYPE)
            .map_or_else(|| Ok(ContentType::text_plain()), ContentType::parse)
    }

    /// Whether the content type begins with `text/`.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.content_type.starts_with("text/")
    }

    /// The `Content-Location` header: the URL this resource was saved from.
    #[must_use]
    pub fn content_location(&self) -> Option<&str> {
        self.headers.get(CONTENT_LOCATION)
    }

    /// The parsed `Content-Transfer-Encoding` header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedEncoding`] for an unknown mechanism.
    pub fn transfer_encoding(&self) -> Result<TransferEncoding> {
        TransferEncoding::from_header(self.headers.get(CONTENT_TRANSFER_ENCODING))
    }

    /// Body text exactly as captured from the archive, still transfer-encoded.
    #[must_use]
    pub fn encoded_body(&self) -> &str {
        &self.body
    }

    /// Body bytes after undoing the transfer encoding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedEncoding`] for an unknown transfer
    /// encoding, or a decode error for a malformed body. Failures are not
    /// cached.
    pub fn decoded_bytes(&self) -> Result<&[u8]> {
        if let Some(bytes) = self.decoded.get() {
            return Ok(bytes);
        }
        let bytes = self.transfer_encoding()?.decode(&self.body)?;
        Ok(self.decoded.get_or_init(|| bytes))
    }

    /// Body decoded to text using the detected charset.
    ///
    /// Malformed sequences are dropped. Detection runs once per part.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotText`] if the part is not `text/*`, or any error
    /// from [`Part::decoded_bytes`].
    pub fn text(&self) -> Result<&str> {
        if !self.is_text() {
            return Err(Error::NotText {
                content_type: self.content_type.clone(),
            });
        }
        if let Some(text) = self.text.get() {
            return Ok(text);
        }
        let bytes = self.decoded_bytes()?;
        Ok(self.text.get_or_init(|| self.resolver.decode_text(bytes)))
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Part content_type={}", self.content_type)?;
        if let Some(location) = self.content_location() {
            write!(f, " location={location}")?;
        }
        write!(f, " headers={}>", self.headers.len())
    }
}
