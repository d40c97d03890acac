//! Error types for MHTML operations.

/// Result type alias for MHTML operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MHTML error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error while reading the archive, including lines that are not valid UTF-8.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Header line that is neither a continuation nor a `name: value` pair.
    #[error("Invalid header at line {line}: {text:?}")]
    InvalidHeader {
        /// One-based line number in the source.
        line: usize,
        /// The offending line, without its terminator.
        text: String,
    },

    /// Missing required header.
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// Invalid content type.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Content type carries no usable boundary attribute.
    #[error("No boundary in Content-Type: {0:?}")]
    MissingBoundary(String),

    /// Unknown `Content-Transfer-Encoding`.
    #[error("Unsupported transfer encoding: {0}")]
    UnsupportedEncoding(String),

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Text was requested from a part whose content type is not `text/*`.
    #[error("Part is not text: {content_type}")]
    NotText {
        /// Content type of the part.
        content_type: String,
    },
}

impl Error {
    /// Returns true for errors raised while parsing archive structure
    /// (header blocks, content type, boundary).
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(
            self,
            Self::InvalidHeader { .. }
                | Self::MissingHeader(_)
                | Self::InvalidContentType(_)
                | Self::MissingBoundary(_)
        )
    }
}
