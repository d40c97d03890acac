//! MHTML archive and its lazy part sequence.

use crate::config::Config;
use crate::content_type::{Boundary, primary_type};
use crate::error::{Error, Result};
use crate::header::{CONTENT_TYPE, HeaderMap};
use crate::part::Part;
use crate::source::LineSource;
use crate::splitter::PartSplitter;
use std::fmt;
use std::io::BufRead;
use std::iter::FusedIterator;

/// An open MHTML archive.
///
/// Opening reads only the archive's own header block. Parts are read from
/// the stream on demand and the stream is never rewound: once a part has been
/// yielded it cannot be produced again from the same archive.
pub struct Archive<R> {
    source: LineSource<R>,
    headers: HeaderMap,
    content_type: String,
    boundary: Boundary,
    splitter: PartSplitter,
}

impl<R: BufRead> Archive<R> {
    /// Opens an archive with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the header block is malformed, has no
    /// `Content-Type`, or the content type declares no boundary.
    pub fn open(reader: R) -> Result<Self> {
        Self::open_with_config(reader, &Config::default())
    }

    /// Opens an archive with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the header block is malformed, has no
    /// `Content-Type`, or the content type declares no boundary.
    pub fn open_with_config(reader: R, config: &Config) -> Result<Self> {
        let mut source = LineSource::new(reader);
        let headers = HeaderMap::parse_block(&mut source)?;

        let value = headers
            .get(CONTENT_TYPE)
            .ok_or_else(|| Error::MissingHeader(CONTENT_TYPE.to_string()))?;
        let boundary = Boundary::from_content_type(value)?;
        let content_type = primary_type(value);

        tracing::debug!(
            %boundary,
            content_type = %content_type,
            headers = headers.len(),
            "opened archive"
        );

        Ok(Self {
            source,
            splitter: PartSplitter::new(boundary.clone(), config),
            headers,
            content_type,
            boundary,
        })
    }

    /// Reads the next part from the stream.
    ///
    /// Returns `Ok(None)` after the closing delimiter or at the end of the
    /// stream.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the part's header block is
    /// malformed. No further parts are produced after an error.
    pub fn next_part(&mut self) -> Result<Option<Part>> {
        self.splitter.next_part(&mut self.source)
    }

    /// Iterates over the remaining parts.
    pub fn parts(&mut self) -> Parts<'_, R> {
        Parts { archive: self }
    }

    /// Consumes the archive, returning the underlying reader at its current
    /// position.
    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }
}

impl<R> Archive<R> {
    /// Archive-level headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The archive's content type without parameters (usually `multipart/related`).
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Delimiter prefix separating parts.
    #[must_use]
    pub const fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Returns true once no more parts can be read.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.splitter.is_finished()
    }
}

impl<R> fmt::Debug for Archive<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Archive")
            .field("headers", &self.headers)
            .field("content_type", &self.content_type)
            .field("boundary", &self.boundary)
            .field("line", &self.source.line_number())
            .finish_non_exhaustive()
    }
}

impl<R> fmt::Display for Archive<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Archive content_type={} boundary={} headers={}>",
            self.content_type,
            self.boundary,
            self.headers.len()
        )
    }
}

/// Lazy, forward-only iterator over an archive's parts.
///
/// Yields `Err` at most once, then stops.
pub struct Parts<'a, R> {
    archive: &'a mut Archive<R>,
}

impl<R: BufRead> Iterator for Parts<'_, R> {
    type Item = Result<Part>;

    fn next(&mut self) -> Option<Self::Item> {
        self.archive.next_part().transpose()
    }
}

impl<R: BufRead> FusedIterator for Parts<'_, R> {}

impl<R> fmt::Debug for Parts<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parts").field("archive", &self.archive).finish()
    }
}
