//! Streaming part splitter.

use crate::charset::CharsetResolver;
use crate::config::Config;
use crate::content_type::Boundary;
use crate::error::Result;
use crate::header::HeaderMap;
use crate::part::Part;
use crate::source::{LineSource, strip_line_terminator};
use std::io::BufRead;

/// Splits the body of an archive into parts, one boundary-delimited section
/// per call.
///
/// Expects the source to be positioned right after the archive's own header
/// block. Lines before the first delimiter are preamble and are skipped. Only
/// the part being assembled is held in memory.
#[derive(Debug)]
pub struct PartSplitter {
    boundary: Boundary,
    resolver: CharsetResolver,
    emit_truncated_part: bool,
    /// Headers of the part being assembled; `None` until the first delimiter.
    headers: Option<HeaderMap>,
    /// Body lines of the part being assembled, terminators included.
    buffer: String,
    /// A delimiter was just read and the next header block is still unread.
    awaiting_headers: bool,
    finished: bool,
}

impl PartSplitter {
    /// Creates a splitter for `boundary`.
    #[must_use]
    pub fn new(boundary: Boundary, config: &Config) -> Self {
        Self {
            boundary,
            resolver: config.resolver(),
            emit_truncated_part: config.emit_truncated_part,
            headers: None,
            buffer: String::new(),
            awaiting_headers: false,
            finished: false,
        }
    }

    /// Returns true once the closing delimiter, the end of the stream, or an
    /// error has been reached.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Reads from `source` until the next part is complete.
    ///
    /// Returns `Ok(None)` once the splitter is finished. After an error the
    /// splitter is finished as well.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or a part's header block is malformed.
    pub fn next_part<R: BufRead>(&mut self, source: &mut LineSource<R>) -> Result<Option<Part>> {
        if self.finished {
            return Ok(None);
        }
        let result = self.advance(source);
        if result.is_err() {
            self.finished = true;
        }
        result
    }

    fn advance<R: BufRead>(&mut self, source: &mut LineSource<R>) -> Result<Option<Part>> {
        let mut line = String::new();

        loop {
            if self.awaiting_headers {
                self.awaiting_headers = false;
                self.headers = Some(HeaderMap::parse_block(source)?);
            }

            if !source.next_line(&mut line)? {
                self.finished = true;
                return Ok(self.take_trailing_section());
            }

            if !self.boundary.is_delimiter(&line) {
                if self.headers.is_some() {
                    self.buffer.push_str(&line);
                } else {
                    tracing::trace!(line = source.line_number(), "skipping preamble");
                }
                continue;
            }

            let part = self.close_part();
            if self.boundary.is_closing(&line) {
                tracing::debug!(line = source.line_number(), "closing delimiter");
                self.finished = true;
            } else {
                self.awaiting_headers = true;
            }

            if part.is_some() || self.finished {
                return Ok(part);
            }
        }
    }

    /// Emits the part being assembled, minus the line terminator that belongs
    /// to the delimiter line.
    fn close_part(&mut self) -> Option<Part> {
        let headers = self.headers.take()?;
        let mut body = std::mem::take(&mut self.buffer);
        strip_line_terminator(&mut body);

        let part = Part::with_resolver(headers, body, self.resolver.clone());
        tracing::debug!(
            content_type = part.content_type(),
            location = part.content_location(),
            len = part.encoded_body().len(),
            "split part"
        );
        Some(part)
    }

    /// Handles a stream that ends without a closing delimiter.
    fn take_trailing_section(&mut self) -> Option<Part> {
        let headers = self.headers.take()?;
        if self.buffer.is_empty() {
            return None;
        }
        if self.emit_truncated_part {
            tracing::warn!("archive ended without closing delimiter, emitting trailing part");
            let body = std::mem::take(&mut self.buffer);
            return Some(Part::with_resolver(headers, body, self.resolver.clone()));
        }
        tracing::warn!(
            len = self.buffer.len(),
            "archive ended without closing delimiter, dropping trailing part"
        );
        self.buffer.clear();
        None
    }
}
