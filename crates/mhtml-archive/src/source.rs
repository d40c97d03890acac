//! Line-oriented input and the adapters that open an archive from bytes,
//! strings, readers and paths.

use crate::archive::Archive;
use crate::error::Result;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Line reader over a buffered source, counting lines as it goes.
///
/// Lines are handed out with their terminator intact so part bodies can be
/// reassembled byte for byte.
#[derive(Debug)]
pub struct LineSource<R> {
    reader: R,
    line: usize,
}

impl<R: BufRead> LineSource<R> {
    /// Reads the next line, terminator included, into `buf`.
    ///
    /// `buf` is cleared first. Returns `false` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails or the line is not valid UTF-8.
    pub fn next_line(&mut self, buf: &mut String) -> Result<bool> {
        buf.clear();
        if self.reader.read_line(buf)? == 0 {
            return Ok(false);
        }
        self.line += 1;
        Ok(true)
    }
}

impl<R> LineSource<R> {
    /// Wraps a reader; reading lines requires it to be buffered.
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self { reader, line: 0 }
    }

    /// One-based number of the line most recently read (0 before the first read).
    #[must_use]
    pub const fn line_number(&self) -> usize {
        self.line
    }

    /// Returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Removes one trailing `\r\n` or `\n`, if present.
pub(crate) fn strip_line_terminator(text: &mut String) {
    if text.ends_with("\r\n") {
        text.truncate(text.len() - 2);
    } else if text.ends_with('\n') {
        text.truncate(text.len() - 1);
    }
}

/// Opens an archive held in memory.
///
/// The archive is read as UTF-8 text (MHTML archives are ASCII in practice).
/// A line that is not valid UTF-8, such as raw bytes in a `binary` part,
/// fails with [`Error::Io`](crate::Error::Io) and ends iteration: the parts
/// after it are not read.
///
/// # Errors
///
/// Returns an error if the archive header block is malformed or lacks a boundary.
pub fn from_bytes(bytes: &[u8]) -> Result<Archive<&[u8]>> {
    Archive::open(bytes)
}

/// Opens an archive from a string.
///
/// # Errors
///
/// Returns an error if the archive header block is malformed or lacks a boundary.
pub fn from_string(text: &str) -> Result<Archive<&[u8]>> {
    from_bytes(text.as_bytes())
}

/// Opens an archive from any reader, buffering it.
///
/// As with [`from_bytes`], the stream must be UTF-8 text; an invalid line
/// fails with [`Error::Io`](crate::Error::Io) and ends iteration.
///
/// # Errors
///
/// Returns an error if reading fails or the archive header block is malformed
/// or lacks a boundary.
pub fn from_reader<R: Read>(reader: R) -> Result<Archive<BufReader<R>>> {
    Archive::open(BufReader::new(reader))
}

/// Opens the archive stored at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or the archive header block
/// is malformed or lacks a boundary.
pub fn from_path(path: impl AsRef<Path>) -> Result<Archive<BufReader<File>>> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "opening archive");
    from_reader(File::open(path)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_next_line_keeps_terminator() {
        let mut source = LineSource::new("one\r\ntwo\nthree".as_bytes());
        let mut line = String::new();

        assert!(source.next_line(&mut line).unwrap());
        assert_eq!(line, "one\r\n");
        assert!(source.next_line(&mut line).unwrap());
        assert_eq!(line, "two\n");
        assert!(source.next_line(&mut line).unwrap());
        assert_eq!(line, "three");
        assert_eq!(source.line_number(), 3);

        assert!(!source.next_line(&mut line).unwrap());
        assert!(line.is_empty());
    }

    #[test]
    fn test_next_line_rejects_invalid_utf8() {
        let bytes: &[u8] = b"ok\n\xff\xfe\n";
        let mut source = LineSource::new(bytes);
        let mut line = String::new();

        assert!(source.next_line(&mut line).unwrap());
        assert!(source.next_line(&mut line).is_err());
    }

    #[test]
    fn test_line_number_without_bufread() {
        let source = LineSource::new(std::io::empty());
        assert_eq!(source.line_number(), 0);

        struct Unbuffered;
        let source = LineSource::new(Unbuffered);
        assert_eq!(source.line_number(), 0);
        let _reader: Unbuffered = source.into_inner();
    }

    #[test]
    fn test_strip_line_terminator() {
        let mut crlf = String::from("body\r\n");
        strip_line_terminator(&mut crlf);
        assert_eq!(crlf, "body");

        let mut lf = String::from("body\n\n");
        strip_line_terminator(&mut lf);
        assert_eq!(lf, "body\n");

        let mut bare = String::from("body");
        strip_line_terminator(&mut bare);
        assert_eq!(bare, "body");
    }
}
