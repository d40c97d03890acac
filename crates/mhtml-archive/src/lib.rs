//! # mhtml-archive
//!
//! Streaming reader for MHTML archives, the single-file web page format saved
//! by Chromium and other browsers.
//!
//! ## Features
//!
//! - **Lazy part splitting**: parts are read from the stream one at a time;
//!   only the part being assembled is held in memory
//! - **Header blocks**: folded lines and RFC 2047 encoded words
//! - **Transfer encodings**: Base64, Quoted-Printable, 7bit/8bit/binary
//! - **Charset detection**: statistical detection of text parts, with a
//!   pluggable [`CharsetDetector`]
//!
//! ## Quick Start
//!
//! ```ignore
//! let mut archive = mhtml_archive::from_path("page.mhtml")?;
//! println!("Saved from {:?}", archive.headers().get("Snapshot-Content-Location"));
//!
//! for part in archive.parts() {
//!     let part = part?;
//!     println!("{} {:?}", part.content_type(), part.content_location());
//!     if part.is_text() {
//!         println!("{}", part.text()?);
//!     }
//! }
//! ```
//!
//! ### Custom charset detection
//!
//! ```ignore
//! use mhtml_archive::{Archive, Config};
//!
//! let config = Config::builder()
//!     .fallback_encoding(mhtml_archive::encoding_rs::WINDOWS_1252)
//!     .build();
//! let archive = Archive::open_with_config(reader, &config)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod archive;
mod charset;
mod config;
mod content_type;
mod error;
mod header;
mod part;
mod source;
mod splitter;
mod transfer;

pub mod encoding;

pub use archive::{Archive, Parts};
pub use charset::{CharsetDetector, CharsetResolver, StatisticalDetector, decode_lossy};
pub use config::{Config, ConfigBuilder};
pub use content_type::{Boundary, ContentType};
pub use error::{Error, Result};
pub use header::{CONTENT_LOCATION, CONTENT_TRANSFER_ENCODING, CONTENT_TYPE, HeaderMap};
pub use part::Part;
pub use source::{LineSource, from_bytes, from_path, from_reader, from_string};
pub use splitter::PartSplitter;
pub use transfer::{TransferEncoding, decode as decode_transfer};

pub use encoding_rs;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
