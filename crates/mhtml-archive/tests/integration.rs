//! Integration tests for the archive reader.
//!
//! These tests read a page saved by Blink (`tests/fixtures/example_com.mhtml`)
//! through every input adapter.

#![allow(clippy::unwrap_used)]

use std::fs::File;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use mhtml_archive::encoding_rs::{Encoding, UTF_8};
use mhtml_archive::{Archive, CharsetDetector, Config, Error, Part, StatisticalDetector};

const EXAMPLE_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/example_com.mhtml");
const EXAMPLE_URL: &str = "https://www.example.com/";

/// The 1x1 PNG stored in the fixture's third part.
const FAVICON_HEX: &str = "89504e470d0a1a0a0000000d49484452000000010000000108060000001f15c4890000000d49444154789c63f8cfc0f01f00050001ff89993d1d0000000049454e44ae426082";

fn fixture() -> Vec<u8> {
    std::fs::read(EXAMPLE_PATH).unwrap()
}

fn hex(text: &str) -> Vec<u8> {
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).unwrap())
        .collect()
}

fn collect<R: std::io::BufRead>(archive: &mut Archive<R>) -> Vec<Part> {
    archive.parts().map(Result::unwrap).collect()
}

/// Detector double that counts calls and defers to the real detector.
#[derive(Debug, Default)]
struct CountingDetector {
    calls: AtomicUsize,
}

impl CharsetDetector for CountingDetector {
    fn detect(&self, bytes: &[u8]) -> Option<&'static Encoding> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        StatisticalDetector.detect(bytes)
    }
}

#[test]
fn test_every_adapter_opens_the_archive() {
    let bytes = fixture();
    let text = String::from_utf8(bytes.clone()).unwrap();

    let mut archives = vec![
        collect(&mut mhtml_archive::from_bytes(&bytes).unwrap()),
        collect(&mut mhtml_archive::from_string(&text).unwrap()),
        collect(&mut mhtml_archive::from_path(EXAMPLE_PATH).unwrap()),
        collect(&mut mhtml_archive::from_reader(File::open(EXAMPLE_PATH).unwrap()).unwrap()),
        collect(&mut mhtml_archive::from_reader(Cursor::new(bytes.clone())).unwrap()),
    ];

    let expected: Vec<String> = archives
        .pop()
        .unwrap()
        .iter()
        .map(|part| part.encoded_body().to_string())
        .collect();
    assert_eq!(expected.len(), 3);

    for parts in archives {
        let bodies: Vec<String> = parts
            .iter()
            .map(|part| part.encoded_body().to_string())
            .collect();
        assert_eq!(bodies, expected);
    }
}

#[test]
fn test_archive_headers() {
    let archive = mhtml_archive::from_path(EXAMPLE_PATH).unwrap();

    assert_eq!(archive.headers().get("From"), Some("<Saved by Blink>"));
    assert_eq!(
        archive.headers().get("Snapshot-Content-Location"),
        Some(EXAMPLE_URL)
    );
    assert_eq!(
        archive.headers().get("Subject"),
        Some("Example Domain \u{2014} caf\u{e9}")
    );
    assert_eq!(archive.content_type(), "multipart/related");
    assert_eq!(
        archive.boundary().as_str(),
        "------MultipartBoundary--vJkQcfIq7RwYyM5Y3DwuTnGUlJMhI2JzXf0NO7pxPj----"
    );
}

#[test]
fn test_parsing() {
    let mut archive = mhtml_archive::from_path(EXAMPLE_PATH).unwrap();
    let parts = collect(&mut archive);
    assert_eq!(parts.len(), 3);

    let html = &parts[0];
    assert_eq!(html.headers().get("Content-Location"), Some(EXAMPLE_URL));
    assert_eq!(html.content_type(), "text/html");
    assert!(html.is_text());
    assert!(html.decoded_bytes().unwrap().starts_with(b"<!DOCTYPE html><html>"));
    let text = html.text().unwrap();
    assert!(text.starts_with("<!DOCTYPE html><html>"));
    assert!(text.contains("Caf\u{e9} cr\u{e8}me."));
    assert!(text.ends_with("</html>"));

    let css = &parts[1];
    assert_eq!(css.content_type(), "text/css");
    assert!(css.is_text());
    assert!(css.decoded_bytes().unwrap().starts_with(b"@charset \"utf-8\";"));
    assert!(css.text().unwrap().starts_with("@charset \"utf-8\";\r\n\r\n"));

    let png = &parts[2];
    assert_eq!(png.content_type(), "image/png");
    assert!(!png.is_text());
    assert_eq!(png.decoded_bytes().unwrap(), hex(FAVICON_HEX).as_slice());
    assert!(matches!(png.text().unwrap_err(), Error::NotText { .. }));
}

#[test]
fn test_parts_outlive_archive() {
    let parts = {
        let bytes = fixture();
        let mut archive = mhtml_archive::from_reader(Cursor::new(bytes)).unwrap();
        collect(&mut archive)
    };
    assert_eq!(parts[0].content_location(), Some(EXAMPLE_URL));
    assert!(parts[0].text().unwrap().contains("Example Domain"));
}

#[test]
fn test_archive_is_not_restartable() {
    let bytes = fixture();
    let mut archive = mhtml_archive::from_bytes(&bytes).unwrap();
    assert_eq!(archive.parts().count(), 3);
    assert_eq!(archive.parts().count(), 0);

    let mut fresh = mhtml_archive::from_bytes(&bytes).unwrap();
    assert_eq!(fresh.parts().count(), 3);
}

#[test]
fn test_charset_detection_runs_once_per_part() {
    let detector = Arc::new(CountingDetector::default());
    let config = Config::builder().shared_detector(detector.clone()).build();

    let bytes = fixture();
    let mut archive = Archive::open_with_config(bytes.as_slice(), &config).unwrap();
    let parts = collect(&mut archive);

    for _ in 0..3 {
        parts[0].text().unwrap();
        parts[1].text().unwrap();
    }
    assert!(parts[2].text().is_err());

    assert_eq!(detector.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_fallback_encoding_for_ascii_text() {
    #[derive(Debug)]
    struct Inconclusive;

    impl CharsetDetector for Inconclusive {
        fn detect(&self, _bytes: &[u8]) -> Option<&'static Encoding> {
            None
        }
    }

    let config = Config::builder()
        .detector(Inconclusive)
        .fallback_encoding(UTF_8)
        .build();
    let bytes = fixture();
    let mut archive = Archive::open_with_config(bytes.as_slice(), &config).unwrap();
    let parts = collect(&mut archive);
    assert!(parts[0].text().unwrap().contains("Caf\u{e9}"));
}

#[test]
fn test_truncated_archive() {
    let bytes = fixture();
    let text = String::from_utf8(bytes).unwrap();
    let cut = text.rfind("------MultipartBoundary").unwrap();
    let truncated = &text[..cut];

    let mut archive = mhtml_archive::from_string(truncated).unwrap();
    assert_eq!(collect(&mut archive).len(), 2);

    let config = Config::builder().emit_truncated_part(true).build();
    let mut archive = Archive::open_with_config(truncated.as_bytes(), &config).unwrap();
    let parts = collect(&mut archive);
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[2].content_type(), "image/png");
    assert_eq!(parts[2].decoded_bytes().unwrap(), hex(FAVICON_HEX).as_slice());
}

#[test]
fn test_open_rejects_non_archive() {
    let err = mhtml_archive::from_string("<!DOCTYPE html><html></html>\n").unwrap_err();
    assert!(err.is_parse());

    let err = mhtml_archive::from_string("Content-Type: text/html\r\n\r\n<html>").unwrap_err();
    assert!(matches!(err, Error::MissingBoundary(_)));
}

#[test]
fn test_open_missing_file() {
    let err = mhtml_archive::from_path("/nonexistent/page.mhtml").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
