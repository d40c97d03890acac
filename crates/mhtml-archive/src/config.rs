//! Archive parsing configuration.

use crate::charset::{CharsetDetector, CharsetResolver, StatisticalDetector};
use encoding_rs::{Encoding, UTF_8};
use std::sync::Arc;

/// Parsing configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Detector used to guess the charset of text parts.
    pub detector: Arc<dyn CharsetDetector>,
    /// Encoding used when detection is inconclusive.
    pub fallback_encoding: &'static Encoding,
    /// Emit the trailing section of an archive that ends without a closing
    /// delimiter instead of dropping it.
    pub emit_truncated_part: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detector: Arc::new(StatisticalDetector),
            fallback_encoding: UTF_8,
            emit_truncated_part: false,
        }
    }
}

impl Config {
    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Resolver handed to every part produced under this configuration.
    #[must_use]
    pub fn resolver(&self) -> CharsetResolver {
        CharsetResolver::new(Arc::clone(&self.detector), self.fallback_encoding)
    }
}

/// Builder for parsing configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Sets the charset detector.
    #[must_use]
    pub fn detector(mut self, detector: impl CharsetDetector + 'static) -> Self {
        self.config.detector = Arc::new(detector);
        self
    }

    /// Sets a shared charset detector.
    #[must_use]
    pub fn shared_detector(mut self, detector: Arc<dyn CharsetDetector>) -> Self {
        self.config.detector = detector;
        self
    }

    /// Sets the encoding used when detection is inconclusive.
    #[must_use]
    pub fn fallback_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.config.fallback_encoding = encoding;
        self
    }

    /// Sets whether a trailing section without a closing delimiter is emitted.
    #[must_use]
    pub fn emit_truncated_part(mut self, emit: bool) -> Self {
        self.config.emit_truncated_part = emit;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}
