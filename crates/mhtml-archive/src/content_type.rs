//! MIME content type handling and boundary extraction.

use crate::error::{Error, Result};
use std::fmt;

/// MIME content type with its parameters in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentType {
    /// Main type (e.g., "text", "image", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "html", "png", "related").
    pub sub_type: String,
    /// Parameters (e.g., charset=utf-8, boundary=xxx).
    pub parameters: Vec<(String, String)>,
}

impl ContentType {
    /// Creates a new content type.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            sub_type: sub_type.into(),
            parameters: Vec::new(),
        }
    }

    /// Creates a text/plain content type, the MIME default for a part
    /// without a `Content-Type` header.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain")
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((key.into(), value.into()));
        self
    }

    /// Returns the first parameter with exactly this key.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the charset parameter if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.attribute("charset")
    }

    /// Returns the boundary parameter if present.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.attribute("boundary")
    }

    /// Returns `type/subtype` without parameters.
    #[must_use]
    pub fn essence(&self) -> String {
        format!("{}/{}", self.main_type, self.sub_type)
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("multipart")
    }

    /// Checks if this is a text content type.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("text")
    }

    /// Parses a content type string.
    ///
    /// Format: `type/subtype; param1=value1; param2="value 2"`
    ///
    /// Type and subtype are lowercased. Parameter keys are kept as written;
    /// a value loses one matching pair of surrounding single or double quotes.
    /// Segments without `=` are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the type has no `/` separator.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split(';');

        let type_str = parts.next().unwrap_or_default().trim();
        let (main_type, sub_type) = type_str
            .split_once('/')
            .ok_or_else(|| Error::InvalidContentType(s.to_string()))?;

        let mut content_type = Self::new(
            main_type.trim().to_lowercase(),
            sub_type.trim().to_lowercase(),
        );

        for param in parts {
            if let Some((key, value)) = param.split_once('=') {
                content_type
                    .parameters
                    .push((key.trim().to_string(), unquote(value.trim()).to_string()));
            }
        }

        Ok(content_type)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let main = &self.main_type;
        let sub = &self.sub_type;
        write!(f, "{main}/{sub}")?;

        for (key, value) in &self.parameters {
            // Quote value if it contains special characters
            if value.contains(|c: char| c.is_whitespace() || "()<>@,;:\\\"/[]?=".contains(c)) {
                write!(f, "; {key}=\"{value}\"")?;
            } else {
                write!(f, "; {key}={value}")?;
            }
        }

        Ok(())
    }
}

/// Strips one matching pair of surrounding single or double quotes.
fn unquote(value: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| value.strip_prefix(quote)?.strip_suffix(quote))
        .unwrap_or(value)
}

/// Primary token of a `Content-Type` value: everything before the first `;`,
/// trimmed and lowercased.
pub(crate) fn primary_type(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Delimiter prefix separating parts: `"--"` followed by the boundary value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Boundary(String);

impl Boundary {
    /// Extracts the boundary from a `Content-Type` value.
    ///
    /// The `boundary` attribute key is matched case-sensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the value has no attributes, no `boundary`
    /// attribute, or an empty one.
    pub fn from_content_type(value: &str) -> Result<Self> {
        if !value.contains(';') {
            return Err(Error::MissingBoundary(value.to_string()));
        }

        let content_type = ContentType::parse(value)?;
        match content_type.boundary() {
            Some(boundary) if !boundary.is_empty() => Ok(Self(format!("--{boundary}"))),
            _ => Err(Error::MissingBoundary(value.to_string())),
        }
    }

    /// The delimiter prefix, including the leading `--`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `line` opens or closes a part.
    #[must_use]
    pub fn is_delimiter(&self, line: &str) -> bool {
        line.starts_with(&self.0)
    }

    /// Returns true if `line` is the closing delimiter (`--boundary--`).
    #[must_use]
    pub fn is_closing(&self, line: &str) -> bool {
        line.strip_prefix(&self.0)
            .is_some_and(|rest| rest.starts_with("--"))
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Boundary {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
