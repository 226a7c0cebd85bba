//! Content type parsing and markup selection.
//!
//! A long description declares its dialect with a MIME-like string such as
//! `text/markdown; charset=UTF-8; variant=GFM`. Only the essence
//! (`type/subtype`) picks the renderer; parameters are either ignored
//! (`charset`) or refine the choice (`variant` for Markdown).

use std::fmt;
use std::path::Path;

/// Essence for reStructuredText.
pub const TEXT_X_RST: &str = "text/x-rst";
/// Essence for Markdown.
pub const TEXT_MARKDOWN: &str = "text/markdown";
/// Essence for plain text.
pub const TEXT_PLAIN: &str = "text/plain";

/// Error raised when a declared content type cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    /// The essence is not one of the supported dialects.
    #[error("unknown content type {0:?}, expected one of text/x-rst, text/markdown, text/plain")]
    UnknownContentType(String),
    /// `text/markdown` with a `variant` parameter we cannot render.
    #[error("unknown markdown variant {0:?}, expected GFM or CommonMark")]
    UnknownVariant(String),
}

/// Markdown flavour selected by the `variant` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkdownVariant {
    /// GitHub Flavored Markdown (tables, strikethrough, task lists, alerts).
    #[default]
    Gfm,
    /// Plain `CommonMark` without extensions.
    CommonMark,
}

impl MarkdownVariant {
    fn parse(value: &str) -> Result<Self, MarkupError> {
        match value {
            "GFM" => Ok(Self::Gfm),
            "CommonMark" => Ok(Self::CommonMark),
            other => Err(MarkupError::UnknownVariant(other.to_owned())),
        }
    }
}

/// Markup dialect of a long description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// reStructuredText.
    ReStructuredText,
    /// Markdown in the given flavour.
    Markdown(MarkdownVariant),
    /// Plain text, passed through untouched.
    PlainText,
}

impl Markup {
    /// Dialect assumed when no content type is declared.
    ///
    /// Package indexes treated undeclared descriptions as reStructuredText
    /// long before content types existed. This is kept for compatibility with
    /// those packages; new metadata should always declare a content type.
    pub const LEGACY_DEFAULT: Self = Self::ReStructuredText;

    /// Select the dialect for a declared content type.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError`] for unknown essences or Markdown variants.
    pub fn from_content_type(content_type: &str) -> Result<Self, MarkupError> {
        ContentType::parse(content_type).markup()
    }

    /// Guess the dialect from a readme file extension.
    ///
    /// Returns `None` for extensions with no conventional dialect.
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("rst") => Some(Self::ReStructuredText),
            Some("md" | "markdown") => Some(Self::Markdown(MarkdownVariant::default())),
            Some("txt") | None => Some(Self::PlainText),
            Some(_) => None,
        }
    }

    /// The canonical content type essence for this dialect.
    #[must_use]
    pub fn essence(self) -> &'static str {
        match self {
            Self::ReStructuredText => TEXT_X_RST,
            Self::Markdown(_) => TEXT_MARKDOWN,
            Self::PlainText => TEXT_PLAIN,
        }
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReStructuredText => f.write_str("reStructuredText"),
            Self::Markdown(MarkdownVariant::Gfm) => f.write_str("Markdown (GFM)"),
            Self::Markdown(MarkdownVariant::CommonMark) => f.write_str("Markdown (CommonMark)"),
            Self::PlainText => f.write_str("plain text"),
        }
    }
}

/// A parsed MIME-like content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType<'a> {
    /// `type/subtype`, trimmed.
    pub essence: &'a str,
    /// `key=value` parameters in declaration order, trimmed.
    pub params: Vec<(&'a str, &'a str)>,
}

impl<'a> ContentType<'a> {
    /// Split a content type into essence and parameters.
    ///
    /// Parameters without `=` are kept with an empty value. Parsing never
    /// fails; validity is decided by [`ContentType::markup`].
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        let mut parts = raw.split(';');
        let essence = parts.next().unwrap_or_default().trim();
        let params = parts
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| match p.split_once('=') {
                Some((k, v)) => (k.trim(), v.trim().trim_matches('"')),
                None => (p, ""),
            })
            .collect();
        Self { essence, params }
    }

    /// Look up a parameter by name (case-insensitive).
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&'a str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }

    /// Select the dialect for this content type.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError`] for unknown essences or Markdown variants.
    pub fn markup(&self) -> Result<Markup, MarkupError> {
        match self.essence {
            TEXT_X_RST => Ok(Markup::ReStructuredText),
            TEXT_PLAIN => Ok(Markup::PlainText),
            TEXT_MARKDOWN => {
                let variant = match self.param("variant") {
                    Some(v) => MarkdownVariant::parse(v)?,
                    None => MarkdownVariant::default(),
                };
                Ok(Markup::Markdown(variant))
            }
            _ => Err(MarkupError::UnknownContentType(self.essence.to_owned())),
        }
    }
}
