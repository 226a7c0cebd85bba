//! Check error taxonomy.

use std::fmt;

use rr_markup::{MarkupError, SystemMessage};

/// Final line of a render failure report.
pub(crate) const INVALID_MARKUP: &str =
    "The project's long_description has invalid markup which will not be rendered on PyPI.";

/// Final line of a report for output that rendered with warnings.
pub(crate) const SYNTAX_WARNINGS: &str =
    "The project's long_description has syntax warnings but will still be rendered.";

/// Line-tagged renderer messages, one per line when displayed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Diagnostics(pub Vec<SystemMessage>);

impl Diagnostics {
    pub fn iter(&self) -> std::slice::Iter<'_, SystemMessage> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for message in &self.0 {
            writeln!(f, "{message}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a SystemMessage;
    type IntoIter = std::slice::Iter<'a, SystemMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<SystemMessage>> for Diagnostics {
    fn from(messages: Vec<SystemMessage>) -> Self {
        Self(messages)
    }
}

/// Why a long description did not check clean.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    /// No description, or an empty one.
    #[error("The project's long_description is missing.")]
    MissingDescription,

    /// The declared content type names no known dialect.
    #[error("The project's long_description has an invalid content type {value:?}: {reason}")]
    InvalidContentType {
        value: String,
        #[source]
        reason: MarkupError,
    },

    /// Output was produced, but the renderer reported problems.
    #[error("{0}{summary}", summary = SYNTAX_WARNINGS)]
    SyntaxWarnings(Diagnostics),

    /// The renderer refused to produce output.
    #[error("{0}{summary}", summary = INVALID_MARKUP)]
    RenderFailure(Diagnostics),
}

impl CheckError {
    /// Whether the description cannot be rendered at all.
    ///
    /// Only [`CheckError::SyntaxWarnings`] leaves usable output behind.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        !matches!(self, Self::SyntaxWarnings(_))
    }

    /// Renderer messages carried by this error, if any.
    #[must_use]
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            Self::SyntaxWarnings(d) | Self::RenderFailure(d) => Some(d),
            Self::MissingDescription | Self::InvalidContentType { .. } => None,
        }
    }
}
