//! Markup-independent rendering entry point.

use crate::content_type::Markup;
use crate::message::{Severity, SystemMessage};
use crate::{markdown, rst};

/// Outcome of rendering a long description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML, or `None` when a diagnostic reached the halt level.
    pub html: Option<String>,
    /// Diagnostics at or above the report level, ordered by line.
    pub warnings: Vec<SystemMessage>,
}

impl RenderResult {
    /// Whether rendering produced output.
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.html.is_some()
    }
}

/// Renders text in a fixed markup dialect.
///
/// Markdown and plain text never fail. reStructuredText fails when any
/// diagnostic is at least as severe as the halt level, which defaults to
/// [`Severity::Warning`] so that any reported problem blocks publication.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    markup: Markup,
    halt_level: Severity,
    report_level: Severity,
}

impl Renderer {
    #[must_use]
    pub fn new(markup: Markup) -> Self {
        Self {
            markup,
            halt_level: Severity::Warning,
            report_level: Severity::Warning,
        }
    }

    /// Set the severity at which rendering fails.
    #[must_use]
    pub fn with_halt_level(mut self, level: Severity) -> Self {
        self.halt_level = level;
        self
    }

    /// Set the minimum severity of reported diagnostics.
    #[must_use]
    pub fn with_report_level(mut self, level: Severity) -> Self {
        self.report_level = level;
        self
    }

    /// Render `text` to HTML.
    #[must_use]
    pub fn render(&self, text: &str) -> RenderResult {
        match self.markup {
            Markup::PlainText => RenderResult {
                html: Some(text.to_owned()),
                warnings: Vec::new(),
            },
            Markup::Markdown(variant) => RenderResult {
                html: Some(markdown::render(text, variant)),
                warnings: Vec::new(),
            },
            Markup::ReStructuredText => {
                let (html, messages) = rst::render(text);
                let halted = messages.iter().any(|m| m.severity >= self.halt_level);
                let warnings = messages
                    .into_iter()
                    .filter(|m| m.severity >= self.report_level)
                    .collect();
                RenderResult {
                    html: (!halted).then_some(html),
                    warnings,
                }
            }
        }
    }
}
