//! Validity checking for long descriptions.

use rr_markup::{Markup, Renderer, Severity};

use crate::error::CheckError;
use crate::host::Host;
use crate::resolve::resolve;

/// Checks that a host's long description renders.
///
/// Problems are reported through [`Host::warn`]; the checker itself never
/// fails. Whether a warning should stop a build is up to the host.
#[derive(Debug, Clone, Copy)]
pub struct Checker {
    halt_level: Severity,
    report_level: Severity,
}

impl Default for Checker {
    fn default() -> Self {
        Self {
            halt_level: Severity::Warning,
            report_level: Severity::Warning,
        }
    }
}

impl Checker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the severity at which reStructuredText rendering fails.
    #[must_use]
    pub fn with_halt_level(mut self, level: Severity) -> Self {
        self.halt_level = level;
        self
    }

    /// Set the minimum severity of reported renderer messages.
    #[must_use]
    pub fn with_report_level(mut self, level: Severity) -> Self {
        self.report_level = level;
        self
    }

    /// Check the host's description, returning the warnings sent to it.
    ///
    /// At most one warning is emitted per call. A clean description is
    /// announced instead.
    pub fn check(&self, host: &impl Host) -> Vec<String> {
        match self.evaluate(host.description(), host.content_type()) {
            Ok(markup) => {
                host.announce(&format!(
                    "The project's long description is valid {markup}."
                ));
                Vec::new()
            }
            Err(err) => {
                tracing::debug!(blocking = err.is_blocking(), "Long description check failed");
                let message = err.to_string();
                host.warn(&message);
                vec![message]
            }
        }
    }

    /// Resolve and render without reporting.
    ///
    /// # Errors
    ///
    /// Returns the [`CheckError`] describing the first problem found.
    pub fn evaluate(
        &self,
        description: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<Markup, CheckError> {
        let markup = resolve(description, content_type)?;
        let result = Renderer::new(markup)
            .with_halt_level(self.halt_level)
            .with_report_level(self.report_level)
            .render(description.unwrap_or_default());

        if !result.is_rendered() {
            return Err(CheckError::RenderFailure(result.warnings.into()));
        }
        if !result.warnings.is_empty() {
            return Err(CheckError::SyntaxWarnings(result.warnings.into()));
        }
        Ok(markup)
    }
}
