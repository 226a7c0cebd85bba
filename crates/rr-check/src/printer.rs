//! Rendering long descriptions for preview.

use std::fmt::Write as _;
use std::io::{self, Write};

use console::Style;
use rr_markup::{Renderer, Severity};

use crate::error::{CheckError, Diagnostics, INVALID_MARKUP, SYNTAX_WARNINGS};
use crate::host::Host;
use crate::resolve::resolve;

/// Exit status of a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

impl Status {
    /// Process exit code: 0 on success, 1 on failure.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
        }
    }

    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// Renders a host's long description to a writer.
///
/// Unlike [`Checker`](crate::Checker), a description that cannot be
/// rendered is a failure: the caller asked for output and gets none.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    halt_level: Severity,
    report_level: Severity,
    color: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self {
            halt_level: Severity::Warning,
            report_level: Severity::Warning,
            color: false,
        }
    }
}

impl Printer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_halt_level(mut self, level: Severity) -> Self {
        self.halt_level = level;
        self
    }

    #[must_use]
    pub fn with_report_level(mut self, level: Severity) -> Self {
        self.report_level = level;
        self
    }

    /// Highlight renderer messages by severity in warnings.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Render the host's description into `out`.
    ///
    /// The rendered HTML (or plain text) is written verbatim, exactly once.
    /// Nothing is written on failure.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to `out` fails.
    pub fn render<W: Write>(&self, host: &impl Host, out: &mut W) -> io::Result<Status> {
        let description = host.description();
        let markup = match resolve(description, host.content_type()) {
            Ok(markup) => markup,
            Err(err) => {
                host.warn(&err.to_string());
                return Ok(Status::Failure);
            }
        };

        let result = Renderer::new(markup)
            .with_halt_level(self.halt_level)
            .with_report_level(self.report_level)
            .render(description.unwrap_or_default());
        let diagnostics = Diagnostics::from(result.warnings);

        let Some(html) = result.html else {
            host.warn(&self.report(&CheckError::RenderFailure(diagnostics)));
            return Ok(Status::Failure);
        };
        if !diagnostics.is_empty() {
            host.warn(&self.report(&CheckError::SyntaxWarnings(diagnostics)));
        }

        tracing::debug!(%markup, bytes = html.len(), "Writing rendered description");
        out.write_all(html.as_bytes())?;
        out.flush()?;
        Ok(Status::Success)
    }

    /// Format an error for the warning channel, highlighting renderer
    /// messages by severity when colour is enabled.
    fn report(&self, err: &CheckError) -> String {
        let Some(diagnostics) = err.diagnostics().filter(|_| self.color) else {
            return err.to_string();
        };

        let mut report = String::new();
        for message in diagnostics {
            let style = severity_style(message.severity).force_styling(true);
            writeln!(report, "{}", style.apply_to(message)).unwrap();
        }
        report.push_str(if err.is_blocking() {
            INVALID_MARKUP
        } else {
            SYNTAX_WARNINGS
        });
        report
    }
}

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Debug | Severity::Info => Style::new().cyan(),
        Severity::Warning => Style::new().yellow(),
        Severity::Error | Severity::Severe => Style::new().red().bold(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::MockHost;

    const SIMPLE: &str = "This is a simple README.";
    const BORKED: &str = "Hello, I am some `totally borked< text.";

    fn render(host: &MockHost) -> (Status, String) {
        let mut out = Vec::new();
        let status = Printer::new().render(host, &mut out).unwrap();
        (status, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_render_default_is_rst() {
        let host = MockHost::new().with_description(SIMPLE);
        assert_eq!(
            render(&host),
            (Status::Success, "<p>This is a simple README.</p>\n".to_owned())
        );
        assert!(host.warnings().is_empty());
    }

    #[test]
    fn test_render_rst_and_markdown_match() {
        for content_type in ["text/x-rst", "text/markdown"] {
            let host = MockHost::new()
                .with_description(SIMPLE)
                .with_content_type(content_type);
            let (status, out) = render(&host);
            assert_eq!(status, Status::Success);
            assert_eq!(out, "<p>This is a simple README.</p>\n", "{content_type}");
        }
    }

    #[test]
    fn test_render_plain_text_verbatim() {
        let host = MockHost::new()
            .with_description(SIMPLE)
            .with_content_type("text/plain");
        assert_eq!(render(&host), (Status::Success, SIMPLE.to_owned()));
    }

    #[test]
    fn test_render_invalid_content_type() {
        let host = MockHost::new()
            .with_description(SIMPLE)
            .with_content_type("application/pdf");
        let (status, out) = render(&host);
        assert_eq!(status, Status::Failure);
        assert_eq!(status.code(), 1);
        assert_eq!(out, "");
        assert_eq!(host.warnings().len(), 1);
        assert!(host.warnings()[0].contains("content type"));
    }

    #[test]
    fn test_render_missing_description() {
        let (status, out) = render(&MockHost::new());
        assert_eq!(status, Status::Failure);
        assert_eq!(out, "");
    }

    #[test]
    fn test_render_failure_reports_messages() {
        let host = MockHost::new().with_description(BORKED);
        let (status, out) = render(&host);
        assert_eq!(status, Status::Failure);
        assert_eq!(out, "");
        let warnings = host.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("line 1: Warning:"));
        assert!(warnings[0].ends_with(INVALID_MARKUP));
    }

    #[test]
    fn test_render_with_warnings_still_writes() {
        let host = MockHost::new().with_description(BORKED);
        let mut out = Vec::new();
        let status = Printer::new()
            .with_halt_level(Severity::Error)
            .render(&host, &mut out)
            .unwrap();
        assert_eq!(status, Status::Success);
        assert!(String::from_utf8(out).unwrap().starts_with("<p>Hello, I am some"));
        assert!(host.warnings()[0].ends_with(SYNTAX_WARNINGS));
    }

    #[test]
    fn test_color_highlights_messages() {
        let host = MockHost::new().with_description(BORKED);
        let status = Printer::new()
            .with_color(true)
            .render(&host, &mut Vec::new())
            .unwrap();
        assert_eq!(status, Status::Failure);
        let warning = &host.warnings()[0];
        assert!(warning.contains("\u{1b}["));
        assert!(warning.contains("line 1: Warning:"));
        assert!(warning.ends_with(INVALID_MARKUP));
    }

    #[test]
    fn test_render_is_idempotent() {
        let host = MockHost::new()
            .with_description(SIMPLE)
            .with_content_type("text/markdown");
        assert_eq!(render(&host), render(&host));
        assert_eq!(Status::Success.code(), 0);
    }
}
