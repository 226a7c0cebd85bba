//! Colored terminal output utilities.

use console::{Style, Term};

/// Terminal output formatter writing to stderr.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow_bold: Style,
    red: Style,
}

impl Output {
    /// Create a new output formatter.
    ///
    /// Colors follow the terminal (and `NO_COLOR`/`CLICOLOR_FORCE`).
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().for_stderr().green(),
            yellow_bold: Style::new().for_stderr().yellow().bold(),
            red: Style::new().for_stderr().red(),
        }
    }

    /// Disable colors regardless of the terminal.
    #[must_use]
    pub(crate) fn without_color(self) -> Self {
        Self {
            green: self.green.force_styling(false),
            yellow_bold: self.yellow_bold.force_styling(false),
            red: self.red.force_styling(false),
            ..self
        }
    }

    /// Whether stderr is an interactive terminal.
    pub(crate) fn is_term(&self) -> bool {
        self.term.is_term()
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning with a yellow `warning:` prefix.
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&format_warning(&self.yellow_bold, msg));
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }
}

/// Prefix the first line of a possibly multi-line warning.
fn format_warning(prefix: &Style, msg: &str) -> String {
    format!("{} {msg}", prefix.apply_to("warning:"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_format_warning_plain() {
        let style = Style::new().yellow().force_styling(false);
        assert_eq!(
            format_warning(&style, "line 1: Warning: oops\nsummary"),
            "warning: line 1: Warning: oops\nsummary"
        );
    }

    #[test]
    fn test_format_warning_colored() {
        let style = Style::new().yellow().force_styling(true);
        let text = format_warning(&style, "oops");
        assert!(text.starts_with("\u{1b}["));
        assert!(text.ends_with(" oops"));
    }
}
