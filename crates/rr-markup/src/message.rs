//! Diagnostics produced while rendering.

use std::fmt;
use std::str::FromStr;

/// Severity of a [`SystemMessage`], ordered from least to most severe.
///
/// Levels mirror the docutils reporter so thresholds read the same way
/// (`Warning` is level 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Severe,
}

impl Severity {
    /// Title-case label used in formatted messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Severe => "Severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown severity name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity {0:?}, expected debug, info, warning, error or severe")]
pub struct ParseSeverityError(String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" | "0" => Ok(Self::Debug),
            "info" | "1" => Ok(Self::Info),
            "warning" | "2" => Ok(Self::Warning),
            "error" | "3" => Ok(Self::Error),
            "severe" | "4" => Ok(Self::Severe),
            _ => Err(ParseSeverityError(s.to_owned())),
        }
    }
}

/// A single line-tagged diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemMessage {
    /// 1-based source line.
    pub line: usize,
    pub severity: Severity,
    pub message: String,
}

impl SystemMessage {
    #[must_use]
    pub fn new(line: usize, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            line,
            severity,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(line: usize, message: impl Into<String>) -> Self {
        Self::new(line, Severity::Warning, message)
    }

    #[must_use]
    pub fn error(line: usize, message: impl Into<String>) -> Self {
        Self::new(line, Severity::Error, message)
    }

    #[must_use]
    pub fn severe(line: usize, message: impl Into<String>) -> Self {
        Self::new(line, Severity::Severe, message)
    }
}

impl fmt::Display for SystemMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.severity, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let msg = SystemMessage::warning(3, "Title underline too short.");
        assert_eq!(msg.to_string(), "line 3: Warning: Title underline too short.");
    }

    #[test]
    fn test_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Severe > Severity::Error);
        assert!(Severity::Debug < Severity::Info);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Warning".parse(), Ok(Severity::Warning));
        assert_eq!("severe".parse(), Ok(Severity::Severe));
        assert_eq!("3".parse(), Ok(Severity::Error));
        assert!("loud".parse::<Severity>().is_err());
    }
}
