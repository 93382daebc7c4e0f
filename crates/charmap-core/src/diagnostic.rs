//! Diagnostics collected while parsing a character map definition.
//!
//! Provides [`Diagnostic`] for reporting a non-fatal issue on a specific line,
//! [`DiagnosticCode`] for categorizing it, and [`Severity`] for classifying
//! whether the line was applied as written.

use std::fmt;

/// Severity of a loader diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Severity {
    /// The line was applied, with a documented interpretation.
    Info,
    /// The line was skipped or applied in degraded form.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Machine-readable code for a loader diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum DiagnosticCode {
    /// The line has no tab between index and representation.
    MissingSeparator,
    /// The text before the tab is not a decimal integer.
    InvalidIndex,
    /// The index is below 1 or above the table capacity.
    IndexOutOfRange,
    /// The representation is empty and was read as a space.
    EmptyRepresentation,
    /// A two-character `\X` sequence with an unrecognized `X`.
    UnknownEscape,
    /// A multi-character representation that was cut down to its first byte.
    Truncated,
}

impl DiagnosticCode {
    /// Returns the string tag for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::MissingSeparator => "MISSING_SEPARATOR",
            DiagnosticCode::InvalidIndex => "INVALID_INDEX",
            DiagnosticCode::IndexOutOfRange => "INDEX_OUT_OF_RANGE",
            DiagnosticCode::EmptyRepresentation => "EMPTY_REPRESENTATION",
            DiagnosticCode::UnknownEscape => "UNKNOWN_ESCAPE",
            DiagnosticCode::Truncated => "TRUNCATED",
        }
    }

    /// The severity every diagnostic with this code carries.
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticCode::EmptyRepresentation => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal note produced while loading a character map.
///
/// Loading continues past every diagnostic; the full list is returned next
/// to the table so the caller can display it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// Severity, derived from the code.
    pub severity: Severity,
    /// Machine-readable code.
    pub code: DiagnosticCode,
    /// Line number in the definition source (1-indexed).
    pub line: usize,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic for `line` with the severity implied by `code`.
    pub fn new(code: DiagnosticCode, line: usize, message: impl Into<String>) -> Self {
        Self {
            severity: code.severity(),
            code,
            line,
            message: message.into(),
        }
    }

    /// Returns `true` if the diagnostic is a warning.
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Returns `true` if the diagnostic is informational.
    pub fn is_info(&self) -> bool {
        self.severity == Severity::Info
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} (line {})",
            self.severity, self.code, self.message, self.line
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_display() {
        assert_eq!(Severity::Info.to_string(), "info");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }

    #[test]
    fn only_empty_representation_is_info() {
        assert_eq!(
            DiagnosticCode::EmptyRepresentation.severity(),
            Severity::Info
        );
        for code in [
            DiagnosticCode::MissingSeparator,
            DiagnosticCode::InvalidIndex,
            DiagnosticCode::IndexOutOfRange,
            DiagnosticCode::UnknownEscape,
            DiagnosticCode::Truncated,
        ] {
            assert_eq!(code.severity(), Severity::Warning, "{code}");
        }
    }

    #[test]
    fn new_derives_severity_from_code() {
        let d = Diagnostic::new(DiagnosticCode::UnknownEscape, 3, "unknown escape \\q");
        assert!(d.is_warning());
        assert!(!d.is_info());
        assert_eq!(d.line, 3);

        let d = Diagnostic::new(DiagnosticCode::EmptyRepresentation, 7, "empty");
        assert!(d.is_info());
    }

    #[test]
    fn diagnostic_display_format() {
        let d = Diagnostic::new(DiagnosticCode::MissingSeparator, 2, "expected index<tab>character");
        assert_eq!(
            d.to_string(),
            "[warning] MISSING_SEPARATOR: expected index<tab>character (line 2)"
        );
    }

    #[test]
    fn code_display_matches_as_str() {
        assert_eq!(DiagnosticCode::Truncated.to_string(), "TRUNCATED");
        assert_eq!(
            DiagnosticCode::IndexOutOfRange.to_string(),
            DiagnosticCode::IndexOutOfRange.as_str()
        );
    }
}
