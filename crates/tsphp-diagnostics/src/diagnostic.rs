//! Diagnostic types reported while transpiling TypeScript to PHP.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Hint,
    Warning,
    /// Fails the run once the pass is over.
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Hint => "hint",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic codes, grouped by the stage that reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // Parse errors (P0xx)
    /// Syntax error reported by the TypeScript parser
    ParseError,

    // Printer fallbacks (U0xx)
    /// Statement or declaration with no PHP rendering
    UnsupportedStatement,
    /// Expression with no PHP rendering
    UnsupportedExpression,
    /// Operator with no PHP counterpart
    UnsupportedOperator,

    // Object model rewrites (U1xx)
    /// `Object.<member>` call outside the supported set
    UnsupportedObjectMethod,
    /// `Xxx.prototype` access
    PrototypeAccess,

    // Internal errors (I0xx)
    InternalError,
}

impl DiagnosticCode {
    /// Every code, in documentation order.
    pub const ALL: &'static [DiagnosticCode] = &[
        Self::ParseError,
        Self::UnsupportedStatement,
        Self::UnsupportedExpression,
        Self::UnsupportedOperator,
        Self::UnsupportedObjectMethod,
        Self::PrototypeAccess,
        Self::InternalError,
    ];

    /// The short code string (e.g. "U101").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseError => "P001",
            Self::UnsupportedStatement => "U001",
            Self::UnsupportedExpression => "U002",
            Self::UnsupportedOperator => "U003",
            Self::UnsupportedObjectMethod => "U101",
            Self::PrototypeAccess => "U102",
            Self::InternalError => "I001",
        }
    }

    /// Look a code up by its short string, case-insensitively.
    pub fn from_code_str(code: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            Self::ParseError
            | Self::UnsupportedStatement
            | Self::UnsupportedExpression
            | Self::UnsupportedOperator
            | Self::UnsupportedObjectMethod
            | Self::PrototypeAccess
            | Self::InternalError => Severity::Error,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single report against a source location.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    /// Single line message
    pub message: String,
    /// Optional help text shown under the snippet
    pub help: Option<String>,
    pub span: Span,
}

impl Diagnostic {
    /// Start a diagnostic with the code's default severity.
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, code.default_severity(), message)
    }

    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, Severity::Error, message)
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, Severity::Warning, message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// Builder for constructing diagnostics fluently.
pub struct DiagnosticBuilder {
    inner: Diagnostic,
}

impl DiagnosticBuilder {
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            inner: Diagnostic {
                code,
                severity,
                message: message.into(),
                help: None,
                span: Span::DUMMY,
            },
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.inner.span = span;
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.help = Some(help.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        self.inner
    }
}

/// Append-only sink for one compilation unit.
///
/// Created before the pass, written by rules and the printer while it runs,
/// inspected by the driver once the pass has finished.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(diagnostics);
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_warning()).count()
    }

    /// Number of diagnostics carrying `code`.
    pub fn count_of(&self, code: DiagnosticCode) -> usize {
        self.items.iter().filter(|d| d.code == code).count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_lookup_round_trips() {
        for code in DiagnosticCode::ALL {
            assert_eq!(DiagnosticCode::from_code_str(code.as_str()), Some(*code));
        }
        assert_eq!(
            DiagnosticCode::from_code_str("u102"),
            Some(DiagnosticCode::PrototypeAccess)
        );
        assert_eq!(DiagnosticCode::from_code_str("X999"), None);
    }

    #[test]
    fn test_counts() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::new(DiagnosticCode::PrototypeAccess, "a").build());
        diags.push(Diagnostic::warning(DiagnosticCode::ParseError, "b").build());
        diags.push(Diagnostic::new(DiagnosticCode::UnsupportedObjectMethod, "c").build());

        assert!(diags.has_errors());
        assert_eq!(diags.error_count(), 2);
        assert_eq!(diags.warning_count(), 1);
        assert_eq!(diags.count_of(DiagnosticCode::PrototypeAccess), 1);
        assert_eq!(diags.len(), 3);
    }
}
