//! Recoverable analysis diagnostics
//!
//! Lexical and symbol-table problems never stop analysis. Each one is
//! recorded as a [`Diagnostic`] and handed to a [`DiagnosticSink`]; the
//! stage also keeps its own list so callers can run with [`NullSink`].

use crate::log_error;
use crate::logging::{codes, Code};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidCharacterSequence,
    RedeclarationError,
    UndeclaredVariableError,
    InvalidLiteralForType,
    SyntaxError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidCharacterSequence => "InvalidCharacterSequence",
            ErrorKind::RedeclarationError => "RedeclarationError",
            ErrorKind::UndeclaredVariableError => "UndeclaredVariableError",
            ErrorKind::InvalidLiteralForType => "InvalidLiteralForType",
            ErrorKind::SyntaxError => "SyntaxError",
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            ErrorKind::InvalidCharacterSequence => codes::lexical::INVALID_CHARACTER_SEQUENCE,
            ErrorKind::RedeclarationError => codes::symbols::REDECLARATION,
            ErrorKind::UndeclaredVariableError => codes::symbols::UNDECLARED_VARIABLE,
            ErrorKind::InvalidLiteralForType => codes::symbols::INVALID_LITERAL_FOR_TYPE,
            ErrorKind::SyntaxError => codes::syntax::UNEXPECTED_TOKEN,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported problem. `line` and `column` are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub text: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl Diagnostic {
    /// Build a diagnostic whose column is the first occurrence of `text`
    /// in `line_text`, counted in characters. Falls back to column 1.
    pub fn locate(
        line: usize,
        line_text: &str,
        text: impl Into<String>,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        let text = text.into();
        Self {
            line,
            column: column_of(line_text, &text),
            text,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} '{}': {}",
            self.line, self.column, self.kind, self.text, self.message
        )
    }
}

/// 1-based character column of the first occurrence of `needle`
pub fn column_of(line_text: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 1;
    }
    line_text
        .find(needle)
        .map(|byte| line_text[..byte].chars().count() + 1)
        .unwrap_or(1)
}

pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: &Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.push(diagnostic.clone());
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: &Diagnostic) {}
}

/// Forwards each diagnostic to the global logger under its error code
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSink;

impl DiagnosticSink for LoggingSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        log_error!(diagnostic.kind.error_code(), &diagnostic.message,
            "line" => diagnostic.line,
            "column" => diagnostic.column,
            "text" => &diagnostic.text,
            "kind" => diagnostic.kind
        );
    }
}

/// Counts per kind, used for summaries
pub fn count_by_kind(diagnostics: &[Diagnostic], kind: ErrorKind) -> usize {
    diagnostics.iter().filter(|d| d.kind == kind).count()
}
