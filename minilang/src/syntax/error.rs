//! Syntax errors
//!
//! Parsing stops at the first mismatch, so a failed parse carries exactly
//! one error.

use crate::config::constants::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::diagnostics::{Diagnostic, ErrorKind};
use crate::logging::{codes, Code};
use crate::tokens::{TokenKind, TokenStreamError};
use crate::utils::Span;
use serde::Serialize;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
pub enum SyntaxError {
    #[error("Expected {expected}, found {found} ('{lexeme}') at {span}")]
    UnexpectedToken {
        expected: String,
        found: TokenKind,
        span: Span,
        lexeme: String,
    },

    #[error("Maximum parse depth {MAX_PARSE_DEPTH} exceeded at {span}")]
    MaxRecursionDepth { depth: usize, span: Span },
}

impl SyntaxError {
    pub fn unexpected_token(expected: &str, found: TokenKind, span: Span, lexeme: &str) -> Self {
        Self::UnexpectedToken {
            expected: expected.to_string(),
            found,
            span,
            lexeme: lexeme.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::MaxRecursionDepth { .. } => codes::syntax::MAX_RECURSION_DEPTH,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. } | Self::MaxRecursionDepth { span, .. } => *span,
        }
    }

    /// 1-based line of the offending token
    pub fn line(&self) -> usize {
        self.span().start.line as usize
    }

    /// Diagnostic form, located on `line_text`
    pub fn to_diagnostic(&self, line_text: &str) -> Diagnostic {
        let text = match self {
            Self::UnexpectedToken { lexeme, .. } => lexeme.clone(),
            Self::MaxRecursionDepth { .. } => String::new(),
        };
        let mut diagnostic =
            Diagnostic::locate(self.line(), line_text, text, ErrorKind::SyntaxError, self.to_string());
        if diagnostic.text.is_empty() {
            diagnostic.column = self.span().start.column as usize;
        }
        diagnostic
    }
}

impl From<TokenStreamError> for SyntaxError {
    fn from(error: TokenStreamError) -> Self {
        match error {
            TokenStreamError::UnexpectedToken {
                expected,
                found,
                span,
                lexeme,
            } => Self::UnexpectedToken {
                expected,
                found,
                span,
                lexeme,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;
    use assert_matches::assert_matches;

    #[test]
    fn test_codes_and_lines() {
        let span = Span::point(Position::new(12, 1, 13));
        let error = SyntaxError::unexpected_token("ENDLINE", TokenKind::Error, span, ";;");
        assert_eq!(error.error_code().as_str(), "E050");
        assert_eq!(error.line(), 1);
        assert_matches!(error, SyntaxError::UnexpectedToken { found: TokenKind::Error, .. });
        assert_eq!(error.to_string(), "Expected ENDLINE, found ERROR (';;') at 1:13-13");

        let diagnostic = error.to_diagnostic("x : integer ;;");
        assert_eq!(diagnostic.kind, ErrorKind::SyntaxError);
        assert_eq!(diagnostic.column, 13);
    }

    #[test]
    fn test_from_stream_error() {
        let stream_error = TokenStreamError::UnexpectedToken {
            expected: "IDENTIFIER".to_string(),
            found: TokenKind::Endline,
            span: Span::default(),
            lexeme: ";".to_string(),
        };
        let error: SyntaxError = stream_error.into();
        assert_matches!(
            error,
            SyntaxError::UnexpectedToken { found: TokenKind::Endline, ref expected, .. } if expected == "IDENTIFIER"
        );
    }
}
