//! Lexical analyzer: atoms to a provisional token stream
//!
//! Unrecognized atoms become `Error` tokens and are reported as
//! `InvalidCharacterSequence` diagnostics; analysis carries on. Only the
//! compile-time resource limits abort the run.

use super::atomizer::{atomize, AtomLine};
use super::classifier::classify_atom;
use crate::config::constants::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::diagnostics::{Diagnostic, DiagnosticSink, ErrorKind};
use crate::logging::codes;
use crate::tokens::{Token, TokenKind};
use crate::{log_debug, log_error, log_success, log_warning};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },

    #[error("Too many atoms on line {line}: {count} (max {MAX_ATOMS_PER_LINE})")]
    TooManyAtoms { line: usize, count: usize },

    #[error("Identifier too long on line {line}: {length} characters (max {MAX_IDENTIFIER_LENGTH})")]
    IdentifierTooLong { line: usize, length: usize },

    #[error("String literal too large on line {line}: {size} bytes (max {MAX_STRING_SIZE})")]
    StringTooLarge { line: usize, size: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::TooManyTokens { .. } | LexerError::TooManyAtoms { .. } => {
                codes::lexical::TOO_MANY_TOKENS
            }
            LexerError::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
            LexerError::StringTooLarge { .. } => codes::lexical::STRING_TOO_LARGE,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            LexerError::TooManyTokens { .. } => None,
            LexerError::TooManyAtoms { line, .. }
            | LexerError::IdentifierTooLong { line, .. }
            | LexerError::StringTooLarge { line, .. } => Some(*line),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct LexicalMetrics {
    pub lines: usize,
    pub blank_lines: usize,
    pub total_atoms: usize,
    pub max_atoms_per_line: usize,
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub identifier_tokens: usize,
    pub literal_tokens: usize,
    pub operator_tokens: usize,
    pub error_tokens: usize,
    pub unterminated_strings: usize,
    pub max_string_length: usize,

    /// Filled only when `collect_detailed_metrics` is set
    pub kind_counts: BTreeMap<TokenKind, usize>,
}

impl LexicalMetrics {
    fn record_line(&mut self, line: &AtomLine) {
        self.lines += 1;
        if line.is_blank() {
            self.blank_lines += 1;
        }
        self.total_atoms += line.atoms.len();
        self.max_atoms_per_line = self.max_atoms_per_line.max(line.atoms.len());
    }

    fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        self.total_tokens += 1;

        match token.kind {
            kind if kind.is_keyword() => self.keyword_tokens += 1,
            TokenKind::Identifier => self.identifier_tokens += 1,
            kind if kind.is_literal() => {
                self.literal_tokens += 1;
                if kind == TokenKind::LiteralString {
                    self.max_string_length = self.max_string_length.max(token.lexeme.len());
                }
            }
            kind if kind.is_operator() => self.operator_tokens += 1,
            TokenKind::Error => self.error_tokens += 1,
            _ => {}
        }

        if preferences.collect_detailed_metrics {
            *self.kind_counts.entry(token.kind).or_insert(0) += 1;
        }
    }
}

/// Output of one lexical pass
#[derive(Debug, Clone)]
pub struct LexicalOutput {
    pub atom_lines: Vec<AtomLine>,
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    /// Atomize and classify `source`. Diagnostics go to `sink` and are also
    /// returned in the output.
    pub fn analyze(
        &mut self,
        source: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<LexicalOutput, LexerError> {
        self.metrics = LexicalMetrics::default();

        log_debug!("Starting lexical analysis",
            "char_count" => source.chars().count(),
            "max_tokens_allowed" => MAX_TOKEN_COUNT
        );

        let atom_lines = atomize(source);
        log_success!(codes::success::ATOMIZATION_COMPLETE, "Atomization completed",
            "lines" => atom_lines.len()
        );

        let mut tokens = Vec::new();
        let mut diagnostics = Vec::new();

        for line in &atom_lines {
            self.metrics.record_line(line);
            let line_number = line.line_number();

            if line.atoms.len() > MAX_ATOMS_PER_LINE {
                return Err(self.fail(LexerError::TooManyAtoms {
                    line: line_number,
                    count: line.atoms.len(),
                }));
            }

            for atom in &line.atoms {
                if tokens.len() >= MAX_TOKEN_COUNT {
                    return Err(self.fail(LexerError::TooManyTokens {
                        count: tokens.len() + 1,
                    }));
                }

                let token = classify_atom(atom, line_number);
                self.check_limits(&token)?;
                self.metrics.record_token(&token, &self.preferences);

                if token.is_error() {
                    let diagnostic = self.invalid_sequence(line, &token);
                    sink.report(&diagnostic);
                    diagnostics.push(diagnostic);
                }

                tokens.push(token);
            }
        }

        log_success!(codes::success::TOKENIZATION_COMPLETE,
            "Lexical analysis completed",
            "token_count" => tokens.len(),
            "lines" => self.metrics.lines,
            "keywords" => self.metrics.keyword_tokens,
            "identifiers" => self.metrics.identifier_tokens,
            "literals" => self.metrics.literal_tokens,
            "operators" => self.metrics.operator_tokens,
            "error_tokens" => self.metrics.error_tokens
        );

        Ok(LexicalOutput {
            atom_lines,
            tokens,
            diagnostics,
        })
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: LexicalPreferences) {
        self.preferences = preferences;
    }

    fn check_limits(&self, token: &Token) -> Result<(), LexerError> {
        match token.kind {
            TokenKind::Identifier if token.lexeme.len() > MAX_IDENTIFIER_LENGTH => {
                Err(self.fail(LexerError::IdentifierTooLong {
                    line: token.line,
                    length: token.lexeme.len(),
                }))
            }
            TokenKind::LiteralString if token.lexeme.len() > MAX_STRING_SIZE => {
                Err(self.fail(LexerError::StringTooLarge {
                    line: token.line,
                    size: token.lexeme.len(),
                }))
            }
            _ => Ok(()),
        }
    }

    fn fail(&self, error: LexerError) -> LexerError {
        log_error!(error.error_code(), &error.to_string(),
            "line" => error.line().map(|l| l.to_string()).unwrap_or_default(),
            "tokens_processed" => self.metrics.total_tokens
        );
        error
    }

    fn invalid_sequence(&mut self, line: &AtomLine, token: &Token) -> Diagnostic {
        let unterminated = token.lexeme.starts_with(['"', '\''])
            && !crate::tokens::token::is_string_literal(&token.lexeme);

        if unterminated && self.preferences.detect_unterminated_strings {
            self.metrics.unterminated_strings += 1;
            log_warning!(code = codes::lexical::UNTERMINATED_STRING,
                "Unterminated string literal",
                span = token.span,
                "line" => token.line
            );
        }

        let message = match (unterminated, self.preferences.include_position_in_errors) {
            (true, true) => format!(
                "Unterminated string literal at line {}, column {}",
                token.line, token.span.start.column
            ),
            (true, false) => "Unterminated string literal".to_string(),
            (false, true) => format!(
                "Invalid character sequence '{}' at line {}, column {}",
                token.lexeme, token.line, token.span.start.column
            ),
            (false, false) => format!("Invalid character sequence '{}'", token.lexeme),
        };

        Diagnostic::locate(
            token.line,
            &line.text,
            token.lexeme.clone(),
            ErrorKind::InvalidCharacterSequence,
            message,
        )
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
