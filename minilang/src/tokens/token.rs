//! Token kinds and classified tokens
//!
//! `TokenKind` is a flat closed set. Each kind owns a recognizer that
//! matches a whole atom, and `CLASSIFICATION_ORDER` fixes the priority in
//! which recognizers are tried.

use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenKind {
    #[serde(rename = "KEYWORD_IF")]
    KeywordIf,
    #[serde(rename = "KEYWORD_OUTPUT")]
    KeywordOutput,
    #[serde(rename = "KEYWORD_INT")]
    KeywordInt,
    #[serde(rename = "KEYWORD_DOUBLE")]
    KeywordDouble,
    #[serde(rename = "IDENTIFIER")]
    Identifier,
    #[serde(rename = "LITERAL_INTEGER")]
    LiteralInteger,
    #[serde(rename = "LITERAL_DOUBLE")]
    LiteralDouble,
    #[serde(rename = "LITERAL_STRING")]
    LiteralString,
    #[serde(rename = "ENDLINE")]
    Endline,
    #[serde(rename = "OP_ASSIGNMENT")]
    OpAssignment,
    #[serde(rename = "OP_COLON")]
    OpColon,
    #[serde(rename = "OP_EQUAL")]
    OpEqual,
    #[serde(rename = "OP_LEFTSHIFT")]
    OpLeftShift,
    #[serde(rename = "OP_ARITHMETIC_PLUS")]
    OpPlus,
    #[serde(rename = "OP_ARITHMETIC_MINUS")]
    OpMinus,
    #[serde(rename = "OP_ARITHMETIC_MULTIPLY")]
    OpMultiply,
    #[serde(rename = "OP_ARITHMETIC_DIVIDE")]
    OpDivide,
    #[serde(rename = "OP_RELATIONAL_EQUAL")]
    OpRelationalEqual,
    #[serde(rename = "OP_RELATIONAL_NOTEQUAL")]
    OpRelationalNotEqual,
    #[serde(rename = "OP_RELATIONAL_LESSTHAN")]
    OpLessThan,
    #[serde(rename = "OP_RELATIONAL_LESSTHANOREQUAL")]
    OpLessThanOrEqual,
    #[serde(rename = "OP_RELATIONAL_GREATERTHAN")]
    OpGreaterThan,
    #[serde(rename = "OP_RELATIONAL_GREATERTHANOREQUAL")]
    OpGreaterThanOrEqual,
    #[serde(rename = "DELIMITER_LEFT_P")]
    DelimiterLeftP,
    #[serde(rename = "DELIMITER_RIGHT_P")]
    DelimiterRightP,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "EOF")]
    Eof,
}

pub const KEYWORD_IF: &str = "if";
pub const KEYWORD_OUTPUT: &str = "output";
pub const KEYWORD_INT: &str = "integer";
pub const KEYWORD_DOUBLE: &str = "double";

impl TokenKind {
    /// Recognizer priority. `Error` and `Eof` are never recognized.
    pub const CLASSIFICATION_ORDER: &'static [TokenKind] = &[
        TokenKind::KeywordIf,
        TokenKind::KeywordOutput,
        TokenKind::KeywordInt,
        TokenKind::KeywordDouble,
        TokenKind::Identifier,
        TokenKind::LiteralInteger,
        TokenKind::LiteralDouble,
        TokenKind::LiteralString,
        TokenKind::OpAssignment,
        TokenKind::OpColon,
        TokenKind::OpLeftShift,
        TokenKind::OpRelationalEqual,
        TokenKind::OpRelationalNotEqual,
        TokenKind::OpLessThanOrEqual,
        TokenKind::OpGreaterThanOrEqual,
        TokenKind::OpLessThan,
        TokenKind::OpGreaterThan,
        TokenKind::OpEqual,
        TokenKind::OpPlus,
        TokenKind::OpMinus,
        TokenKind::OpMultiply,
        TokenKind::OpDivide,
        TokenKind::DelimiterLeftP,
        TokenKind::DelimiterRightP,
        TokenKind::Endline,
    ];

    /// Display name used in diagnostics and output
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::KeywordIf => "KEYWORD_IF",
            TokenKind::KeywordOutput => "KEYWORD_OUTPUT",
            TokenKind::KeywordInt => "KEYWORD_INT",
            TokenKind::KeywordDouble => "KEYWORD_DOUBLE",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::LiteralInteger => "LITERAL_INTEGER",
            TokenKind::LiteralDouble => "LITERAL_DOUBLE",
            TokenKind::LiteralString => "LITERAL_STRING",
            TokenKind::Endline => "ENDLINE",
            TokenKind::OpAssignment => "OP_ASSIGNMENT",
            TokenKind::OpColon => "OP_COLON",
            TokenKind::OpEqual => "OP_EQUAL",
            TokenKind::OpLeftShift => "OP_LEFTSHIFT",
            TokenKind::OpPlus => "OP_ARITHMETIC_PLUS",
            TokenKind::OpMinus => "OP_ARITHMETIC_MINUS",
            TokenKind::OpMultiply => "OP_ARITHMETIC_MULTIPLY",
            TokenKind::OpDivide => "OP_ARITHMETIC_DIVIDE",
            TokenKind::OpRelationalEqual => "OP_RELATIONAL_EQUAL",
            TokenKind::OpRelationalNotEqual => "OP_RELATIONAL_NOTEQUAL",
            TokenKind::OpLessThan => "OP_RELATIONAL_LESSTHAN",
            TokenKind::OpLessThanOrEqual => "OP_RELATIONAL_LESSTHANOREQUAL",
            TokenKind::OpGreaterThan => "OP_RELATIONAL_GREATERTHAN",
            TokenKind::OpGreaterThanOrEqual => "OP_RELATIONAL_GREATERTHANOREQUAL",
            TokenKind::DelimiterLeftP => "DELIMITER_LEFT_P",
            TokenKind::DelimiterRightP => "DELIMITER_RIGHT_P",
            TokenKind::Error => "ERROR",
            TokenKind::Eof => "EOF",
        }
    }

    /// Fixed source text for keyword and punctuation kinds
    pub fn fixed_text(&self) -> Option<&'static str> {
        let text = match self {
            TokenKind::KeywordIf => KEYWORD_IF,
            TokenKind::KeywordOutput => KEYWORD_OUTPUT,
            TokenKind::KeywordInt => KEYWORD_INT,
            TokenKind::KeywordDouble => KEYWORD_DOUBLE,
            TokenKind::Endline => ";",
            TokenKind::OpAssignment => ":=",
            TokenKind::OpColon => ":",
            TokenKind::OpEqual => "=",
            TokenKind::OpLeftShift => "<<",
            TokenKind::OpPlus => "+",
            TokenKind::OpMinus => "-",
            TokenKind::OpMultiply => "*",
            TokenKind::OpDivide => "/",
            TokenKind::OpRelationalEqual => "==",
            TokenKind::OpRelationalNotEqual => "!=",
            TokenKind::OpLessThan => "<",
            TokenKind::OpLessThanOrEqual => "<=",
            TokenKind::OpGreaterThan => ">",
            TokenKind::OpGreaterThanOrEqual => ">=",
            TokenKind::DelimiterLeftP => "(",
            TokenKind::DelimiterRightP => ")",
            _ => return None,
        };
        Some(text)
    }

    /// True when this kind's recognizer accepts the whole of `text`
    pub fn recognizes(&self, text: &str) -> bool {
        match self {
            TokenKind::Identifier => is_identifier(text),
            TokenKind::LiteralInteger => is_integer_literal(text),
            TokenKind::LiteralDouble => is_double_literal(text),
            TokenKind::LiteralString => is_string_literal(text),
            TokenKind::Error | TokenKind::Eof => false,
            fixed => fixed.fixed_text() == Some(text),
        }
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::KeywordIf
                | TokenKind::KeywordOutput
                | TokenKind::KeywordInt
                | TokenKind::KeywordDouble
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::LiteralInteger | TokenKind::LiteralDouble | TokenKind::LiteralString
        )
    }

    pub fn is_numeric_literal(&self) -> bool {
        matches!(self, TokenKind::LiteralInteger | TokenKind::LiteralDouble)
    }

    pub fn is_type_keyword(&self) -> bool {
        matches!(self, TokenKind::KeywordInt | TokenKind::KeywordDouble)
    }

    pub fn is_relational_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::OpRelationalEqual
                | TokenKind::OpRelationalNotEqual
                | TokenKind::OpLessThan
                | TokenKind::OpLessThanOrEqual
                | TokenKind::OpGreaterThan
                | TokenKind::OpGreaterThanOrEqual
        )
    }

    pub fn is_additive_operator(&self) -> bool {
        matches!(self, TokenKind::OpPlus | TokenKind::OpMinus)
    }

    pub fn is_multiplicative_operator(&self) -> bool {
        matches!(self, TokenKind::OpMultiply | TokenKind::OpDivide)
    }

    pub fn is_operator(&self) -> bool {
        self.is_relational_operator()
            || self.is_additive_operator()
            || self.is_multiplicative_operator()
            || matches!(
                self,
                TokenKind::OpAssignment
                    | TokenKind::OpColon
                    | TokenKind::OpEqual
                    | TokenKind::OpLeftShift
            )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// `[0-9]+`
pub fn is_integer_literal(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// `[0-9]+\.[0-9]*`
pub fn is_double_literal(text: &str) -> bool {
    match text.split_once('.') {
        Some((whole, fraction)) => {
            is_integer_literal(whole) && fraction.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Same quote character at both ends, at least two characters long
pub fn is_string_literal(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) => (open == '"' || open == '\'') && open == close,
        _ => false,
    }
}

/// A classified token. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub lexeme: String,
    pub kind: TokenKind,
    pub line: usize,
    pub span: Span,
    /// Set when symbol-table cleanup retagged an undeclared identifier to `Error`
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub downgraded: bool,
}

impl Token {
    pub fn new(lexeme: impl Into<String>, kind: TokenKind, line: usize, span: Span) -> Self {
        Self {
            lexeme: lexeme.into(),
            kind,
            line,
            span,
            downgraded: false,
        }
    }

    /// End-of-input sentinel placed after `span`
    pub fn eof(line: usize, span: Span) -> Self {
        Self::new("", TokenKind::Eof, line, Span::point(span.end))
    }

    /// Copy of this token retagged to `Error` with the downgrade flag set
    pub fn downgrade(&self) -> Self {
        Self {
            kind: TokenKind::Error,
            downgraded: true,
            ..self.clone()
        }
    }

    /// An identifier, or an identifier downgraded for being undeclared
    pub fn is_identifier_like(&self) -> bool {
        self.kind == TokenKind::Identifier || (self.kind == TokenKind::Error && self.downgraded)
    }

    pub fn is_error(&self) -> bool {
        self.kind == TokenKind::Error
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.lexeme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognizers() {
        assert!(is_identifier("_tmp1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("é"));
        assert!(is_integer_literal("007"));
        assert!(!is_integer_literal(""));
        assert!(is_double_literal("3.14"));
        assert!(is_double_literal("3."));
        assert!(!is_double_literal(".5"));
        assert!(!is_double_literal("1.2.3"));
        assert!(is_string_literal("\"hi\""));
        assert!(is_string_literal("''"));
        assert!(!is_string_literal("\"hi'"));
        assert!(!is_string_literal("\""));
    }

    #[test]
    fn test_fixed_text_recognition() {
        assert!(TokenKind::OpAssignment.recognizes(":="));
        assert!(!TokenKind::OpColon.recognizes(":="));
        assert!(TokenKind::KeywordInt.recognizes("integer"));
        assert!(!TokenKind::Error.recognizes(""));
    }

    #[test]
    fn test_order_excludes_sentinels() {
        assert!(!TokenKind::CLASSIFICATION_ORDER.contains(&TokenKind::Error));
        assert!(!TokenKind::CLASSIFICATION_ORDER.contains(&TokenKind::Eof));
    }

    #[test]
    fn test_names_match_serde() {
        for kind in TokenKind::CLASSIFICATION_ORDER {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn test_downgrade_keeps_identifier_shape() {
        let token = Token::new("x", TokenKind::Identifier, 1, Span::default());
        let downgraded = token.downgrade();
        assert!(downgraded.is_error());
        assert!(downgraded.is_identifier_like());
        assert!(!Token::new(";;", TokenKind::Error, 1, Span::default()).is_identifier_like());
    }
}
