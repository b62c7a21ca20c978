//! Cursor over finalized tokens
//!
//! The stream always ends with an `Eof` sentinel, so `current()` never runs
//! out: advancing past the end stays on the sentinel.

use crate::tokens::token::{Token, TokenKind};
use crate::utils::Span;

#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenStream {
    /// Wrap tokens, appending an `Eof` sentinel after the last one
    pub fn new(mut tokens: Vec<Token>) -> Self {
        let eof = match tokens.last() {
            Some(last) if last.is_eof() => None,
            Some(last) => Some(Token::eof(last.line, last.span)),
            None => Some(Token::eof(1, Span::default())),
        };
        if let Some(eof) = eof {
            tokens.push(eof);
        }

        crate::log_debug!("Token stream created",
            "significant_tokens" => tokens.len() - 1
        );

        Self {
            tokens,
            position: 0,
        }
    }

    fn sentinel_index(&self) -> usize {
        self.tokens.len() - 1
    }

    pub fn current(&self) -> &Token {
        &self.tokens[self.position.min(self.sentinel_index())]
    }

    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    /// The token after `current()`
    pub fn peek(&self) -> &Token {
        self.peek_ahead(1)
    }

    pub fn peek_ahead(&self, n: usize) -> &Token {
        let index = (self.position + n).min(self.sentinel_index());
        &self.tokens[index]
    }

    /// Consume the current token and return it
    pub fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.position < self.sentinel_index() {
            self.position += 1;
        }
        token
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Current token is an identifier, downgraded or not
    pub fn check_identifier(&self) -> bool {
        self.current().is_identifier_like()
    }

    pub fn advance_if(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume a token of `kind` or report what was found instead
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, TokenStreamError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.name()))
        }
    }

    pub fn expect_identifier(&mut self) -> Result<Token, TokenStreamError> {
        if self.check_identifier() {
            Ok(self.advance())
        } else {
            Err(self.unexpected(TokenKind::Identifier.name()))
        }
    }

    /// Error describing the current token as a mismatch for `expected`
    pub fn unexpected(&self, expected: impl Into<String>) -> TokenStreamError {
        let found = self.current();
        TokenStreamError::UnexpectedToken {
            expected: expected.into(),
            found: found.kind,
            span: found.span,
            lexeme: found.lexeme.clone(),
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.current().is_eof()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of tokens, not counting the sentinel
    pub fn len(&self) -> usize {
        self.sentinel_index()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TokenStreamError {
    #[error("Expected {expected}, found {found} ('{lexeme}') at {span}")]
    UnexpectedToken {
        expected: String,
        found: TokenKind,
        span: Span,
        lexeme: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;
    use assert_matches::assert_matches;

    fn token(lexeme: &str, kind: TokenKind, column: u32) -> Token {
        let start = Position::new(column as usize - 1, 1, column);
        let end = Position::new(start.offset + lexeme.len(), 1, column + lexeme.len() as u32);
        Token::new(lexeme, kind, 1, Span::new(start, end))
    }

    #[test]
    fn test_sentinel_appended() {
        let stream = TokenStream::new(vec![token("x", TokenKind::Identifier, 1)]);
        assert_eq!(stream.len(), 1);
        assert!(stream.peek().is_eof());
        assert_eq!(stream.peek().span.start.column, 2);
    }

    #[test]
    fn test_empty_stream_is_at_end() {
        let mut stream = TokenStream::new(Vec::new());
        assert!(stream.is_empty());
        assert!(stream.is_at_end());
        assert!(stream.advance().is_eof());
        assert!(stream.current().is_eof());
    }

    #[test]
    fn test_navigation() {
        let mut stream = TokenStream::new(vec![
            token("x", TokenKind::Identifier, 1),
            token(":", TokenKind::OpColon, 3),
            token("integer", TokenKind::KeywordInt, 5),
        ]);

        assert!(stream.check_identifier());
        assert_eq!(stream.peek().kind, TokenKind::OpColon);
        assert_eq!(stream.peek_ahead(2).kind, TokenKind::KeywordInt);
        assert_eq!(stream.peek_ahead(10).kind, TokenKind::Eof);

        assert_eq!(stream.expect_identifier().map(|t| t.lexeme), Ok("x".to_string()));
        assert!(stream.advance_if(TokenKind::OpColon).is_some());
        assert!(stream.advance_if(TokenKind::Endline).is_none());
        assert_eq!(stream.current().kind, TokenKind::KeywordInt);
    }

    #[test]
    fn test_expect_reports_found_token() {
        let mut stream = TokenStream::new(vec![token(";;", TokenKind::Error, 14)]);
        assert_matches!(
            stream.expect(TokenKind::Endline),
            Err(TokenStreamError::UnexpectedToken { expected, found: TokenKind::Error, lexeme, .. })
                if expected == "ENDLINE" && lexeme == ";;"
        );
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_downgraded_identifier_accepted() {
        let mut stream = TokenStream::new(vec![token("x", TokenKind::Identifier, 1).downgrade()]);
        assert!(!stream.check(TokenKind::Identifier));
        assert!(stream.expect_identifier().is_ok());
    }
}
