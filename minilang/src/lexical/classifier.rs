//! Atom classification

use super::atomizer::Atom;
use crate::tokens::{Token, TokenKind};

/// First kind in `CLASSIFICATION_ORDER` whose recognizer accepts the whole
/// atom, or `Error` when none does
pub fn classify_token(atom: &str) -> TokenKind {
    TokenKind::CLASSIFICATION_ORDER
        .iter()
        .copied()
        .find(|kind| kind.recognizes(atom))
        .unwrap_or(TokenKind::Error)
}

/// Classify an atom into a provisional token on a 1-based line
pub fn classify_atom(atom: &Atom, line: usize) -> Token {
    Token::new(atom.text.clone(), classify_token(&atom.text), line, atom.span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::atomizer::atomize;

    #[test]
    fn test_keywords_win_over_identifiers() {
        assert_eq!(classify_token("if"), TokenKind::KeywordIf);
        assert_eq!(classify_token("output"), TokenKind::KeywordOutput);
        assert_eq!(classify_token("integer"), TokenKind::KeywordInt);
        assert_eq!(classify_token("double"), TokenKind::KeywordDouble);
        assert_eq!(classify_token("iff"), TokenKind::Identifier);
        assert_eq!(classify_token("Output"), TokenKind::Identifier);
    }

    #[test]
    fn test_literals() {
        assert_eq!(classify_token("42"), TokenKind::LiteralInteger);
        assert_eq!(classify_token("4.2"), TokenKind::LiteralDouble);
        assert_eq!(classify_token("4."), TokenKind::LiteralDouble);
        assert_eq!(classify_token("\"hi there\""), TokenKind::LiteralString);
        assert_eq!(classify_token("'x'"), TokenKind::LiteralString);
    }

    #[test]
    fn test_operators_and_delimiters() {
        assert_eq!(classify_token(":="), TokenKind::OpAssignment);
        assert_eq!(classify_token(":"), TokenKind::OpColon);
        assert_eq!(classify_token("<<"), TokenKind::OpLeftShift);
        assert_eq!(classify_token("<="), TokenKind::OpLessThanOrEqual);
        assert_eq!(classify_token(">="), TokenKind::OpGreaterThanOrEqual);
        assert_eq!(classify_token("=="), TokenKind::OpRelationalEqual);
        assert_eq!(classify_token("!="), TokenKind::OpRelationalNotEqual);
        assert_eq!(classify_token("<"), TokenKind::OpLessThan);
        assert_eq!(classify_token("="), TokenKind::OpEqual);
        assert_eq!(classify_token("-"), TokenKind::OpMinus);
        assert_eq!(classify_token("("), TokenKind::DelimiterLeftP);
        assert_eq!(classify_token(";"), TokenKind::Endline);
    }

    #[test]
    fn test_error_atoms() {
        for atom in [";;", "((", ".", ".5", "1.2.3", "@", ":=-", "\"open", "é", "!"] {
            assert_eq!(classify_token(atom), TokenKind::Error, "atom {:?}", atom);
        }
    }

    #[test]
    fn test_reclassification_is_stable() {
        let source = "x : integer ;\ny : double ;\nx := 5 ;\ny := x * 2.5 - ( 3 / x ) ;\n\
                      if ( y != 7 ) output << \"done\" ;";
        for line in atomize(source) {
            for atom in &line.atoms {
                let token = classify_atom(atom, line.line_number());
                if !token.is_error() {
                    assert_eq!(classify_token(&token.lexeme), token.kind);
                }
            }
        }
    }
}
