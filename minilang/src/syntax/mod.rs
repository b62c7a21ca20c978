//! Syntax analysis - finalized tokens to parse tree
//!
//! The parser sees the token list after the symbol table has downgraded
//! undeclared identifiers. A failed parse yields exactly one
//! [`SyntaxError`] and no tree.

pub mod ast;
mod error;
mod parser;

pub use ast::{NodeLabel, ParseElement, ParseNode};
pub use error::{SyntaxError, SyntaxResult};
pub use parser::Parser;

use crate::config::runtime::ParserPreferences;
use crate::logging::codes;
use crate::tokens::{Token, TokenStream};
use crate::log_debug;

/// Parse a finalized token list as a program
pub fn parse_tokens(tokens: Vec<Token>) -> SyntaxResult<ParseNode> {
    parse_stream(TokenStream::new(tokens), ParserPreferences::default())
}

pub fn parse_stream(stream: TokenStream, preferences: ParserPreferences) -> SyntaxResult<ParseNode> {
    log_debug!("Starting syntax analysis", "tokens" => stream.len());
    Parser::with_preferences(stream, preferences).parse_program()
}

/// Check that every syntax code has registered metadata
pub fn validate_syntax_codes() -> Result<(), String> {
    for code in [
        codes::syntax::UNEXPECTED_TOKEN,
        codes::syntax::INTERNAL_PARSER_ERROR,
        codes::syntax::MAX_RECURSION_DEPTH,
    ] {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Syntax error code {} has no metadata", code));
        }
    }
    Ok(())
}
