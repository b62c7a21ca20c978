//! Token model shared by the lexical analyzer, symbol table and parser
//!
//! - [`TokenKind`]: the closed set of kinds with their display names and
//!   whole-atom recognizers
//! - [`Token`]: a classified lexeme with its line and span
//! - [`TokenStream`]: an `Eof`-terminated cursor used by the parser

pub mod token;
pub mod token_stream;

pub use token::{Token, TokenKind};
pub use token_stream::{TokenStream, TokenStreamError};
