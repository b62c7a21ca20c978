//! Shared primitive types used by the lexer, symbol table and parser

pub mod span;

pub use span::{Position, SourceMap, Span};
