//! Fatal symbol-table errors
//!
//! Redeclarations and undeclared variables are diagnostics, not errors;
//! only resource limits stop table construction.

use crate::config::constants::compile_time::symbols::*;

pub type SymbolResult<T> = Result<T, SymbolError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SymbolError {
    #[error("Symbol limit exceeded: {count} symbols (max {MAX_SYMBOLS})")]
    SymbolLimitExceeded { count: usize },

    #[error("Identifier '{name}' too long for symbol table: {length} characters (max {MAX_SYMBOL_IDENTIFIER_LENGTH})")]
    IdentifierTooLong { name: String, length: usize },
}

impl SymbolError {
    pub fn error_code(&self) -> crate::logging::Code {
        use crate::logging::codes;
        match self {
            Self::SymbolLimitExceeded { .. } => codes::symbols::SYMBOL_LIMIT_EXCEEDED,
            Self::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
        }
    }
}
