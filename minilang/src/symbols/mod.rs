//! Symbol table for declared variables
//!
//! Built from the provisional tokens and atom lines after lexical
//! analysis. Undeclared identifiers are purged from the table and their
//! tokens downgraded by [`finalize_tokens`].

pub mod builder;
pub mod error;
pub mod table;

use crate::config::runtime::SymbolPreferences;
use crate::diagnostics::DiagnosticSink;
use crate::lexical::AtomLine;
use crate::tokens::Token;

pub use builder::{build_symbol_table, finalize_tokens, SymbolOutput, SymbolTableBuilder};
pub use error::{SymbolError, SymbolResult};
pub use table::{DataType, SymbolEntry, SymbolTable, SymbolValue};

/// Build with explicit preferences, keeping the diagnostic list
pub fn build_with_preferences(
    tokens: &[Token],
    atom_lines: &[AtomLine],
    preferences: SymbolPreferences,
    sink: &mut dyn DiagnosticSink,
) -> SymbolResult<SymbolOutput> {
    SymbolTableBuilder::with_preferences(preferences, sink).build(tokens, atom_lines)
}

/// Check that every symbol code has registered metadata
pub fn validate_symbol_codes() -> Result<(), String> {
    use crate::logging::codes;

    for code in [
        codes::symbols::REDECLARATION,
        codes::symbols::UNDECLARED_VARIABLE,
        codes::symbols::INVALID_LITERAL_FOR_TYPE,
        codes::symbols::SYMBOL_LIMIT_EXCEEDED,
    ] {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Symbol error code {} has no metadata", code));
        }
    }
    Ok(())
}
