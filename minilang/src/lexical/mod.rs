//! Lexical analysis
//!
//! Source text is atomized line by line ([`atomizer`]), each atom is
//! classified into a provisional token ([`classifier`]), and the
//! [`LexicalAnalyzer`] ties the two together with limits, metrics and
//! diagnostics.

pub mod analyzer;
pub mod atomizer;
pub mod chars;
pub mod classifier;

use crate::config::constants::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::diagnostics::DiagnosticSink;
use crate::logging::codes;

pub use analyzer::{LexerError, LexicalAnalyzer, LexicalMetrics, LexicalOutput};
pub use atomizer::{atomize, Atom, AtomLine};
pub use chars::CharClass;
pub use classifier::{classify_atom, classify_token};

/// Run a default-configured analyzer over `source`
pub fn analyze(source: &str, sink: &mut dyn DiagnosticSink) -> Result<LexicalOutput, LexerError> {
    LexicalAnalyzer::new().analyze(source, sink)
}

pub fn analyze_with_preferences(
    source: &str,
    preferences: LexicalPreferences,
    sink: &mut dyn DiagnosticSink,
) -> Result<LexicalOutput, LexerError> {
    LexicalAnalyzer::with_preferences(preferences).analyze(source, sink)
}

/// Check that every lexical code has registered metadata
pub fn validate_lexical_codes() -> Result<(), String> {
    let lexical_codes = [
        codes::lexical::INVALID_CHARACTER_SEQUENCE,
        codes::lexical::UNTERMINATED_STRING,
        codes::lexical::IDENTIFIER_TOO_LONG,
        codes::lexical::STRING_TOO_LARGE,
        codes::lexical::TOO_MANY_TOKENS,
    ];

    for code in &lexical_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    if MAX_TOKEN_COUNT == 0 || MAX_IDENTIFIER_LENGTH == 0 || MAX_STRING_SIZE == 0 {
        return Err("Lexical limits must be positive".to_string());
    }

    crate::log_debug!("Lexical limits initialized",
        "max_string_size" => MAX_STRING_SIZE,
        "max_identifier_length" => MAX_IDENTIFIER_LENGTH,
        "max_token_count" => MAX_TOKEN_COUNT,
        "max_atoms_per_line" => MAX_ATOMS_PER_LINE
    );

    Ok(())
}

/// Compile-time lexical limits, for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalLimits {
    pub max_string_size: usize,
    pub max_identifier_length: usize,
    pub max_token_count: usize,
    pub max_atoms_per_line: usize,
}

pub fn get_lexical_limits() -> LexicalLimits {
    LexicalLimits {
        max_string_size: MAX_STRING_SIZE,
        max_identifier_length: MAX_IDENTIFIER_LENGTH,
        max_token_count: MAX_TOKEN_COUNT,
        max_atoms_per_line: MAX_ATOMS_PER_LINE,
    }
}
