pub mod config;
pub mod diagnostics;
pub mod file_processor;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod symbols;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use diagnostics::{Diagnostic, DiagnosticSink, ErrorKind};
pub use pipeline::{
    analyze_source, AnalysisOutcome, AnalysisResult, PipelineError, PipelineResult,
};
pub use symbols::{SymbolTable, SymbolValue};
pub use syntax::{parse_tokens, ParseNode, SyntaxError};
pub use tokens::{Token, TokenKind};

pub use pipeline::output::PipelineOutput;
