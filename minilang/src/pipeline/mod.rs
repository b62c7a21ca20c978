//! Source -> atoms -> provisional tokens -> symbol table -> finalized
//! tokens -> parse tree
//!
//! Lexical and symbol problems are collected as diagnostics. A syntax error
//! ends the parse but is still returned inside the [`AnalysisResult`].

mod error;
mod info;
pub mod output;
mod result;
mod validation;

pub use error::PipelineError;
pub use info::{get_pipeline_info, PipelineInfo, PIPELINE_STAGES};
pub use output::{FileInfo, PipelineOutput, TokenRecord};
pub use result::{AnalysisOutcome, AnalysisResult, PipelineResult};
pub use validation::validate_pipeline;

use crate::config::RuntimeConfig;
use crate::diagnostics::LoggingSink;
use crate::file_processor::FileProcessor;
use crate::lexical::LexicalAnalyzer;
use crate::logging;
use crate::tokens::TokenStream;
use std::path::PathBuf;
use std::time::Instant;

/// Analyze source text with preferences from the environment
pub fn analyze_source(source: &str) -> Result<AnalysisResult, PipelineError> {
    analyze_with_config(source, &RuntimeConfig::default())
}

pub fn analyze_with_config(
    source: &str,
    config: &RuntimeConfig,
) -> Result<AnalysisResult, PipelineError> {
    let mut sink = LoggingSink;

    let mut analyzer = LexicalAnalyzer::with_preferences(config.lexical.clone());
    let lexical = analyzer.analyze(source, &mut sink)?;

    let symbols = crate::symbols::build_with_preferences(
        &lexical.tokens,
        &lexical.atom_lines,
        config.symbols.clone(),
        &mut sink,
    )?;
    let tokens = crate::symbols::finalize_tokens(&lexical.tokens, &symbols.table);

    let stream = TokenStream::new(tokens.clone());
    let parse = crate::syntax::parse_stream(stream, config.parser.clone());

    let mut diagnostics = lexical.diagnostics;
    diagnostics.extend(symbols.diagnostics);

    let result = AnalysisResult {
        atom_lines: lexical.atom_lines,
        tokens,
        symbol_table: symbols.table,
        diagnostics,
        parse,
        lexical_metrics: analyzer.metrics().clone(),
    };

    crate::log_debug!("Source analyzed",
        "outcome" => result.outcome(),
        "tokens" => result.tokens.len(),
        "symbols" => result.symbol_table.len(),
        "diagnostics" => result.diagnostics.len()
    );

    Ok(result)
}

/// Read a file and analyze it inside a logging file context
pub fn process_file(file_path: &str) -> Result<PipelineResult, PipelineError> {
    process_file_with_config(file_path, &RuntimeConfig::default())
}

pub fn process_file_with_config(
    file_path: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    logging::with_file_context(PathBuf::from(file_path), 0, || {
        crate::log_info!("Starting MiniLang analysis pipeline", "file" => file_path);

        let file_result =
            FileProcessor::from_preferences(&config.file_processor).process_file(file_path)?;
        let analysis = analyze_with_config(&file_result.source, config)?;

        let result = PipelineResult::new(file_result.metadata, analysis, start_time.elapsed());
        result.log_completion(file_path);
        Ok(result)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;
    use crate::symbols::{DataType, SymbolValue};
    use crate::syntax::{NodeLabel, SyntaxError};
    use crate::tokens::TokenKind;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_validate_pipeline() {
        let _ = crate::logging::init_global_logging();
        assert!(validate_pipeline().is_ok());
    }

    #[test]
    fn test_clean_program() {
        let result = analyze_source("x : integer ; x := 5 ; output << x ;").unwrap();

        assert_eq!(result.outcome(), AnalysisOutcome::Clean);
        assert!(result.diagnostics.is_empty());

        let tree = result.parse_tree().unwrap();
        assert_eq!(tree.count_label(NodeLabel::Declaration), 1);
        assert_eq!(tree.count_label(NodeLabel::Statement), 2);
        assert_eq!(tree.count_label(NodeLabel::AssignmentStatement), 1);
        assert_eq!(tree.count_label(NodeLabel::OutputStatement), 1);

        let entry = result.symbol_table.get("x").unwrap();
        assert_eq!(entry.data_type, Some(DataType::Integer));
        assert_eq!(entry.value, SymbolValue::Integer(5));
    }

    #[test]
    fn test_undeclared_assignment_parses_with_diagnostic() {
        let result = analyze_source("x := 5 ; output << \"Hello\" ;").unwrap();

        assert_eq!(result.outcome(), AnalysisOutcome::ParsedWithDiagnostics);
        let undeclared: Vec<_> = result
            .diagnostics_of(ErrorKind::UndeclaredVariableError)
            .collect();
        assert_eq!(undeclared.len(), 1);
        assert_eq!(undeclared[0].text, "x");
        assert_eq!(undeclared[0].line, 1);

        assert!(!result.symbol_table.contains("x"));
        assert!(result
            .tokens
            .iter()
            .filter(|t| t.lexeme == "x")
            .all(|t| t.kind == TokenKind::Error));
    }

    #[test]
    fn test_if_statement_program() {
        let source = "x : integer ;\nx := 7 ;\nif ( x >= 5 ) output << x ;\n";
        let result = analyze_source(source).unwrap();

        assert_eq!(result.outcome(), AnalysisOutcome::Clean);
        let tree = result.parse_tree().unwrap();
        assert_eq!(tree.count_label(NodeLabel::IfStatement), 1);
        assert_eq!(tree.count_label(NodeLabel::Condition), 1);
        assert_eq!(tree.count_label(NodeLabel::OutputStatement), 1);
        assert_eq!(result.symbol_table.get("x").unwrap().last_line, Some(3));
    }

    #[test]
    fn test_double_endline_fails() {
        let result = analyze_source("x : integer ;;").unwrap();

        assert_eq!(result.outcome(), AnalysisOutcome::Failed);
        assert_matches!(
            result.syntax_error(),
            Some(SyntaxError::UnexpectedToken { found: TokenKind::Error, .. })
        );

        let diagnostic = result.syntax_diagnostic().unwrap();
        assert_eq!(diagnostic.kind, ErrorKind::SyntaxError);
        assert_eq!(diagnostic.column, 13);

        let report = result.syntax_report().unwrap();
        assert!(report.contains("--> 1:13"));
        assert!(report.contains("1 | x : integer ;;"));
        assert!(report.ends_with(&format!("  | {}^^\n", " ".repeat(12))));
    }

    #[test]
    fn test_syntax_report_on_later_line() {
        let result = analyze_source("x : integer ;\n\nx := ( 1 ;").unwrap();
        assert_eq!(result.outcome(), AnalysisOutcome::Failed);

        let report = result.syntax_report().unwrap();
        assert!(report.contains("--> 3:10"));
        assert!(report.contains("3 | x := ( 1 ;"));
        assert!(analyze_source("x : integer ;").unwrap().syntax_report().is_none());
    }

    #[test]
    fn test_empty_source() {
        let result = analyze_source("").unwrap();
        assert_eq!(result.outcome(), AnalysisOutcome::Clean);
        assert!(result.parse_tree().unwrap().is_empty_program());
        assert!(result.atom_lines.is_empty());
    }

    #[test]
    fn test_process_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("src.txt");
        fs::write(&file_path, "y : double ;\ny := 2.5 ;\noutput << y * 2 ;\n").unwrap();

        let result = process_file(file_path.to_str().unwrap()).unwrap();
        assert_eq!(result.outcome(), AnalysisOutcome::Clean);
        assert_eq!(result.file_metadata.line_count, 3);
        assert_eq!(
            result.analysis.symbol_table.get("y").unwrap().value,
            SymbolValue::Double(2.5)
        );
    }

    #[test]
    fn test_process_missing_file() {
        let result = process_file("definitely/not/here.mini");
        assert_matches!(result, Err(PipelineError::FileProcessing(_)));
        assert_eq!(result.unwrap_err().error_code().as_str(), "E005");
    }

    #[test]
    fn test_pipeline_error_creation() {
        let error = PipelineError::pipeline_error("Test error");
        assert_matches!(error, PipelineError::Pipeline { ref message } if message == "Test error");
        assert_eq!(error.error_code().as_str(), "ERR001");
    }
}
