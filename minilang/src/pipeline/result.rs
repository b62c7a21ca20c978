use crate::diagnostics::{Diagnostic, ErrorKind};
use crate::file_processor::FileMetadata;
use crate::lexical::{AtomLine, LexicalMetrics};
use crate::symbols::SymbolTable;
use crate::syntax::{ParseNode, SyntaxError};
use crate::tokens::Token;
use crate::utils::SourceMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisOutcome {
    /// Parsed with no diagnostics
    Clean,
    /// Parsed, but lexical or symbol diagnostics were reported
    ParsedWithDiagnostics,
    /// The parser rejected the token stream
    Failed,
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed)
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

impl fmt::Display for AnalysisOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Clean => "clean",
            Self::ParsedWithDiagnostics => "parsed with diagnostics",
            Self::Failed => "failed",
        };
        f.write_str(text)
    }
}

/// Everything one analysis of a source text produced
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub atom_lines: Vec<AtomLine>,
    /// Finalized tokens, undeclared identifiers downgraded
    pub tokens: Vec<Token>,
    pub symbol_table: SymbolTable,
    /// Lexical diagnostics followed by symbol diagnostics
    pub diagnostics: Vec<Diagnostic>,
    pub parse: Result<ParseNode, SyntaxError>,
    pub lexical_metrics: LexicalMetrics,
}

impl AnalysisResult {
    pub fn outcome(&self) -> AnalysisOutcome {
        match (&self.parse, self.diagnostics.is_empty()) {
            (Err(_), _) => AnalysisOutcome::Failed,
            (Ok(_), true) => AnalysisOutcome::Clean,
            (Ok(_), false) => AnalysisOutcome::ParsedWithDiagnostics,
        }
    }

    pub fn parse_tree(&self) -> Option<&ParseNode> {
        self.parse.as_ref().ok()
    }

    pub fn syntax_error(&self) -> Option<&SyntaxError> {
        self.parse.as_ref().err()
    }

    pub fn diagnostics_of(&self, kind: ErrorKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    /// The syntax error located on its source line
    pub fn syntax_diagnostic(&self) -> Option<Diagnostic> {
        let error = self.syntax_error()?;
        let line_text = self
            .atom_lines
            .iter()
            .find(|line| line.line_number() == error.line())
            .map(|line| line.text.as_str())
            .unwrap_or("");
        Some(error.to_diagnostic(line_text))
    }

    /// The syntax error under its source line, with the offending token
    /// underlined
    pub fn syntax_report(&self) -> Option<String> {
        let error = self.syntax_error()?;
        let source = self
            .atom_lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let span = error.span();
        Some(SourceMap::new(source).format_error(
            span.start.line,
            span.start.column,
            span.len(),
            &error.to_string(),
        ))
    }
}

/// Result of running a file through intake and analysis
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub file_metadata: FileMetadata,
    pub analysis: AnalysisResult,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(
        file_metadata: FileMetadata,
        analysis: AnalysisResult,
        processing_duration: Duration,
    ) -> Self {
        Self {
            file_metadata,
            analysis,
            processing_duration,
        }
    }

    pub fn outcome(&self) -> AnalysisOutcome {
        self.analysis.outcome()
    }

    pub fn log_completion(&self, file_path: &str) {
        let seconds = self.processing_duration.as_secs_f64();
        let tokens_per_sec = if seconds > 0.0 {
            self.analysis.tokens.len() as f64 / seconds
        } else {
            0.0
        };

        crate::log_success!(
            crate::logging::codes::success::ANALYSIS_COMPLETE,
            "Analysis pipeline finished",
            "file" => file_path,
            "outcome" => self.outcome(),
            "diagnostics" => self.analysis.diagnostics.len(),
            "duration_ms" => format!("{:.2}", seconds * 1000.0),
            "tokens_per_sec" => format!("{:.0}", tokens_per_sec)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(AnalysisOutcome::Clean.exit_code(), 0);
        assert_eq!(AnalysisOutcome::ParsedWithDiagnostics.exit_code(), 0);
        assert_eq!(AnalysisOutcome::Failed.exit_code(), 1);
        assert_eq!(AnalysisOutcome::ParsedWithDiagnostics.to_string(), "parsed with diagnostics");
    }
}
