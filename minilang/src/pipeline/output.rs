//! JSON document for one analysis

use crate::diagnostics::Diagnostic;
use crate::file_processor::FileMetadata;
use crate::pipeline::result::{AnalysisOutcome, AnalysisResult, PipelineResult};
use crate::symbols::SymbolTable;
use crate::syntax::{ParseNode, SyntaxError};
use crate::tokens::{Token, TokenKind};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    pub path: String,
    pub size_bytes: u64,
    pub line_count: usize,
    pub extension: Option<String>,
    pub modified: Option<String>,
}

impl From<&FileMetadata> for FileInfo {
    fn from(metadata: &FileMetadata) -> Self {
        Self {
            path: metadata.path.display().to_string(),
            size_bytes: metadata.size,
            line_count: metadata.line_count,
            extension: metadata.extension.clone(),
            modified: metadata.modified_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenRecord {
    pub lexeme: String,
    pub kind: TokenKind,
    pub line: usize,
}

impl From<&Token> for TokenRecord {
    fn from(token: &Token) -> Self {
        Self {
            lexeme: token.lexeme.clone(),
            kind: token.kind,
            line: token.line,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileInfo>,
    pub outcome: AnalysisOutcome,
    pub tokens: Vec<TokenRecord>,
    pub symbol_table: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_tree: Option<ParseNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax_error: Option<SyntaxError>,
}

impl PipelineOutput {
    pub fn from_analysis(analysis: &AnalysisResult) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            file: None,
            outcome: analysis.outcome(),
            tokens: analysis.tokens.iter().map(TokenRecord::from).collect(),
            symbol_table: analysis.symbol_table.clone(),
            diagnostics: analysis.diagnostics.clone(),
            parse_tree: analysis.parse_tree().cloned(),
            syntax_error: analysis.syntax_error().cloned(),
        }
    }

    pub fn from_pipeline(result: &PipelineResult) -> Self {
        Self {
            file: Some(FileInfo::from(&result.file_metadata)),
            ..Self::from_analysis(&result.analysis)
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_document_fields() {
        let analysis =
            crate::pipeline::analyze_source("x : integer ;\nx := 5 ;\noutput << x ;").unwrap();
        let output = PipelineOutput::from_analysis(&analysis);
        let value: serde_json::Value =
            serde_json::from_str(&output.to_json_pretty().unwrap()).unwrap();

        assert_eq!(value["outcome"], "Clean");
        assert_eq!(value["tokens"][0]["lexeme"], "x");
        assert_eq!(value["tokens"][0]["kind"], "IDENTIFIER");
        assert_eq!(value["symbol_table"]["x"]["data_type"], "Integer");
        assert_eq!(value["parse_tree"]["label"], "Program");
        assert!(value.get("syntax_error").is_none());
        assert!(value.get("file").is_none());
        assert!(chrono::DateTime::parse_from_rfc3339(value["generated_at"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_json_carries_syntax_error() {
        let analysis = crate::pipeline::analyze_source("x : integer ;;").unwrap();
        let output = PipelineOutput::from_analysis(&analysis);
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["outcome"], "Failed");
        assert!(value.get("parse_tree").is_none());
        assert_eq!(value["syntax_error"]["UnexpectedToken"]["found"], "ERROR");
    }
}
