//! Error and success codes with their classification metadata
//!
//! Every code the front-end can emit is declared here once, together with
//! its category, severity and the action a user should take.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const TOO_MANY_LINES: Code = Code::new("E013");
}

/// Lexical analysis codes
pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER_SEQUENCE: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E023");
    pub const STRING_TOO_LARGE: Code = Code::new("E024");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
}

/// Syntax analysis codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_TOKEN: Code = Code::new("E050");
    pub const INTERNAL_PARSER_ERROR: Code = Code::new("E086");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("E087");
}

/// Symbol table codes
pub mod symbols {
    use super::Code;

    pub const REDECLARATION: Code = Code::new("E090");
    pub const UNDECLARED_VARIABLE: Code = Code::new("E091");
    pub const INVALID_LITERAL_FOR_TYPE: Code = Code::new("E092");
    pub const SYMBOL_LIMIT_EXCEEDED: Code = Code::new("E093");
}

pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const ATOMIZATION_COMPLETE: Code = Code::new("I010");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const PARSE_TREE_COMPLETE: Code = Code::new("I040");
    pub const SYMBOL_TABLE_COMPLETE: Code = Code::new("I050");
    pub const ANALYSIS_COMPLETE: Code = Code::new("I060");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

const ERROR_TABLE: &[ErrorMetadata] = &[
    // System
    ErrorMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        true,
        "Internal error in the front-end",
        "File a bug report with the input that triggered it",
    ),
    ErrorMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        false,
        true,
        "Logging or configuration failed to initialize",
        "Check MINI_* environment variables and the build profile",
    ),
    // File processing
    ErrorMetadata::new(
        "E005",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Source file not found",
        "Check the path; the default input is src.txt in the working directory",
    ),
    ErrorMetadata::new(
        "E006",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Source file has an unsupported extension",
        "Rename the file to .mini or .txt, or unset MINI_REQUIRE_SOURCE_EXTENSION",
    ),
    ErrorMetadata::new(
        "E007",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Source file exceeds the configured size limit",
        "Split the program or raise max_file_size in the build profile",
    ),
    ErrorMetadata::new(
        "E008",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Source file is empty",
        "Add at least one declaration or statement",
    ),
    ErrorMetadata::new(
        "E009",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Permission denied reading source file",
        "Check file permissions",
    ),
    ErrorMetadata::new(
        "E010",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Source file is not valid UTF-8",
        "Save the file as UTF-8 or plain ASCII",
    ),
    ErrorMetadata::new(
        "E011",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "I/O error while reading source file",
        "Retry; check the disk and file system",
    ),
    ErrorMetadata::new(
        "E012",
        "FileProcessing",
        Severity::Medium,
        false,
        true,
        "Invalid source path",
        "Pass a path to a regular file",
    ),
    ErrorMetadata::new(
        "E013",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Source file has too many lines",
        "Split the program or raise max_line_count_for_analysis",
    ),
    // Lexical
    ErrorMetadata::new(
        "E020",
        "Lexical",
        Severity::Medium,
        true,
        false,
        "Character sequence matches no token kind",
        "Separate operators with spaces and check for stray characters",
    ),
    ErrorMetadata::new(
        "E021",
        "Lexical",
        Severity::Medium,
        true,
        false,
        "String literal is not closed on the same line",
        "Close the string with the quote character that opened it",
    ),
    ErrorMetadata::new(
        "E023",
        "Lexical",
        Severity::Medium,
        true,
        false,
        "Identifier exceeds the maximum length",
        "Use a shorter variable name",
    ),
    ErrorMetadata::new(
        "E024",
        "Lexical",
        Severity::Medium,
        true,
        false,
        "String literal exceeds the maximum size",
        "Shorten the string",
    ),
    ErrorMetadata::new(
        "E027",
        "Lexical",
        Severity::High,
        false,
        true,
        "Token count exceeds the configured limit",
        "Split the program or raise max_token_count",
    ),
    // Syntax
    ErrorMetadata::new(
        "E050",
        "Syntax",
        Severity::High,
        false,
        true,
        "Token does not fit the grammar at this position",
        "Compare the statement with the declaration, assignment, output and if forms",
    ),
    ErrorMetadata::new(
        "E086",
        "Syntax",
        Severity::Critical,
        false,
        true,
        "Parser reached an inconsistent state",
        "File a bug report with the input that triggered it",
    ),
    ErrorMetadata::new(
        "E087",
        "Syntax",
        Severity::High,
        false,
        true,
        "Expression or if nesting exceeds the maximum parse depth",
        "Reduce parenthesis or if nesting",
    ),
    // Symbols
    ErrorMetadata::new(
        "E090",
        "Symbols",
        Severity::Medium,
        true,
        false,
        "Variable declared more than once",
        "Remove the second declaration or rename the variable",
    ),
    ErrorMetadata::new(
        "E091",
        "Symbols",
        Severity::Medium,
        true,
        false,
        "Variable used without a declaration",
        "Declare the variable with `name : integer ;` or `name : double ;` first",
    ),
    ErrorMetadata::new(
        "E092",
        "Symbols",
        Severity::Medium,
        true,
        false,
        "Assigned literal does not match the declared type",
        "Assign a numeric literal to integer and double variables",
    ),
    ErrorMetadata::new(
        "E093",
        "Symbols",
        Severity::High,
        false,
        true,
        "Symbol table exceeds the configured size",
        "Reduce the number of distinct variables or raise max_symbols",
    ),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| ERROR_TABLE.iter().map(|meta| (meta.code, meta)).collect())
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code).copied()
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Human-readable description, "Unknown error" for unregistered codes
pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
