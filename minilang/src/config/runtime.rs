// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Read a boolean-ish environment variable, falling back to `default`
fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Whether to reject files without a `.mini` or `.txt` extension
    pub require_source_extension: bool,

    /// Whether to log read timings and throughput
    pub enable_performance_logging: bool,

    /// Whether to log a debug event when a file has an unusual extension
    pub log_unusual_extensions: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_source_extension: env_flag(env_vars::REQUIRE_SOURCE_EXTENSION, false),
            enable_performance_logging: env_flag(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
            log_unusual_extensions: env_flag(env_vars::LOG_UNUSUAL_EXTENSIONS, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether to collect per-kind token metrics
    pub collect_detailed_metrics: bool,

    /// Whether invalid atoms that look like unclosed strings get their own message
    pub detect_unterminated_strings: bool,

    /// Whether to show position information in error messages
    pub include_position_in_errors: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env_flag(env_vars::LEXICAL_DETAILED_METRICS, true),
            detect_unterminated_strings: env_flag(env_vars::LEXICAL_DETECT_UNTERMINATED, true),
            include_position_in_errors: env_flag(env_vars::LEXICAL_INCLUDE_POSITIONS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolPreferences {
    /// Whether plain references (not declarations or assignments) extend `last_line`
    pub track_reference_lines: bool,

    /// Whether identifiers that are only ever referenced get an undeclared diagnostic
    pub report_unresolved_references: bool,

    /// Whether to log the final table at debug level
    pub log_symbol_table: bool,
}

impl Default for SymbolPreferences {
    fn default() -> Self {
        Self {
            track_reference_lines: env_flag(env_vars::SYMBOLS_TRACK_REFERENCE_LINES, true),
            report_unresolved_references: env_flag(env_vars::SYMBOLS_REPORT_UNRESOLVED, true),
            log_symbol_table: env_flag(env_vars::SYMBOLS_LOG_TABLE, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserPreferences {
    /// Whether to keep a rule context stack for error messages
    pub track_rule_context: bool,

    /// Whether to log the finished parse tree at debug level
    pub log_parse_tree: bool,
}

impl Default for ParserPreferences {
    fn default() -> Self {
        Self {
            track_rule_context: env_flag(env_vars::PARSER_TRACK_CONTEXT, true),
            log_parse_tree: env_flag(env_vars::PARSER_LOG_TREE, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level that reaches the logger
    pub min_log_level: LogLevel,

    /// Whether to include performance metrics in logs
    pub log_performance_events: bool,

    /// Whether to enable cargo-style error reporting
    pub enable_cargo_style_output: bool,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            log_performance_events: env_flag(env_vars::LOGGING_LOG_PERFORMANCE, true),
            enable_cargo_style_output: env_flag(env_vars::LOGGING_CARGO_STYLE, true),
            include_file_context: env_flag(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables and the CLI)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Errors loading a runtime preferences file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read preferences file {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid preferences file {path}: {message}")]
    Parse { path: String, message: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub symbols: SymbolPreferences,
    pub parser: ParserPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse preferences from TOML text. Missing sections and keys fall back
    /// to the environment-derived defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load preferences from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::from_toml_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_SOURCE_EXTENSION: &str = "MINI_REQUIRE_SOURCE_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "MINI_ENABLE_PERFORMANCE_LOGGING";
    pub const LOG_UNUSUAL_EXTENSIONS: &str = "MINI_LOG_UNUSUAL_EXTENSIONS";

    // Lexical
    pub const LEXICAL_DETAILED_METRICS: &str = "MINI_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_DETECT_UNTERMINATED: &str = "MINI_LEXICAL_DETECT_UNTERMINATED";
    pub const LEXICAL_INCLUDE_POSITIONS: &str = "MINI_LEXICAL_INCLUDE_POSITIONS";

    // Symbols
    pub const SYMBOLS_TRACK_REFERENCE_LINES: &str = "MINI_SYMBOLS_TRACK_REFERENCE_LINES";
    pub const SYMBOLS_REPORT_UNRESOLVED: &str = "MINI_SYMBOLS_REPORT_UNRESOLVED";
    pub const SYMBOLS_LOG_TABLE: &str = "MINI_SYMBOLS_LOG_TABLE";

    // Parser
    pub const PARSER_TRACK_CONTEXT: &str = "MINI_PARSER_TRACK_CONTEXT";
    pub const PARSER_LOG_TREE: &str = "MINI_PARSER_LOG_TREE";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "MINI_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "MINI_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "MINI_LOGGING_MIN_LEVEL";
    pub const LOGGING_LOG_PERFORMANCE: &str = "MINI_LOGGING_LOG_PERFORMANCE";
    pub const LOGGING_CARGO_STYLE: &str = "MINI_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "MINI_LOGGING_INCLUDE_FILE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("1"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [parser]
            log_parse_tree = true

            [logging]
            min_log_level = "debug"
            "#,
        )
        .unwrap();

        assert!(config.parser.log_parse_tree);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
        assert_eq!(
            config.symbols.track_reference_lines,
            SymbolPreferences::default().track_reference_lines
        );
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(RuntimeConfig::from_toml_str("[parser\nlog_parse_tree = ").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[lexical]\ncollect_detailed_metrics = false").unwrap();

        let config = RuntimeConfig::load(&path).unwrap();
        assert!(!config.lexical.collect_detailed_metrics);

        let missing = RuntimeConfig::load(&dir.path().join("missing.toml"));
        assert_matches!(missing, Err(ConfigError::Read { .. }));
    }

    #[test]
    fn test_env_var_names_use_prefix() {
        for name in [
            env_vars::REQUIRE_SOURCE_EXTENSION,
            env_vars::LEXICAL_DETAILED_METRICS,
            env_vars::SYMBOLS_REPORT_UNRESOLVED,
            env_vars::PARSER_LOG_TREE,
            env_vars::LOGGING_MIN_LEVEL,
        ] {
            assert!(name.starts_with("MINI_"));
        }
    }
}
