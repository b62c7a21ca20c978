//! Configuration module
//!
//! Compile-time limits are generated by `build.rs` from the TOML profile in
//! the workspace `config/` directory. Runtime preferences live in [`runtime`].

include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{
    FileProcessorPreferences, LexicalPreferences, LoggingPreferences, ParserPreferences,
    RuntimeConfig, SymbolPreferences,
};

/// Alias kept so limits read as `config::constants::compile_time::...`
pub mod constants {
    pub use super::compile_time;
}

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("MINI_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("MINI_CONFIG_DIR").unwrap_or("config")
    }

    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}
