use crate::config::build_info;
use crate::config::constants::compile_time::{file_processing, syntax};
use crate::file_processor::SOURCE_EXTENSIONS;

pub const PIPELINE_STAGES: &[&str] = &["file intake", "lexical", "symbols", "syntax"];

/// Pipeline capabilities and the limits it was built with
#[derive(Debug, Clone)]
pub struct PipelineInfo {
    pub stages: Vec<&'static str>,
    pub max_file_size: u64,
    pub max_line_count: usize,
    pub max_parse_depth: usize,
    pub supported_extensions: Vec<&'static str>,
    pub build_profile: &'static str,
    pub limits_source: String,
    pub version: &'static str,
    pub global_logging_enabled: bool,
}

impl PipelineInfo {
    pub fn report(&self) -> String {
        format!(
            "MiniLang Analysis Pipeline v{}:\n\
             - Stages: {}\n\
             - Max File Size: {} KB\n\
             - Max Lines: {}\n\
             - Max Parse Depth: {}\n\
             - Supported Extensions: {}\n\
             - Build Profile: {}\n\
             - Limits: {}\n\
             - Global Logging: {}",
            self.version,
            self.stages.join(" -> "),
            self.max_file_size / 1024,
            self.max_line_count,
            self.max_parse_depth,
            self.supported_extensions.join(", "),
            self.build_profile,
            self.limits_source,
            self.global_logging_enabled
        )
    }

    pub fn summary(&self) -> String {
        format!(
            "{}-stage MiniLang front-end ({} profile) reading {} files",
            self.stages.len(),
            self.build_profile,
            self.supported_extensions.join(", ")
        )
    }
}

pub fn get_pipeline_info() -> PipelineInfo {
    PipelineInfo {
        stages: PIPELINE_STAGES.to_vec(),
        max_file_size: file_processing::MAX_FILE_SIZE,
        max_line_count: file_processing::MAX_LINE_COUNT_FOR_ANALYSIS,
        max_parse_depth: syntax::MAX_PARSE_DEPTH,
        supported_extensions: SOURCE_EXTENSIONS.to_vec(),
        build_profile: build_info::profile(),
        limits_source: build_info::source_info(),
        version: env!("CARGO_PKG_VERSION"),
        global_logging_enabled: crate::logging::is_initialized(),
    }
}
