/// Check that every stage's codes and limits are registered
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating pipeline configuration");

    crate::file_processor::init_file_processor_logging()?;
    crate::lexical::validate_lexical_codes()?;
    crate::symbols::validate_symbol_codes()?;
    crate::syntax::validate_syntax_codes()?;

    crate::log_success!(
        crate::logging::codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Pipeline validation succeeded",
        "stages_validated" => super::info::PIPELINE_STAGES.len()
    );

    Ok(())
}
