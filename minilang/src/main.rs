use minilang::config::RuntimeConfig;
use minilang::pipeline::{self, AnalysisOutcome, PipelineOutput, PipelineResult};
use minilang::logging;
use std::env;
use std::path::PathBuf;

const DEFAULT_SOURCE_FILE: &str = "src.txt";

#[derive(Debug, Clone, PartialEq)]
struct CliOptions {
    file: String,
    json: bool,
    show_tokens: bool,
    show_symbols: bool,
    config_path: Option<PathBuf>,
    help: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            file: DEFAULT_SOURCE_FILE.to_string(),
            json: false,
            show_tokens: false,
            show_symbols: false,
            config_path: None,
            help: false,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("minilang");
    let options = parse_options(args.get(1..).unwrap_or(&[]));

    if options.help {
        print_help(program_name);
        return Ok(());
    }

    let config = match &options.config_path {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };

    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()?;
    if let Err(message) = pipeline::validate_pipeline() {
        logging::safe_log_error(logging::codes::system::INTERNAL_ERROR, &message);
        eprintln!("{}", logging::get_system_diagnostics());
        std::process::exit(1);
    }

    match pipeline::process_file_with_config(&options.file, &config) {
        Ok(result) => {
            print_result(&result, &options)?;
            print_summary();
            std::process::exit(result.outcome().exit_code());
        }
        Err(error) => {
            eprintln!("\nFAILED: {}", error);
            print_detailed_error(&error);
            print_summary();
            std::process::exit(1);
        }
    }
}

fn parse_options(args: &[String]) -> CliOptions {
    let mut options = CliOptions::default();
    let mut file_seen = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => options.help = true,
            "--json" => options.json = true,
            "--tokens" => options.show_tokens = true,
            "--symbols" => options.show_symbols = true,
            "--config" => {
                if i + 1 < args.len() {
                    options.config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Warning: --config requires a path");
                }
            }
            other if other.starts_with("--") => {
                eprintln!("Warning: Unknown option '{}'", other);
            }
            other => {
                if file_seen {
                    eprintln!("Warning: Ignoring extra input '{}'", other);
                } else {
                    options.file = other.to_string();
                    file_seen = true;
                }
            }
        }
        i += 1;
    }

    options
}

fn print_help(program_name: &str) {
    println!("MiniLang front-end v{}", env!("CARGO_PKG_VERSION"));
    println!("Lexical analysis, symbol table construction and parsing for MiniLang");
    println!();
    println!("USAGE:");
    println!("    {} [FILE] [options]", program_name);
    println!();
    println!("ARGUMENTS:");
    println!("    [FILE]    Source file to analyze (default: {})", DEFAULT_SOURCE_FILE);
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --json              Print the analysis as a JSON document");
    println!("    --tokens            Print the finalized token table");
    println!("    --symbols           Print the symbol table");
    println!("    --config PATH       Load runtime preferences from a TOML file");
    println!();
    println!("EXIT STATUS:");
    println!("    0    Parsed, with or without diagnostics");
    println!("    1    Syntax error, or the file could not be read");
    println!();

    let pipeline_info = pipeline::get_pipeline_info();
    println!("PIPELINE:");
    for line in pipeline_info.report().lines() {
        println!("    {}", line);
    }
}

fn print_result(
    result: &PipelineResult,
    options: &CliOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let analysis = &result.analysis;

    if options.json {
        println!("{}", PipelineOutput::from_pipeline(result).to_json_pretty()?);
        return Ok(());
    }

    println!("Processing file: {}", result.file_metadata.path.display());

    if options.show_tokens {
        println!("\nTOKENS:");
        println!("{:>6}  {:<26} LEXEME", "LINE", "KIND");
        for token in &analysis.tokens {
            println!("{:>6}  {:<26} {}", token.line, token.kind, token.lexeme);
        }
    }

    if options.show_symbols {
        println!("\nSYMBOL TABLE:");
        print!("{}", analysis.symbol_table.render());
    }

    if !analysis.diagnostics.is_empty() {
        println!("\nDIAGNOSTICS:");
        for diagnostic in &analysis.diagnostics {
            println!("  {}", diagnostic);
        }
    }

    match (analysis.parse_tree(), analysis.syntax_report()) {
        (Some(tree), _) => {
            println!("\nPARSE TREE:");
            print!("{}", tree.render());
        }
        (None, Some(report)) => {
            eprintln!("\nSYNTAX ERROR:");
            eprint!("{}", report);
        }
        (None, None) => {}
    }

    match result.outcome() {
        AnalysisOutcome::Clean => println!("\nSUCCESS: Parsed with no diagnostics"),
        AnalysisOutcome::ParsedWithDiagnostics => println!(
            "\nSUCCESS: Parsed with {} diagnostic(s)",
            analysis.diagnostics.len()
        ),
        AnalysisOutcome::Failed => eprintln!("\nFAILED: Parsing stopped at the first syntax error"),
    }

    Ok(())
}

fn print_summary() {
    if logging::config::use_cargo_style_output() {
        logging::print_cargo_style_summary();
    }
}

fn print_detailed_error(error: &pipeline::PipelineError) {
    match error {
        pipeline::PipelineError::FileProcessing(file_err) => {
            eprintln!("File intake failed [{}]:", file_err.error_code());
            eprintln!("  {}", file_err);
            eprintln!(
                "  {} ({} severity{})",
                file_err.category(),
                file_err.severity(),
                if file_err.is_recoverable() { ", recoverable" } else { "" }
            );
        }
        pipeline::PipelineError::LexicalAnalysis(lex_err) => {
            eprintln!("Lexical analysis stage failed [{}]:", lex_err.error_code());
            eprintln!("  {}", lex_err);
        }
        pipeline::PipelineError::SymbolTable(symbol_err) => {
            eprintln!("Symbol table construction failed [{}]:", symbol_err.error_code());
            eprintln!("  {}", symbol_err);
        }
        pipeline::PipelineError::Pipeline { message } => {
            eprintln!("Pipeline error: {}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_to_src_txt() {
        let options = parse_options(&[]);
        assert_eq!(options.file, "src.txt");
        assert!(!options.json);
    }

    #[test]
    fn test_parse_options() {
        let options = parse_options(&args(&[
            "program.mini",
            "--json",
            "--tokens",
            "--symbols",
            "--config",
            "prefs.toml",
        ]));

        assert_eq!(options.file, "program.mini");
        assert!(options.json && options.show_tokens && options.show_symbols);
        assert_eq!(options.config_path, Some(PathBuf::from("prefs.toml")));
        assert!(!options.help);
    }

    #[test]
    fn test_unknown_and_extra_arguments_ignored() {
        let options = parse_options(&args(&["a.txt", "b.txt", "--verbose", "--config"]));
        assert_eq!(options.file, "a.txt");
        assert_eq!(options.config_path, None);
    }

    #[test]
    fn test_help_flag() {
        assert!(parse_options(&args(&["--help"])).help);
        assert!(parse_options(&args(&["-h"])).help);
    }
}
