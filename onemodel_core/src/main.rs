use onemodel_core::config::RuntimeConfig;
use onemodel_core::{logging, pipeline};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    input: Option<PathBuf>,
    json: bool,
    quiet: bool,
    config_path: Option<PathBuf>,
    help: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("onemodel_core");

    let options = match parse_options(args.get(1..).unwrap_or_default()) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: {} <file.one> [--json] [--quiet] [--config prefs.toml]", program_name);
            std::process::exit(1);
        }
    };

    if options.help {
        print_help(program_name);
        return Ok(());
    }

    let config = match &options.config_path {
        Some(path) => match RuntimeConfig::load(path) {
            Ok(config) => config,
            Err(error) => {
                logging::safe_log_error(logging::codes::system::CONFIGURATION_ERROR, &error.to_string());
                std::process::exit(1);
            }
        },
        None => RuntimeConfig::default(),
    };

    // Preferences must be installed before the global service reads them
    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()?;
    pipeline::validate_pipeline()?;

    let Some(input) = options.input else {
        eprintln!("Usage: {} <file.one> [--json] [--quiet] [--config prefs.toml]", program_name);
        std::process::exit(1);
    };

    match pipeline::process_file_with_config(&input, &config) {
        Ok(result) => {
            if options.json {
                println!("{}", pipeline::PipelineOutput::new(&result).to_json()?);
            } else {
                if !options.quiet {
                    print_tokens(&result);
                }
                println!(
                    "\nSUCCESS: {} tokens from {} lines in {:.2}ms",
                    result.token_count,
                    result.file_metadata.line_count,
                    result.processing_duration.as_secs_f64() * 1000.0
                );
            }

            if config.logging.enable_cargo_style_output {
                logging::print_cargo_style_summary();
            }
        }
        Err(error) => {
            eprintln!("\nFAILED: {}", error);
            print_detailed_error(&error);

            if config.logging.enable_cargo_style_output {
                logging::print_cargo_style_summary();
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => options.help = true,
            "--json" => options.json = true,
            "--quiet" => options.quiet = true,
            "--config" => {
                let Some(path) = args.get(i + 1) else {
                    return Err("--config requires a path".to_string());
                };
                options.config_path = Some(PathBuf::from(path));
                i += 1;
            }
            other if other.starts_with("--") => {
                eprintln!("Warning: Unknown option '{}'", other);
            }
            other => {
                if options.input.is_some() {
                    return Err(format!("Unexpected extra input '{}'", other));
                }
                options.input = Some(PathBuf::from(other));
            }
        }
        i += 1;
    }

    Ok(options)
}

fn print_help(program_name: &str) {
    println!("OneModel core v{}", env!("CARGO_PKG_VERSION"));
    println!("Tokenize a OneModel source file");
    println!();
    println!("USAGE:");
    println!("    {} <file.one> [options]", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --json              Print the token stream as JSON");
    println!("    --quiet             Only print the summary line");
    println!("    --config FILE       Load runtime preferences from a TOML file");
    println!();
    println!("ENVIRONMENT:");
    println!("    ONEMODEL_LEXICAL_PERMISSIVE_STRINGS   Accept unterminated strings");
    println!("    ONEMODEL_LOGGING_MIN_LEVEL            error | warn | info | debug");
    println!("    ONEMODEL_LOGGING_USE_STRUCTURED       Emit JSON log lines");
    println!();
    println!("{}", onemodel_core::config::build_info::source_info());
}

fn print_tokens(result: &pipeline::PipelineResult) {
    for token in result.tokens.tokens() {
        let start = token.pos_start();
        println!(
            "{:>5}:{:<4} {}",
            start.display_line(),
            start.display_column(),
            token
        );
    }
}

fn print_detailed_error(error: &pipeline::PipelineError) {
    match error {
        pipeline::PipelineError::FileProcessing(ref file_err) => {
            eprintln!("File processing stage failed:");
            eprintln!("  {}", file_err);
        }
        pipeline::PipelineError::LexicalAnalysis(ref lex_err) => {
            eprintln!("Lexical analysis stage failed:");
            eprint!("{}", lex_err.to_diagnostic().render());
        }
        pipeline::PipelineError::Pipeline { message } => {
            eprintln!("Pipeline error: {}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_options() {
        let options = parse_options(&args(&["model.one", "--json", "--config", "prefs.toml"])).unwrap();
        assert_eq!(options.input, Some(PathBuf::from("model.one")));
        assert!(options.json);
        assert!(!options.quiet);
        assert_eq!(options.config_path, Some(PathBuf::from("prefs.toml")));
    }

    #[test]
    fn test_parse_options_invalid() {
        assert!(parse_options(&args(&["--config"])).is_err());
        assert!(parse_options(&args(&["a.one", "b.one"])).is_err());

        let options = parse_options(&args(&["--unknown-option", "--quiet"])).unwrap();
        assert!(options.quiet);
        assert!(options.input.is_none());
    }
}
