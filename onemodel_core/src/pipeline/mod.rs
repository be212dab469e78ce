mod error;
pub mod output;
mod result;
mod validation;

pub use error::PipelineError;
pub use output::PipelineOutput;
pub use result::PipelineResult;
pub use validation::validate_pipeline;

use crate::config::RuntimeConfig;
use crate::file_processor::FileProcessor;
use crate::lexical::LexicalAnalyzer;
use crate::logging;
use std::path::Path;
use std::time::Instant;

/// Process a single file (file -> lexical) with preferences from the environment
pub fn process_file(file_path: &Path) -> Result<PipelineResult, PipelineError> {
    process_file_with_config(file_path, &RuntimeConfig::default())
}

/// Process a single file with explicit runtime preferences
pub fn process_file_with_config(
    file_path: &Path,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();
    let display_path = file_path.display().to_string();

    logging::with_file_context(file_path.to_path_buf(), 0, || {
        crate::log_info!("Starting OneModel file processing pipeline",
            "file" => display_path,
            "permissive_strings" => config.lexical.permissive_strings
        );

        // Stage 1: File processing
        let file_result = FileProcessor::from_preferences(&config.file_processor).process_file(file_path)?;

        // Stage 2: Lexical analysis
        let mut analyzer = LexicalAnalyzer::with_preferences(config.lexical.clone());
        let tokens = analyzer.tokenize_file_result(&file_result)?;

        let result = PipelineResult::new(
            file_result.metadata,
            tokens,
            analyzer.metrics().clone(),
            start_time.elapsed(),
        );
        result.log_success(&display_path);

        Ok(result)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::runtime::LexicalPreferences;
    use crate::tokens::{Keyword, TokenKind};
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn source_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".one").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_validate_pipeline() {
        let _ = crate::logging::init_global_logging();
        let result = validate_pipeline();
        assert!(result.is_ok());
    }

    #[test]
    fn test_pipeline_error_creation() {
        let error = PipelineError::pipeline_error("Test error");
        assert_matches!(error, PipelineError::Pipeline { ref message } if message == "Test error");
        assert_eq!(error.stage(), "pipeline");
    }

    #[test]
    fn test_process_file_produces_tokens() {
        let file = source_file("VAR k = 0.5 # rate\nS' = -k * S\n");

        let result = process_file(file.path()).unwrap();

        assert_eq!(result.token_count, result.tokens.len());
        assert!(result.tokens.has_eof());
        assert_eq!(result.file_metadata.line_count, 2);
        assert_eq!(result.tokens.tokens()[0].kind, TokenKind::Keyword(Keyword::Var));
    }

    #[test]
    fn test_missing_file_is_file_processing_error() {
        let error = process_file(Path::new("/no/such/model.one")).unwrap_err();
        assert_matches!(error, PipelineError::FileProcessing(_));
        assert_eq!(error.error_code(), crate::logging::codes::file_processing::FILE_NOT_FOUND);
    }

    #[test]
    fn test_lexer_error_propagates() {
        let file = source_file("k = 1 $ 2\n");

        let error = process_file(file.path()).unwrap_err();
        assert_matches!(error, PipelineError::LexicalAnalysis(_));
        assert_eq!(error.error_code(), crate::logging::codes::lexical::ILLEGAL_CHARACTER);
        assert!(logging::get_current_file_context().is_none());
    }

    #[test]
    fn test_permissive_strings_from_config() {
        let file = source_file("name = \"unfinished");

        assert_matches!(
            process_file_with_config(
                file.path(),
                &RuntimeConfig {
                    lexical: LexicalPreferences {
                        permissive_strings: false,
                        ..LexicalPreferences::default()
                    },
                    ..RuntimeConfig::default()
                }
            ),
            Err(PipelineError::LexicalAnalysis(_))
        );

        let config = RuntimeConfig {
            lexical: LexicalPreferences {
                permissive_strings: true,
                ..LexicalPreferences::default()
            },
            ..RuntimeConfig::default()
        };
        let result = process_file_with_config(file.path(), &config).unwrap();
        assert!(result
            .tokens
            .tokens()
            .iter()
            .any(|t| t.kind == TokenKind::Str("unfinished".into())));
    }

    #[test]
    fn test_json_output() {
        let file = source_file("x = 1");
        let result = process_file(file.path()).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&PipelineOutput::new(&result).to_json().unwrap()).unwrap();
        assert_eq!(json["token_count"], 4);
        assert_eq!(json["tokens"].as_array().map(Vec::len), Some(4));
    }
}
