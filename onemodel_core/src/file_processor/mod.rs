//! Source file intake: path checks, size limits and UTF-8 decoding

mod processor;

use crate::config::compile_time::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_LINE_COUNT};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::log_debug;
use std::path::Path;

pub use processor::{
    FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError, ONE_EXTENSION,
};

/// Process a file with default settings
pub fn process_file(file_path: &Path) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new().process_file(file_path)
}

pub fn create_processor_from_preferences(prefs: &FileProcessorPreferences) -> FileProcessor {
    FileProcessor::from_preferences(prefs)
}

pub fn should_halt_on_error(error: &FileProcessorError) -> bool {
    error.requires_halt()
}

/// Check that every file processing code is registered, for system startup
pub fn init_file_processor_logging() -> Result<(), String> {
    let required = [
        codes::file_processing::FILE_NOT_FOUND,
        codes::file_processing::INVALID_EXTENSION,
        codes::file_processing::FILE_TOO_LARGE,
        codes::file_processing::EMPTY_FILE,
        codes::file_processing::PERMISSION_DENIED,
        codes::file_processing::INVALID_ENCODING,
        codes::file_processing::IO_ERROR,
        codes::file_processing::TOO_MANY_LINES,
    ];

    for code in required {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "File processor error code {} not found in metadata registry",
                code
            ));
        }
    }

    log_debug!("File processor limits loaded",
        "max_file_size" => MAX_FILE_SIZE,
        "large_file_threshold" => LARGE_FILE_THRESHOLD,
        "max_line_count" => MAX_LINE_COUNT
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_module_api() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("model.one");
        fs::write(&file_path, "k = 0.5\n").unwrap();

        let result = process_file(&file_path);
        assert!(result.is_ok());
    }

    #[test]
    fn test_halt_on_error() {
        assert!(should_halt_on_error(&FileProcessorError::EmptyFile));
    }

    #[test]
    fn test_limits_are_consistent() {
        assert!(LARGE_FILE_THRESHOLD <= MAX_FILE_SIZE);
        assert_eq!(FileProcessor::max_file_size(), MAX_FILE_SIZE);
    }

    #[test]
    fn test_init_logging() {
        assert!(init_file_processor_logging().is_ok());
    }
}
