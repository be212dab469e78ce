use crate::file_processor::FileProcessorError;
use crate::lexical::LexerError;
use crate::logging::Code;

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::FileProcessing(e) => e.error_code(),
            Self::LexicalAnalysis(e) => e.error_code(),
            Self::Pipeline { .. } => crate::logging::codes::system::INTERNAL_ERROR,
        }
    }

    /// Short name of the stage that failed
    pub fn stage(&self) -> &'static str {
        match self {
            Self::FileProcessing(_) => "file processing",
            Self::LexicalAnalysis(_) => "lexical analysis",
            Self::Pipeline { .. } => "pipeline",
        }
    }
}
