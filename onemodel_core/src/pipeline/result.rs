use crate::file_processor::FileMetadata;
use crate::lexical::LexicalMetrics;
use crate::tokens::TokenStream;
use std::time::Duration;

/// Everything produced for one source file
#[derive(Debug)]
pub struct PipelineResult {
    pub file_metadata: FileMetadata,
    pub tokens: TokenStream,
    pub lexical_metrics: LexicalMetrics,
    pub token_count: usize,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(
        file_metadata: FileMetadata,
        tokens: TokenStream,
        lexical_metrics: LexicalMetrics,
        processing_duration: Duration,
    ) -> Self {
        Self {
            file_metadata,
            token_count: tokens.len(),
            tokens,
            lexical_metrics,
            processing_duration,
        }
    }

    pub fn tokens_per_second(&self) -> f64 {
        let secs = self.processing_duration.as_secs_f64();
        if secs > 0.0 {
            self.token_count as f64 / secs
        } else {
            0.0
        }
    }

    pub fn log_success(&self, file_path: &str) {
        crate::log_success!(
            crate::logging::codes::success::FILE_PROCESSING_SUCCESS,
            "OneModel file processing pipeline succeeded",
            "file" => file_path,
            "tokens" => self.token_count,
            "lines" => self.file_metadata.line_count,
            "duration_ms" => format!("{:.2}", self.processing_duration.as_secs_f64() * 1000.0),
            "processing_rate_tokens_per_sec" => format!("{:.0}", self.tokens_per_second())
        );
    }
}
