use super::result::PipelineResult;
use crate::tokens::Token;
use serde::Serialize;

/// JSON view of a processed file, as printed by `--json`
#[derive(Debug, Serialize)]
pub struct PipelineOutput<'a> {
    pub file: String,
    pub size: u64,
    pub line_count: usize,
    pub token_count: usize,
    pub tokens: &'a [Token],
}

impl<'a> PipelineOutput<'a> {
    pub fn new(result: &'a PipelineResult) -> Self {
        Self {
            file: result.file_metadata.path.display().to_string(),
            size: result.file_metadata.size,
            line_count: result.file_metadata.line_count,
            token_count: result.token_count,
            tokens: result.tokens.tokens(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
