//! Lexical analysis for OneModel source text
//!
//! [`tokenize`] is the bare `(filename, text) -> (tokens, error)` interface.
//! [`LexicalAnalyzer`] adds metrics, preferences and logging on top and
//! hands back a [`TokenStream`].

pub mod analyzer;
pub mod scanner;

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::file_processor::FileProcessingResult;
use crate::logging::codes;
use crate::tokens::{Token, TokenClass, TokenStream};

pub use analyzer::{LexerError, LexicalAnalyzer, LexicalMetrics};
pub use scanner::Lexer;

/// Lex `text` completely. The token list is partial when an error is
/// returned alongside it.
pub fn tokenize(filename: &str, text: &str) -> (Vec<Token>, Option<LexerError>) {
    Lexer::new(filename, text).make_tokens()
}

pub fn tokenize_file_result(file_result: &FileProcessingResult) -> Result<TokenStream, LexerError> {
    LexicalAnalyzer::new().tokenize_file_result(file_result)
}

pub fn tokenize_file_result_with_preferences(
    file_result: &FileProcessingResult,
    preferences: LexicalPreferences,
) -> Result<TokenStream, LexerError> {
    LexicalAnalyzer::with_preferences(preferences).tokenize_file_result(file_result)
}

/// Check that every lexical code is registered, for system startup
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    let required = [
        codes::lexical::ILLEGAL_CHARACTER,
        codes::lexical::UNTERMINATED_STRING,
        codes::lexical::IDENTIFIER_TOO_LONG,
        codes::lexical::STRING_TOO_LARGE,
        codes::lexical::COMMENT_TOO_LONG,
        codes::lexical::TOO_MANY_TOKENS,
    ];

    for code in required {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code
            ));
        }
    }

    crate::log_debug!("Lexical limits initialized",
        "max_string_size" => MAX_STRING_SIZE,
        "max_identifier_length" => MAX_IDENTIFIER_LENGTH,
        "max_comment_length" => MAX_COMMENT_LENGTH,
        "max_token_count" => MAX_TOKEN_COUNT
    );

    Ok(())
}

/// Token distribution of a finished stream
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TokenCounts {
    pub total: usize,
    pub literals: usize,
    pub identifiers: usize,
    pub keywords: usize,
    pub operators: usize,
    pub punctuation: usize,
}

impl TokenCounts {
    pub fn has_content(&self) -> bool {
        self.total > 0
    }
}

/// Count tokens per class. The end-of-file marker is not counted.
pub fn get_token_counts(token_stream: &TokenStream) -> TokenCounts {
    let mut counts = TokenCounts::default();

    for token in token_stream.tokens() {
        let slot = match token.kind.token_class() {
            TokenClass::Literal => &mut counts.literals,
            TokenClass::Identifier => &mut counts.identifiers,
            TokenClass::Keyword => &mut counts.keywords,
            TokenClass::Operator => &mut counts.operators,
            TokenClass::Punctuation => &mut counts.punctuation,
            TokenClass::Special => continue,
        };
        *slot += 1;
        counts.total += 1;
    }

    counts
}
