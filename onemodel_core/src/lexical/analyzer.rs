//! Lexical analyzer with metrics and global logging
//!
//! Wraps the [`Lexer`] state machine: feeds it a processed file, records
//! per-class token counts and reports the outcome through the logging
//! macros. Lexing stops at the first error; there is no recovery.

use super::scanner::Lexer;
use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::file_processor::FileProcessingResult;
use crate::logging::{codes, Code};
use crate::tokens::{Token, TokenClass, TokenKind, TokenStream};
use crate::utils::{Diagnostic, Position, Span};
use crate::{log_debug, log_error, log_success};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Illegal character '{character}'")]
    IllegalCharacter { character: char, position: Position },

    #[error("Unterminated string literal")]
    UnterminatedString { start: Position },

    #[error("Identifier too long: {length} characters (max {MAX_IDENTIFIER_LENGTH})")]
    IdentifierTooLong { length: usize, position: Position },

    #[error("String too large: {size} bytes (max {MAX_STRING_SIZE})")]
    StringTooLarge { size: usize, position: Position },

    #[error("Comment too long: {length} characters (max {MAX_COMMENT_LENGTH})")]
    CommentTooLong { length: usize, position: Position },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize, position: Position },
}

impl LexerError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::IllegalCharacter { .. } => codes::lexical::ILLEGAL_CHARACTER,
            Self::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            Self::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
            Self::StringTooLarge { .. } => codes::lexical::STRING_TOO_LARGE,
            Self::CommentTooLong { .. } => codes::lexical::COMMENT_TOO_LONG,
            Self::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    /// Error kind name reported to diagnostics consumers
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IllegalCharacter { .. } => "IllegalCharacter",
            Self::UnterminatedString { .. } => "UnterminatedString",
            Self::IdentifierTooLong { .. } => "IdentifierTooLong",
            Self::StringTooLarge { .. } => "StringTooLarge",
            Self::CommentTooLong { .. } => "CommentTooLong",
            Self::TooManyTokens { .. } => "TooManyTokens",
        }
    }

    pub fn position(&self) -> &Position {
        match self {
            Self::IllegalCharacter { position, .. }
            | Self::IdentifierTooLong { position, .. }
            | Self::StringTooLarge { position, .. }
            | Self::CommentTooLong { position, .. }
            | Self::TooManyTokens { position, .. } => position,
            Self::UnterminatedString { start } => start,
        }
    }

    /// Source extent to underline. An unterminated string covers everything
    /// from its opening quote to the end of input.
    pub fn span(&self) -> Span {
        let start = self.position().clone();
        match self {
            Self::IllegalCharacter { character, .. } => {
                let mut end = start.snapshot();
                end.advance(Some(*character));
                Span::new(start, end)
            }
            Self::UnterminatedString { .. } => {
                let mut end = start.snapshot();
                let remaining = start.source_text().chars().skip(start.offset());
                for ch in remaining {
                    end.advance(Some(ch));
                }
                Span::new(start, end)
            }
            _ => Span::point(start),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(
            self.error_code(),
            self.kind(),
            self.to_string(),
            self.position().clone(),
        )
        .with_span(self.span())
    }
}

#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub number_tokens: usize,
    pub string_tokens: usize,
    pub identifier_tokens: usize,
    pub keyword_tokens: usize,
    pub operator_tokens: usize,
    pub punctuation_tokens: usize,
    pub max_string_length: usize,
    pub line_count: usize,
    pub char_count: usize,
    pub operator_usage_patterns: HashMap<&'static str, usize>,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        if token.kind.is_eof() {
            return;
        }
        self.total_tokens += 1;

        if !preferences.collect_detailed_metrics {
            return;
        }

        match token.kind.token_class() {
            TokenClass::Literal => match &token.kind {
                TokenKind::Str(value) => {
                    self.string_tokens += 1;
                    self.max_string_length = self.max_string_length.max(value.len());
                }
                _ => self.number_tokens += 1,
            },
            TokenClass::Identifier => self.identifier_tokens += 1,
            TokenClass::Keyword => self.keyword_tokens += 1,
            TokenClass::Punctuation => self.punctuation_tokens += 1,
            TokenClass::Operator => {
                self.operator_tokens += 1;
                if preferences.track_operator_patterns {
                    if let Some(symbol) = token.kind.symbol() {
                        *self.operator_usage_patterns.entry(symbol).or_insert(0) += 1;
                    }
                }
            }
            TokenClass::Special => {}
        }
    }
}

pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    pub fn tokenize_file_result(
        &mut self,
        file_result: &FileProcessingResult,
    ) -> Result<TokenStream, LexerError> {
        log_debug!("Starting lexical analysis",
            "char_count" => file_result.char_count(),
            "line_count" => file_result.metadata.line_count,
            "max_tokens_allowed" => MAX_TOKEN_COUNT
        );

        self.tokenize_str(&file_result.display_name(), &file_result.source)
    }

    /// Tokenize in-memory source text. `filename` only labels positions.
    pub fn tokenize_str(&mut self, filename: &str, source: &str) -> Result<TokenStream, LexerError> {
        self.metrics = LexicalMetrics {
            line_count: source.lines().count(),
            char_count: source.chars().count(),
            ..LexicalMetrics::default()
        };

        let (tokens, error) = Lexer::new(filename, source)
            .permissive_strings(self.preferences.permissive_strings)
            .make_tokens();

        for token in &tokens {
            self.metrics.record_token(token, &self.preferences);
        }

        if let Some(error) = error {
            self.log_failure(&error, tokens.len());
            return Err(error);
        }

        let stream = TokenStream::new(tokens);
        log_success!(codes::success::TOKENIZATION_COMPLETE,
            "Lexical analysis completed successfully",
            "token_count" => stream.len(),
            "numbers" => self.metrics.number_tokens,
            "strings" => self.metrics.string_tokens,
            "identifiers" => self.metrics.identifier_tokens,
            "keywords" => self.metrics.keyword_tokens,
            "operators" => self.metrics.operator_tokens,
            "lines" => self.metrics.line_count
        );

        Ok(stream)
    }

    fn log_failure(&self, error: &LexerError, tokens_processed: usize) {
        let position = error.position();
        if self.preferences.include_position_in_errors {
            log_error!(error.error_code(), &error.to_string(),
                span = error.span(),
                "line" => position.display_line(),
                "column" => position.display_column(),
                "tokens_processed" => tokens_processed
            );
        } else {
            log_error!(error.error_code(), &error.to_string(),
                "tokens_processed" => tokens_processed
            );
        }
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: LexicalPreferences) {
        self.preferences = preferences;
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn detailed() -> LexicalPreferences {
        LexicalPreferences {
            collect_detailed_metrics: true,
            permissive_strings: false,
            track_operator_patterns: true,
            include_position_in_errors: true,
        }
    }

    #[test]
    fn test_metrics_by_class() {
        let mut analyzer = LexicalAnalyzer::with_preferences(detailed());
        let stream = analyzer
            .tokenize_str("m.one", "VAR k = 0.5 + x * \"label\"\nk + 1")
            .unwrap();

        let metrics = analyzer.metrics();
        assert_eq!(stream.len(), metrics.total_tokens + 1);
        assert_eq!(metrics.keyword_tokens, 1);
        assert_eq!(metrics.identifier_tokens, 3);
        assert_eq!(metrics.number_tokens, 2);
        assert_eq!(metrics.string_tokens, 1);
        assert_eq!(metrics.max_string_length, 5);
        assert_eq!(metrics.operator_tokens, 4);
        assert_eq!(metrics.operator_usage_patterns.get("+"), Some(&2));
        assert_eq!(metrics.line_count, 2);
    }

    #[test]
    fn test_stream_ends_with_eof() {
        let mut analyzer = LexicalAnalyzer::new();
        let stream = analyzer.tokenize_str("m.one", "1 + 2").unwrap();
        assert!(stream.has_eof());
        assert_eq!(stream.len(), 4);
    }

    #[test]
    fn test_error_diagnostic_triple() {
        let mut analyzer = LexicalAnalyzer::new();
        let error = analyzer.tokenize_str("m.one", "k = 1\nx = $").unwrap_err();

        assert_matches!(error, LexerError::IllegalCharacter { character: '$', .. });
        assert_eq!(error.error_code(), codes::lexical::ILLEGAL_CHARACTER);

        let diagnostic = error.to_diagnostic();
        assert_eq!(diagnostic.kind, "IllegalCharacter");
        assert_eq!(diagnostic.message, "Illegal character '$'");
        assert_eq!(diagnostic.position.to_string(), "m.one:2:5");

        let rendered = diagnostic.render();
        assert!(rendered.starts_with("error[E020]: Illegal character '$'"));
        assert!(rendered.contains("2 | x = $"));
        assert!(rendered.contains("    ^"));
    }

    #[test]
    fn test_unterminated_string_span_runs_to_end() {
        let error = LexicalAnalyzer::new()
            .tokenize_str("m.one", "x = \"abc")
            .unwrap_err();

        assert_eq!(error.error_code().as_str(), "E021");
        let span = error.span();
        assert_eq!(span.start.index, 4);
        assert_eq!(span.text(), "\"abc");
    }

    #[test]
    fn test_permissive_preference_is_forwarded() {
        let mut analyzer = LexicalAnalyzer::new();
        analyzer.set_preferences(LexicalPreferences {
            permissive_strings: true,
            ..detailed()
        });

        let stream = analyzer.tokenize_str("m.one", "\"open").unwrap();
        assert_eq!(stream.tokens()[0].value(), Some("open"));
        assert!(analyzer.preferences().permissive_strings);
    }

    #[test]
    fn test_metrics_reset_between_runs() {
        let mut analyzer = LexicalAnalyzer::with_preferences(detailed());
        analyzer.tokenize_str("a.one", "a b c").unwrap();
        analyzer.tokenize_str("b.one", "d").unwrap();
        assert_eq!(analyzer.metrics().total_tokens, 1);
    }
}
