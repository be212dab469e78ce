//! Cursor over a finished token sequence for downstream consumers.

use super::token::{Token, TokenKind};
use crate::utils::Span;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TokenStreamError {
    #[error("Token stream has no END_OF_FILE token")]
    MissingEof,

    #[error("Token stream has {count} END_OF_FILE tokens, expected exactly one")]
    DuplicateEof { count: usize },

    #[error("END_OF_FILE must be the last token")]
    EofNotLast,

    #[error("Token {index} ends before it starts")]
    InvertedSpan { index: usize },

    #[error("Expected {expected}, found {found} at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },
}

#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Build a stream after checking the lexer's output contract: exactly one
    /// END_OF_FILE, in last place, and no inverted spans.
    pub fn validated(tokens: Vec<Token>) -> Result<Self, TokenStreamError> {
        let eof_count = tokens.iter().filter(|t| t.kind.is_eof()).count();
        match eof_count {
            0 => return Err(TokenStreamError::MissingEof),
            1 => {}
            count => return Err(TokenStreamError::DuplicateEof { count }),
        }
        if !tokens.last().is_some_and(|t| t.kind.is_eof()) {
            return Err(TokenStreamError::EofNotLast);
        }
        if let Some(index) = tokens
            .iter()
            .position(|t| t.span.end.index < t.span.start.index)
        {
            return Err(TokenStreamError::InvertedSpan { index });
        }
        Ok(Self::new(tokens))
    }

    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    pub fn current_kind(&self) -> Option<&TokenKind> {
        self.current().map(|t| &t.kind)
    }

    pub fn peek(&self) -> Option<&Token> {
        self.peek_ahead(1)
    }

    pub fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub fn advance(&mut self) -> Option<&Token> {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        self.current()
    }

    /// True once the cursor sits on END_OF_FILE or past the last token
    pub fn is_at_end(&self) -> bool {
        self.current().map_or(true, |t| t.kind.is_eof())
    }

    /// Consume the current token if it has the expected kind
    pub fn expect(&mut self, expected: &TokenKind) -> Result<Token, TokenStreamError> {
        match self.current() {
            Some(token) if &token.kind == expected => {
                let token = token.clone();
                self.advance();
                Ok(token)
            }
            Some(token) if token.kind.is_eof() => Err(TokenStreamError::UnexpectedEof {
                expected: expected.to_string(),
            }),
            Some(token) => Err(TokenStreamError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.kind.to_string(),
                span: token.span.clone(),
            }),
            None => Err(TokenStreamError::UnexpectedEof {
                expected: expected.to_string(),
            }),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    pub fn has_eof(&self) -> bool {
        self.tokens.last().is_some_and(|t| t.kind.is_eof())
    }

    /// Render the kinds as a single line, e.g. `NUMBER:1.0 PLUS NUMBER:2.0 END_OF_FILE`
    pub fn describe(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.kind.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
