//! Token model for OneModel source text
//!
//! The lexer turns source text into a sequence of [`Token`]s. Each token has
//! a [`TokenKind`] and a [`Span`] of two position snapshots. The sequence
//! always ends with exactly one `END_OF_FILE` token whose span has zero width.
//!
//! [`TokenKind`] is `#[non_exhaustive]`: consumers matching on it must keep a
//! wildcard arm so new operators and literal forms can be added without a
//! breaking change.

pub mod keywords;
pub mod token;
pub mod token_stream;

pub use keywords::Keyword;
pub use token::{
    classify_operator_symbol, classify_word, is_operator_start, Token, TokenClass, TokenKind,
};
pub use token_stream::{TokenStream, TokenStreamError};

pub use crate::utils::{Position, Span};
