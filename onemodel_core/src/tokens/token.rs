//! Token kinds produced by the OneModel lexer
//!
//! Literal-carrying kinds hold their decoded payload directly, so a token's
//! optional value is simply whatever its kind carries.
use super::keywords::Keyword;
use crate::utils::{Position, Span};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value")]
#[non_exhaustive]
pub enum TokenKind {
    // === LITERALS ===
    /// Normalized numeric text: `.5` is stored as `0.5`, `5.` as `5.0`
    Number(String),
    /// Decoded string contents, escapes already applied
    Str(String),

    // === NAMES ===
    Identifier(String),
    Keyword(Keyword),

    // === ARITHMETIC ===
    Plus,
    Minus,
    Mul,
    Div,
    Pow,

    // === COMPARISON ===
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // === ASSIGNMENT / MODEL STRUCTURE ===
    /// `=` plain assignment
    Eq,
    /// `:=` assignment rule
    ColonEq,
    /// `'` marks a rate rule target, as in `P' = k * S`
    Prime,
    /// `->` reaction arrow
    Arrow,
    /// `:` instance binding, as in `A: my_model()`
    Colon,

    // === PUNCTUATION ===
    LParen,
    RParen,
    Comma,
    Semicolon,

    EndOfFile,
}

impl TokenKind {
    /// Upper-case tag used in dumps and diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Self::Number(_) => "NUMBER",
            Self::Str(_) => "STRING",
            Self::Identifier(_) => "IDENTIFIER",
            Self::Keyword(_) => "KEYWORD",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Mul => "MUL",
            Self::Div => "DIV",
            Self::Pow => "POW",
            Self::EqEq => "EE",
            Self::NotEq => "NE",
            Self::Lt => "LT",
            Self::LtEq => "LTE",
            Self::Gt => "GT",
            Self::GtEq => "GTE",
            Self::Eq => "EQ",
            Self::ColonEq => "COLON_EQ",
            Self::Prime => "PRIME",
            Self::Arrow => "ARROW",
            Self::Colon => "COLON",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::Comma => "COMMA",
            Self::Semicolon => "SEMICOLON",
            Self::EndOfFile => "END_OF_FILE",
        }
    }

    /// Payload carried by literal, identifier and keyword kinds
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Number(v) | Self::Str(v) | Self::Identifier(v) => Some(v),
            Self::Keyword(kw) => Some(kw.as_str()),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Number(_) | Self::Str(_))
    }

    pub fn is_operator(&self) -> bool {
        self.token_class() == TokenClass::Operator
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile)
    }

    pub fn token_class(&self) -> TokenClass {
        match self {
            Self::Number(_) | Self::Str(_) => TokenClass::Literal,
            Self::Identifier(_) => TokenClass::Identifier,
            Self::Keyword(_) => TokenClass::Keyword,
            Self::LParen | Self::RParen | Self::Comma | Self::Semicolon => {
                TokenClass::Punctuation
            }
            Self::EndOfFile => TokenClass::Special,
            _ => TokenClass::Operator,
        }
    }

    /// Source spelling for symbol kinds
    pub fn symbol(&self) -> Option<&'static str> {
        let s = match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
            Self::EqEq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Eq => "=",
            Self::ColonEq => ":=",
            Self::Prime => "'",
            Self::Arrow => "->",
            Self::Colon => ":",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::Comma => ",",
            Self::Semicolon => ";",
            _ => return None,
        };
        Some(s)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(value) => write!(f, "{}:{}", self.name(), value),
            None => write!(f, "{}", self.name()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenClass {
    Literal,
    Identifier,
    Keyword,
    Operator,
    Punctuation,
    /// End of file
    Special,
}

/// A lexed token. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    #[serde(flatten)]
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn value(&self) -> Option<&str> {
        self.kind.value()
    }

    pub fn pos_start(&self) -> &Position {
        &self.span.start
    }

    pub fn pos_end(&self) -> &Position {
        &self.span.end
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

// === CLASSIFICATION ===

/// Classify a scanned word as keyword or identifier
pub fn classify_word(word: &str) -> TokenKind {
    match Keyword::from_str(word) {
        Some(keyword) => TokenKind::Keyword(keyword),
        None => TokenKind::Identifier(word.to_string()),
    }
}

/// Characters that can begin an operator or punctuation token
pub fn is_operator_start(ch: char) -> bool {
    matches!(
        ch,
        '+' | '-' | '*' | '/' | '^' | '=' | '!' | '<' | '>' | ':' | '\'' | '(' | ')' | ',' | ';'
    )
}

/// Map a one or two character symbol to its token kind
pub fn classify_operator_symbol(symbol: &str) -> Option<TokenKind> {
    let kind = match symbol {
        "+" => TokenKind::Plus,
        "-" => TokenKind::Minus,
        "*" => TokenKind::Mul,
        "/" => TokenKind::Div,
        "^" => TokenKind::Pow,
        "==" => TokenKind::EqEq,
        "!=" => TokenKind::NotEq,
        "<" => TokenKind::Lt,
        "<=" => TokenKind::LtEq,
        ">" => TokenKind::Gt,
        ">=" => TokenKind::GtEq,
        "=" => TokenKind::Eq,
        ":=" => TokenKind::ColonEq,
        "'" => TokenKind::Prime,
        "->" => TokenKind::Arrow,
        ":" => TokenKind::Colon,
        "(" => TokenKind::LParen,
        ")" => TokenKind::RParen,
        "," => TokenKind::Comma,
        ";" => TokenKind::Semicolon,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_word() {
        assert_eq!(classify_word("END"), TokenKind::Keyword(Keyword::End));
        assert_eq!(
            classify_word("k_cat"),
            TokenKind::Identifier("k_cat".to_string())
        );
    }

    #[test]
    fn test_symbol_table_is_consistent() {
        for symbol in [
            "+", "-", "*", "/", "^", "==", "!=", "<", "<=", ">", ">=", "=", ":=", "'", "->", ":",
            "(", ")", ",", ";",
        ] {
            let kind = classify_operator_symbol(symbol).unwrap();
            assert_eq!(kind.symbol(), Some(symbol));
            assert!(symbol.chars().next().is_some_and(is_operator_start));
        }
        assert_eq!(classify_operator_symbol("!"), None);
        assert_eq!(classify_operator_symbol("=>"), None);
    }

    #[test]
    fn test_value_payloads() {
        assert_eq!(TokenKind::Number("0.5".into()).value(), Some("0.5"));
        assert_eq!(TokenKind::Plus.value(), None);
        assert_eq!(TokenKind::Keyword(Keyword::If).value(), Some("IF"));
        assert_eq!(TokenKind::Str("hi".into()).to_string(), "STRING:hi");
        assert_eq!(TokenKind::EndOfFile.to_string(), "END_OF_FILE");
    }

    #[test]
    fn test_token_classes() {
        assert_eq!(TokenKind::Arrow.token_class(), TokenClass::Operator);
        assert_eq!(TokenKind::Comma.token_class(), TokenClass::Punctuation);
        assert_eq!(TokenKind::EndOfFile.token_class(), TokenClass::Special);
        assert!(TokenKind::Prime.is_operator());
        assert!(TokenKind::Number("1.0".into()).is_literal());
    }
}
