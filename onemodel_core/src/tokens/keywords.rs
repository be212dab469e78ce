//! Reserved words of the OneModel scripting layer
use serde::{Deserialize, Serialize};

/// Reserved words. Matching is case sensitive: `END` is a keyword, `end` is
/// an ordinary identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    // === DECLARATIONS ===
    Var,
    Fun,

    // === LOGICAL OPERATORS ===
    And,
    Or,
    Not,

    // === CONDITIONALS ===
    If,
    Elif,
    Else,
    Then,

    // === LOOPS ===
    For,
    To,
    Step,
    While,

    // === BLOCK / FLOW CONTROL ===
    End,
    Return,
    Continue,
    Break,
}

impl Keyword {
    pub const ALL: [Keyword; 17] = [
        Self::Var,
        Self::Fun,
        Self::And,
        Self::Or,
        Self::Not,
        Self::If,
        Self::Elif,
        Self::Else,
        Self::Then,
        Self::For,
        Self::To,
        Self::Step,
        Self::While,
        Self::End,
        Self::Return,
        Self::Continue,
        Self::Break,
    ];

    /// Exact spelling in source
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Var => "VAR",
            Self::Fun => "FUN",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::If => "IF",
            Self::Elif => "ELIF",
            Self::Else => "ELSE",
            Self::Then => "THEN",
            Self::For => "FOR",
            Self::To => "TO",
            Self::Step => "STEP",
            Self::While => "WHILE",
            Self::End => "END",
            Self::Return => "RETURN",
            Self::Continue => "CONTINUE",
            Self::Break => "BREAK",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kw| kw.as_str() == s)
    }

    pub const fn is_logical_operator(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Not)
    }

    /// Keywords that open a block closed by `END`
    pub const fn opens_block(self) -> bool {
        matches!(self, Self::If | Self::For | Self::While | Self::Fun)
    }
}
