use crate::config::compile_time::scope::{MAX_FLATTEN_DEPTH, MAX_FULLNAME_LENGTH};
use crate::logging::{codes, Code};

/// Scope stack failures.
///
/// `EmptyScope` signals unbalanced push/pop in the caller and is never a
/// user input problem. `UnresolvedName` is only produced where a name must
/// exist; a plain lookup miss is `None`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("Cannot {operation} on an empty scope")]
    EmptyScope { operation: &'static str },

    #[error("Name '{name}' is not defined in any visible namespace")]
    UnresolvedName { name: String },

    #[error("Duplicate full name '{fullname}'")]
    NameCollision { fullname: String },

    #[error("Model nesting depth {depth} exceeds the limit of {MAX_FLATTEN_DEPTH}")]
    FlattenTooDeep { depth: usize },

    #[error("Full name of {length} characters exceeds the limit of {MAX_FULLNAME_LENGTH}")]
    FullnameTooLong { length: usize },
}

impl ScopeError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::EmptyScope { .. } => codes::scope::EMPTY_SCOPE,
            Self::UnresolvedName { .. } => codes::scope::UNRESOLVED_NAME,
            Self::NameCollision { .. } => codes::scope::NAME_COLLISION,
            Self::FlattenTooDeep { .. } => codes::scope::FLATTEN_TOO_DEEP,
            Self::FullnameTooLong { .. } => codes::scope::FULLNAME_TOO_LONG,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}
