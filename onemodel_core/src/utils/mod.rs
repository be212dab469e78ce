//! Shared primitives used across the lexer, scope engine and diagnostics.

pub mod diagnostic;
pub mod span;

pub use diagnostic::Diagnostic;
pub use span::{Position, SourceFile, Span};
