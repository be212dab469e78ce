// Internal modules
pub mod config;
pub mod file_processor;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod scope;
pub mod tokens;
pub mod utils;
pub mod values;

// Re-export key types for library consumers
pub use lexical::{tokenize, Lexer, LexerError};
pub use pipeline::{PipelineError, PipelineResult};
pub use scope::{Namespace, Scope, ScopeError, ScopeGuard};
pub use tokens::{Position, Span, Token, TokenKind};
pub use values::{flatten, FlatModel, Model, Value};

// Re-export pipeline output for JSON consumers
pub use pipeline::output::PipelineOutput;
