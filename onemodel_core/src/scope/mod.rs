//! Lexical scoping for model evaluation
//!
//! The evaluator pushes a [`Namespace`] for every model body it enters and
//! pops it on exit. Lookups walk from the innermost frame outward, so inner
//! bindings shadow outer ones. [`Scope::get_fullname`] turns a name into the
//! unique, path-prefixed identifier used when a nested model is flattened.

mod error;
mod guard;
mod namespace;
mod stack;

pub use error::ScopeError;
pub use guard::ScopeGuard;
pub use namespace::Namespace;
pub use stack::{Scope, FULLNAME_SEPARATOR};

use crate::config::compile_time::scope::{MAX_FLATTEN_DEPTH, MAX_FULLNAME_LENGTH};
use crate::logging::codes;

/// Check that every scope code is registered, for system startup
pub fn init_scope_logging() -> Result<(), String> {
    let required = [
        codes::scope::EMPTY_SCOPE,
        codes::scope::UNRESOLVED_NAME,
        codes::scope::NAME_COLLISION,
        codes::scope::FLATTEN_TOO_DEEP,
        codes::scope::FULLNAME_TOO_LONG,
    ];

    for code in required {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Scope error code {} not found in metadata registry", code));
        }
    }

    crate::log_debug!("Scope limits initialized",
        "max_flatten_depth" => MAX_FLATTEN_DEPTH,
        "max_fullname_length" => MAX_FULLNAME_LENGTH
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_init_scope_logging() {
        assert!(super::init_scope_logging().is_ok());
    }
}
