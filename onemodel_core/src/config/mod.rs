//! Configuration for the OneModel core
//!
//! Hard limits are generated by `build.rs` from `config/<profile>.toml` and
//! exposed as `config::compile_time`. User-facing preferences live in
//! [`runtime`] and can be overridden through `ONEMODEL_*` environment
//! variables or a TOML preferences file.

include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{LogLevel, RuntimeConfig};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("ONEMODEL_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("ONEMODEL_CONFIG_DIR").unwrap_or("config")
    }

    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}
