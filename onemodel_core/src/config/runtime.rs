// RUNTIME PREFERENCES (user experience, never limits)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Reads a typed value from the environment, falling back when the variable is
/// missing or does not parse.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Reject inputs that do not carry the `.one` extension
    pub require_one_extension: bool,

    /// Log timing and size details for every processed file
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_one_extension: env_or(env_vars::REQUIRE_ONE_EXTENSION, false),
            enable_performance_logging: env_or(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether to collect per-class token counts
    pub collect_detailed_metrics: bool,

    /// Accept a string literal cut off by end of input, using the partial
    /// content as its value, instead of failing with E021
    pub permissive_strings: bool,

    /// Whether to track operator usage counts
    pub track_operator_patterns: bool,

    /// Whether to attach line/column context to lexical error events
    pub include_position_in_errors: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env_or(env_vars::LEXICAL_DETAILED_METRICS, true),
            permissive_strings: env_or(env_vars::LEXICAL_PERMISSIVE_STRINGS, false),
            track_operator_patterns: env_or(env_vars::LEXICAL_TRACK_OPERATORS, false),
            include_position_in_errors: env_or(env_vars::LEXICAL_INCLUDE_POSITIONS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopePreferences {
    /// Emit a debug event on every push and pop
    pub log_scope_transitions: bool,

    /// Fail flattening when two entities map to the same fullname
    pub reject_name_collisions: bool,
}

impl Default for ScopePreferences {
    fn default() -> Self {
        Self {
            log_scope_transitions: env_or(env_vars::SCOPE_LOG_TRANSITIONS, false),
            reject_name_collisions: env_or(env_vars::SCOPE_REJECT_COLLISIONS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Emit one JSON object per event instead of human readable lines
    pub use_structured_logging: bool,

    /// Echo non-error events to stdout
    pub enable_console_logging: bool,

    pub min_log_level: LogLevel,

    /// Print the cargo-style summary at the end of a run
    pub enable_cargo_style_output: bool,

    /// Attach the current file path to every recorded event
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_or(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_or(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            enable_cargo_style_output: env_or(env_vars::LOGGING_CARGO_STYLE, true),
            include_file_context: env_or(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Parse log level from string (used for environment variables and CLI flags)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read preferences file '{path}': {message}")]
    Unreadable { path: String, message: String },

    #[error("Invalid preferences in '{path}': {message}")]
    Invalid { path: String, message: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub scope: ScopePreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse preferences from TOML text. Sections and keys that are absent
    /// keep their environment-derived defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Invalid {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Invalid {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_ONE_EXTENSION: &str = "ONEMODEL_REQUIRE_ONE_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "ONEMODEL_ENABLE_PERFORMANCE_LOGGING";

    // Lexical
    pub const LEXICAL_DETAILED_METRICS: &str = "ONEMODEL_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_PERMISSIVE_STRINGS: &str = "ONEMODEL_LEXICAL_PERMISSIVE_STRINGS";
    pub const LEXICAL_TRACK_OPERATORS: &str = "ONEMODEL_LEXICAL_TRACK_OPERATORS";
    pub const LEXICAL_INCLUDE_POSITIONS: &str = "ONEMODEL_LEXICAL_INCLUDE_POSITIONS";

    // Scope
    pub const SCOPE_LOG_TRANSITIONS: &str = "ONEMODEL_SCOPE_LOG_TRANSITIONS";
    pub const SCOPE_REJECT_COLLISIONS: &str = "ONEMODEL_SCOPE_REJECT_COLLISIONS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "ONEMODEL_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "ONEMODEL_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "ONEMODEL_LOGGING_MIN_LEVEL";
    pub const LOGGING_CARGO_STYLE: &str = "ONEMODEL_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "ONEMODEL_LOGGING_INCLUDE_FILE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warning);
        assert!(LogLevel::Info < LogLevel::Debug);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [lexical]
            permissive_strings = true

            [logging]
            min_log_level = "debug"
            "#,
        )
        .unwrap();

        assert!(config.lexical.permissive_strings);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
        assert_eq!(
            config.scope.reject_name_collisions,
            ScopePreferences::default().reject_name_collisions
        );
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let result = RuntimeConfig::from_toml_str("[lexical]\npermissive_strings = \"maybe\"");
        assert_matches!(result, Err(ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "[scope]\nlog_scope_transitions = true\n").unwrap();

        let config = RuntimeConfig::load(&path).unwrap();
        assert!(config.scope.log_scope_transitions);

        let missing = RuntimeConfig::load(&dir.path().join("absent.toml"));
        assert_matches!(missing, Err(ConfigError::Unreadable { .. }));
    }

    #[test]
    fn test_toml_output_parses_back() {
        let config = RuntimeConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = RuntimeConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed.logging.min_log_level, config.logging.min_log_level);
    }
}
