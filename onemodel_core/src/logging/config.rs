//! Logging configuration: compile-time buffer limits plus user preferences

use super::events::LogLevel;
use crate::config::compile_time::logging::{LOG_BUFFER_SIZE, MAX_LOG_EVENTS_PER_FILE};
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install preferences once, before the global service is created.
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime logging preferences already initialized".to_string())
}

fn preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES.get().cloned().unwrap_or_default()
}

pub fn get_min_log_level() -> LogLevel {
    preferences().min_log_level
}

pub fn use_structured_logging() -> bool {
    preferences().use_structured_logging
}

pub fn console_logging_enabled() -> bool {
    preferences().enable_console_logging
}

pub fn use_cargo_style_output() -> bool {
    preferences().enable_cargo_style_output
}

pub fn include_file_context() -> bool {
    preferences().include_file_context
}

pub fn get_error_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

pub fn get_max_log_events_per_file() -> usize {
    MAX_LOG_EVENTS_PER_FILE
}

pub fn validate_config() -> Result<(), String> {
    if !(100..=100_000).contains(&LOG_BUFFER_SIZE) {
        return Err(format!(
            "LOG_BUFFER_SIZE must be between 100 and 100000, got {}",
            LOG_BUFFER_SIZE
        ));
    }
    if MAX_LOG_EVENTS_PER_FILE == 0 || MAX_LOG_EVENTS_PER_FILE > LOG_BUFFER_SIZE {
        return Err(format!(
            "MAX_LOG_EVENTS_PER_FILE must be within 1..={}, got {}",
            LOG_BUFFER_SIZE, MAX_LOG_EVENTS_PER_FILE
        ));
    }
    Ok(())
}

pub fn get_config_summary() -> String {
    let prefs = preferences();
    format!(
        "Logging configuration ({})\n  min level: {}\n  structured: {}\n  buffer: {} events, {} per file\n",
        crate::config::build_info::source_info(),
        prefs.min_log_level.as_str(),
        prefs.use_structured_logging,
        LOG_BUFFER_SIZE,
        MAX_LOG_EVENTS_PER_FILE
    )
}
