//! Logging service and the sinks it can write to

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use std::sync::{Arc, Mutex, MutexGuard};

pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Level filter in front of a single [`Logger`]
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Build the sink selected by the runtime logging preferences
    pub fn with_config() -> Self {
        let min_level = config::get_min_log_level();
        let echo = config::console_logging_enabled();
        let logger: Arc<dyn Logger> = if config::use_structured_logging() {
            Arc::new(StructuredLogger::new(echo))
        } else {
            Arc::new(ConsoleLogger::new(echo))
        };

        Self::new(logger, min_level)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }

    pub fn log_error(&self, code: Code, message: &str) {
        self.log_event(LogEvent::error(code, message));
    }

    pub fn log_success(&self, code: Code, message: &str) {
        self.log_event(LogEvent::success(code, message));
    }

    pub fn log_info(&self, message: &str) {
        self.log_event(LogEvent::info(message));
    }

    pub fn log_debug(&self, message: &str) {
        self.log_event(LogEvent::debug(message));
    }
}

/// Human readable lines. Errors always go to stderr; everything else is
/// printed only when console echo is enabled.
pub struct ConsoleLogger {
    echo_non_errors: bool,
}

impl ConsoleLogger {
    pub fn new(echo_non_errors: bool) -> Self {
        Self { echo_non_errors }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        match event.level {
            LogLevel::Error => eprintln!("{}", event.format()),
            _ if self.echo_non_errors => println!("{}", event.format()),
            _ => {}
        }
    }
}

/// One JSON object per line for tooling
pub struct StructuredLogger {
    echo_non_errors: bool,
}

impl StructuredLogger {
    pub fn new(echo_non_errors: bool) -> Self {
        Self { echo_non_errors }
    }
}

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        let line = event.format_json().unwrap_or_else(|_| event.format());
        match event.level {
            LogLevel::Error => eprintln!("{}", line),
            _ if self.echo_non_errors => println!("{}", line),
            _ => {}
        }
    }
}

/// Bounded in-memory sink, used by tests to assert on emitted events.
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
    capacity: usize,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::with_capacity(config::get_error_buffer_size())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.lock().clone()
    }

    pub fn event_count(&self) -> usize {
        self.lock().len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn get_errors(&self) -> Vec<LogEvent> {
        self.lock().iter().filter(|e| e.is_error()).cloned().collect()
    }

    pub fn has_error_with_code(&self, code: Code) -> bool {
        self.lock().iter().any(|e| e.is_error() && e.code == code)
    }

    pub fn has_success_with_code(&self, code: Code) -> bool {
        self.lock().iter().any(|e| e.is_info() && e.code == code)
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = self.lock();
        // Drop the oldest events once full
        if events.len() >= self.capacity {
            let excess = events.len() + 1 - self.capacity;
            events.drain(0..excess);
        }
        events.push(event.clone());
    }
}

// Lets a test keep a handle on the MemoryLogger it installs.
impl<L: Logger> Logger for Arc<L> {
    fn log(&self, event: &LogEvent) {
        self.as_ref().log(event)
    }
}

pub fn create_configured_service() -> LoggingService {
    LoggingService::with_config()
}
