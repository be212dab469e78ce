//! Global logging for the OneModel core
//!
//! A process-wide [`LoggingService`] writes events as they happen while an
//! [`ErrorCollector`] groups them by the file being processed, so a run can
//! finish with a cargo-style report. Logging before initialization is a
//! silent no-op, which keeps library users and unit tests free of setup.

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use crate::utils::Span;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use collector::{ErrorCollector, FileProcessingContext, ProcessingSummary};
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();
static GLOBAL_ERROR_COLLECTOR: OnceLock<Arc<ErrorCollector>> = OnceLock::new();

thread_local! {
    static FILE_CONTEXT: RefCell<Option<FileProcessingContext>> = const { RefCell::new(None) };
    static LOCAL_LOGGER: RefCell<Option<Arc<LoggingService>>> = const { RefCell::new(None) };
}

/// Initialize the global logger from the runtime logging preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(service::create_configured_service());
    install(logging_service.clone())?;

    for code in ["ERR001", "E005", "E020", "E021", "E060"] {
        if codes::get_error_metadata(code).is_none() {
            return Err(format!("Missing metadata for error code: {}", code));
        }
    }

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Initialize with a caller-supplied service, mostly for tests
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    install(service)
}

fn install(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized")?;
    GLOBAL_ERROR_COLLECTOR
        .set(Arc::new(ErrorCollector::new()))
        .map_err(|_| "Global error collector already initialized")?;
    Ok(())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some() && GLOBAL_ERROR_COLLECTOR.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    GLOBAL_ERROR_COLLECTOR.get().map(|collector| collector.as_ref())
}

/// Mark the current thread as processing `file_path`
pub fn set_file_context(file_path: PathBuf, file_id: usize) {
    let context = FileProcessingContext::new(file_path, file_id);

    if let Some(collector) = try_get_global_error_collector() {
        collector.record_file_context(context.clone());
    }

    FILE_CONTEXT.with(|ctx| *ctx.borrow_mut() = Some(context));
}

pub fn clear_file_context() {
    FILE_CONTEXT.with(|ctx| *ctx.borrow_mut() = None);
}

struct FileContextGuard;

impl Drop for FileContextGuard {
    fn drop(&mut self) {
        clear_file_context();
    }
}

/// Run `f` with a file context installed. The context is cleared again even
/// if `f` unwinds.
pub fn with_file_context<F, R>(file_path: PathBuf, file_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_file_context(file_path, file_id);
    let _guard = FileContextGuard;
    f()
}

struct LocalLoggerGuard(Option<Arc<LoggingService>>);

impl Drop for LocalLoggerGuard {
    fn drop(&mut self) {
        let previous = self.0.take();
        LOCAL_LOGGER.with(|logger| *logger.borrow_mut() = previous);
    }
}

/// Route events raised on this thread to `service` while `f` runs, instead
/// of the global logger. The previous routing is restored afterwards.
pub fn with_local_logger<F, R>(service: Arc<LoggingService>, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = LOCAL_LOGGER.with(|logger| logger.borrow_mut().replace(service));
    let _guard = LocalLoggerGuard(previous);
    f()
}

fn local_logger() -> Option<Arc<LoggingService>> {
    LOCAL_LOGGER.with(|logger| logger.borrow().clone())
}

/// Whether a debug event raised here would reach a logger
pub fn debug_enabled() -> bool {
    match local_logger() {
        Some(service) => service.should_log(LogLevel::Debug),
        None => config::get_min_log_level() >= LogLevel::Debug,
    }
}

pub fn get_current_file_context() -> Option<FileProcessingContext> {
    FILE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

fn attach_context(mut event: LogEvent, context: Vec<(&str, String)>) -> LogEvent {
    for (key, value) in context {
        event = event.with_context(key, &value);
    }

    if config::include_file_context() {
        if let Some(file_ctx) = get_current_file_context() {
            event = event
                .with_context("file", &file_ctx.file_path.display().to_string())
                .with_context("file_id", &file_ctx.file_id.to_string());
        }
    }

    event
}

/// Send an event to the global logger and, when it is a warning or error
/// raised inside a file context, to that file's collected events.
fn dispatch(event: LogEvent) {
    let collect = event.is_error() || event.is_warning();

    if let Some(local) = local_logger() {
        local.log_event(event.clone());
    } else if let Some(logger) = try_get_global_logger() {
        logger.log_event(event.clone());
    }

    if collect {
        if let (Some(file_ctx), Some(collector)) =
            (get_current_file_context(), try_get_global_error_collector())
        {
            collector.record_event(&file_ctx.file_path, event);
        }
    }
}

/// Backing function for [`log_error!`](crate::log_error)
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<Span>,
    context: Vec<(&str, String)>,
) {
    let mut event = LogEvent::error(code, message);
    if let Some(span) = span {
        event = event.with_span(span);
    }
    dispatch(attach_context(event, context));
}

/// Backing function for [`log_success!`](crate::log_success)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, String)>) {
    dispatch(attach_context(LogEvent::success(code, message), context));
}

/// Backing function for the level-only macros
pub fn log_with_context(event: LogEvent, context: Vec<(&str, String)>) {
    dispatch(attach_context(event, context));
}

/// Record an already-built event, such as a lexer diagnostic carrying a span
pub fn log_event(event: LogEvent) {
    dispatch(attach_context(event, Vec::new()));
}

pub fn get_processing_summary() -> ProcessingSummary {
    try_get_global_error_collector()
        .map(|collector| collector.get_summary())
        .unwrap_or_default()
}

pub fn get_file_errors(file_path: &Path) -> Vec<LogEvent> {
    try_get_global_error_collector()
        .map(|collector| collector.get_file_errors(file_path))
        .unwrap_or_default()
}

pub fn print_cargo_style_summary() {
    if let Some(collector) = try_get_global_error_collector() {
        eprint!("{}", collector::format_cargo_style_errors(collector));
    }
}

pub fn clear_error_collection() {
    if let Some(collector) = try_get_global_error_collector() {
        collector.clear();
    }
}

/// Log an error even when the global logger was never set up
pub fn safe_log_error(code: Code, message: &str) {
    match try_get_global_logger() {
        Some(logger) => logger.log_event(LogEvent::error(code, message)),
        None => eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_context_management() {
        let file_path = PathBuf::from("test.one");

        assert!(get_current_file_context().is_none());

        set_file_context(file_path.clone(), 1);
        let context = get_current_file_context();
        assert_eq!(context.map(|c| c.file_path), Some(file_path));

        clear_file_context();
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_with_file_context() {
        let file_path = PathBuf::from("test.one");

        let result = with_file_context(file_path.clone(), 2, || {
            let context = get_current_file_context().expect("context installed");
            assert_eq!(context.file_path, file_path);
            assert_eq!(context.file_id, 2);
            42
        });

        assert_eq!(result, 42);
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_file_context_cleared_after_panic() {
        let outcome = std::panic::catch_unwind(|| {
            with_file_context(PathBuf::from("boom.one"), 3, || panic!("boom"))
        });

        assert!(outcome.is_err());
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_context_attached_to_events() {
        let event = with_file_context(PathBuf::from("ctx.one"), 4, || {
            attach_context(
                LogEvent::error(codes::scope::UNRESOLVED_NAME, "missing"),
                vec![("name", "x".to_string())],
            )
        });

        assert_eq!(event.context.get("name").map(String::as_str), Some("x"));
        assert_eq!(event.context.get("file").map(String::as_str), Some("ctx.one"));
        assert_eq!(event.context.get("file_id").map(String::as_str), Some("4"));
    }

    #[test]
    fn test_local_logger_receives_events() {
        let memory = Arc::new(MemoryLogger::with_capacity(10));
        let service = Arc::new(LoggingService::new(memory.clone(), LogLevel::Debug));

        with_local_logger(service, || {
            assert!(debug_enabled());
            crate::log_debug!("Scope push", "depth" => 1);
            crate::log_error!(codes::scope::EMPTY_SCOPE, "empty");
        });
        crate::log_debug!("not routed");

        let messages: Vec<_> = memory.get_events().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, ["Scope push", "empty"]);
        assert!(memory.has_error_with_code(codes::scope::EMPTY_SCOPE));
    }

    #[test]
    fn test_safe_logging_without_init() {
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
    }
}
