//! Per-file event collection and the cargo-style end-of-run report

use super::events::LogEvent;
use crate::config::compile_time::logging::MAX_LOG_EVENTS_PER_FILE;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
    pub start_time: Instant,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self {
            file_path,
            file_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_processing_time: Duration,
}

impl ProcessingSummary {
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Thread-safe store of the events recorded while each file was processed
pub struct ErrorCollector {
    file_events: Mutex<BTreeMap<PathBuf, Vec<LogEvent>>>,
    file_contexts: Mutex<BTreeMap<PathBuf, FileProcessingContext>>,
    processing_start: Instant,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            file_events: Mutex::new(BTreeMap::new()),
            file_contexts: Mutex::new(BTreeMap::new()),
            processing_start: Instant::now(),
        }
    }

    /// Record an event against a file. Past the per-file limit a single
    /// overflow warning is appended and later events are dropped.
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let mut events = lock(&self.file_events);
        let file_events = events.entry(file_path.to_path_buf()).or_default();

        if file_events.len() < MAX_LOG_EVENTS_PER_FILE {
            file_events.push(event);
        } else if file_events.len() == MAX_LOG_EVENTS_PER_FILE {
            file_events.push(LogEvent::warning(&format!(
                "Too many events for file (limit: {})",
                MAX_LOG_EVENTS_PER_FILE
            )));
        }
    }

    pub fn record_file_context(&self, context: FileProcessingContext) {
        // A file with no events still counts as processed
        lock(&self.file_events)
            .entry(context.file_path.clone())
            .or_default();
        lock(&self.file_contexts).insert(context.file_path.clone(), context);
    }

    pub fn file_elapsed(&self, file_path: &Path) -> Option<Duration> {
        lock(&self.file_contexts).get(file_path).map(|c| c.elapsed())
    }

    pub fn get_file_events(&self, file_path: &Path) -> Vec<LogEvent> {
        lock(&self.file_events)
            .get(file_path)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_file_errors(&self, file_path: &Path) -> Vec<LogEvent> {
        self.get_file_events(file_path)
            .into_iter()
            .filter(|e| e.is_error())
            .collect()
    }

    pub fn get_all_file_events(&self) -> BTreeMap<PathBuf, Vec<LogEvent>> {
        lock(&self.file_events).clone()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let events = lock(&self.file_events);
        let mut summary = ProcessingSummary {
            total_files: events.len(),
            total_processing_time: self.processing_start.elapsed(),
            ..ProcessingSummary::default()
        };

        for file_events in events.values() {
            let errors = file_events.iter().filter(|e| e.is_error()).count();
            let warnings = file_events.iter().filter(|e| e.is_warning()).count();

            if errors > 0 {
                summary.failed_files += 1;
            } else {
                summary.successful_files += 1;
            }
            summary.total_errors += errors;
            summary.total_warnings += warnings;
        }

        summary
    }

    pub fn clear(&self) {
        lock(&self.file_events).clear();
        lock(&self.file_contexts).clear();
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn push_context_lines(output: &mut String, event: &LogEvent) {
    for (key, value) in &event.context {
        if key != "file" && key != "file_id" {
            output.push_str(&format!("  = {}: {}\n", key, value));
        }
    }
}

/// Render every recorded error and warning the way cargo reports them
pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();

    for (file_path, events) in &collector.get_all_file_events() {
        let reportable: Vec<_> = events
            .iter()
            .filter(|e| e.is_error() || e.is_warning())
            .collect();
        if reportable.is_empty() {
            continue;
        }

        output.push_str(&format!("Checking {}...\n", file_path.display()));

        for event in reportable {
            let label = if event.is_error() { "error" } else { "warning" };
            output.push_str(&format!("{}[{}]: {}\n", label, event.code, event.message));

            match &event.span {
                Some(span) => output.push_str(&span.format_excerpt()),
                None => output.push_str(&format!("  --> {}\n", file_path.display())),
            }

            if event.is_error() {
                output.push_str(&format!(
                    "  = severity: {}, category: {}\n",
                    event.severity(),
                    event.category()
                ));
            }
            push_context_lines(&mut output, event);

            if event.is_error() {
                if let Some(metadata) = super::codes::get_error_metadata(event.code.as_str()) {
                    output.push_str(&format!("  = help: {}\n", metadata.recommended_action));
                }
            }
            output.push('\n');
        }
    }

    let summary = collector.get_summary();
    if summary.total_errors > 0 {
        output.push_str(&format!("Total errors: {}\n", summary.total_errors));
    }
    if summary.total_warnings > 0 {
        output.push_str(&format!("Total warnings: {}\n", summary.total_warnings));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_collector_groups_by_file() {
        let collector = ErrorCollector::new();
        let a = PathBuf::from("a.one");
        let b = PathBuf::from("b.one");

        collector.record_event(&a, LogEvent::error(codes::lexical::ILLEGAL_CHARACTER, "bad"));
        collector.record_event(&a, LogEvent::warning("odd"));
        collector.record_event(&b, LogEvent::info("fine"));

        assert_eq!(collector.get_file_errors(&a).len(), 1);
        assert_eq!(collector.get_file_events(&b).len(), 1);

        let summary = collector.get_summary();
        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.successful_files, 1);
        assert_eq!(summary.total_warnings, 1);
        assert!(summary.has_errors());
    }

    #[test]
    fn test_per_file_limit_appends_single_overflow_warning() {
        let collector = ErrorCollector::new();
        let path = PathBuf::from("big.one");
        for _ in 0..MAX_LOG_EVENTS_PER_FILE + 10 {
            collector.record_event(&path, LogEvent::info("x"));
        }

        let events = collector.get_file_events(&path);
        assert_eq!(events.len(), MAX_LOG_EVENTS_PER_FILE + 1);
        assert!(events.last().is_some_and(|e| e.is_warning()));
    }

    #[test]
    fn test_cargo_style_output() {
        let collector = ErrorCollector::new();
        let path = PathBuf::from("model.one");
        collector.record_event(
            &path,
            LogEvent::error(codes::scope::NAME_COLLISION, "Duplicate full name 'A__x'")
                .with_context("fullname", "A__x"),
        );

        let report = format_cargo_style_errors(&collector);
        assert!(report.contains("Checking model.one..."));
        assert!(report.contains("error[E062]: Duplicate full name 'A__x'"));
        assert!(report.contains("  = fullname: A__x"));
        assert!(report.contains("  = help: "));
        assert!(report.contains("Total errors: 1"));
    }

    #[test]
    fn test_clear() {
        let collector = ErrorCollector::new();
        collector.record_file_context(FileProcessingContext::new(PathBuf::from("m.one"), 0));
        assert_eq!(collector.get_summary().total_files, 1);

        collector.clear();
        assert_eq!(collector.get_summary().total_files, 0);
    }
}
