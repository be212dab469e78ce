//! Log events emitted by the OneModel core

use super::codes::{self, Code};
use crate::utils::Span;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;

pub use crate::config::runtime::LogLevel;

pub const GENERIC_WARNING: Code = Code::new("W000");
pub const GENERIC_INFO: Code = Code::new("I000");
pub const GENERIC_DEBUG: Code = Code::new("D000");

#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    pub span: Option<Span>,
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    fn build(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code,
            message: message.to_string(),
            span: None,
            context: BTreeMap::new(),
        }
    }

    pub fn error(code: Code, message: &str) -> Self {
        Self::build(LogLevel::Error, code, message)
    }

    pub fn warning(message: &str) -> Self {
        Self::build(LogLevel::Warning, GENERIC_WARNING, message)
    }

    pub fn warning_with_code(code: Code, message: &str) -> Self {
        Self::build(LogLevel::Warning, code, message)
    }

    pub fn info(message: &str) -> Self {
        Self::build(LogLevel::Info, GENERIC_INFO, message)
    }

    /// Info-level event carrying a success code
    pub fn success(code: Code, message: &str) -> Self {
        Self::build(LogLevel::Info, code, message)
    }

    pub fn debug(message: &str) -> Self {
        Self::build(LogLevel::Debug, GENERIC_DEBUG, message)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn is_info(&self) -> bool {
        self.level == LogLevel::Info
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.code.as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.code.as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.code.as_str())
    }

    pub fn description(&self) -> &'static str {
        codes::get_description(self.code.as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.code.as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.code.as_str())
    }

    /// `[ERROR] E020 - Illegal character '@' at 2:5`
    pub fn format(&self) -> String {
        let location = self
            .span
            .as_ref()
            .map(|s| {
                format!(
                    " at {}:{}",
                    s.start.display_line(),
                    s.start.display_column()
                )
            })
            .unwrap_or_default();

        format!(
            "[{}] {} - {}{}",
            self.level.as_str(),
            self.code,
            self.message,
            location
        )
    }

    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            "level": self.level.as_str(),
            "code": self.code.as_str(),
            "message": self.message,
            "category": self.category(),
            "severity": self.severity(),
        });

        if self.is_error() {
            json["error_metadata"] = serde_json::json!({
                "recoverable": self.is_recoverable(),
                "requires_halt": self.requires_halt(),
                "description": self.description(),
                "recommended_action": self.recommended_action(),
            });
        }

        if let Some(span) = &self.span {
            json["span"] = serde_json::json!({
                "file": span.filename(),
                "start_line": span.start.display_line(),
                "start_column": span.start.display_column(),
                "end_line": span.end.display_line(),
                "end_column": span.end.display_column(),
            });
        }

        if !self.context.is_empty() {
            json["context"] = serde_json::to_value(&self.context)?;
        }

        serde_json::to_string(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::utils::{Position, SourceFile};

    #[test]
    fn test_error_event_metadata() {
        let event = LogEvent::error(codes::scope::EMPTY_SCOPE, "pop on empty scope");

        assert!(event.is_error());
        assert_eq!(event.code.as_str(), "E060");
        assert_eq!(event.category(), "Scope");
        assert_eq!(event.severity(), "Critical");
        assert!(event.requires_halt());
    }

    #[test]
    fn test_generic_codes() {
        assert_eq!(LogEvent::warning("w").code, GENERIC_WARNING);
        assert_eq!(LogEvent::info("i").code, GENERIC_INFO);
        assert_eq!(LogEvent::debug("d").level, LogLevel::Debug);
    }

    #[test]
    fn test_format_includes_human_location() {
        let mut pos = Position::new(SourceFile::new("m.one", "x @"));
        pos.advance(None);
        pos.advance(Some('x'));
        pos.advance(Some(' '));
        let event = LogEvent::error(codes::lexical::ILLEGAL_CHARACTER, "Illegal character '@'")
            .with_span(Span::point(pos));

        assert_eq!(
            event.format(),
            "[ERROR] E020 - Illegal character '@' at 1:3"
        );
    }

    #[test]
    fn test_json_formatting() {
        let event = LogEvent::error(codes::file_processing::PERMISSION_DENIED, "Access denied")
            .with_context("file", "model.one");

        let json: serde_json::Value = serde_json::from_str(&event.format_json().unwrap()).unwrap();
        assert_eq!(json["level"], "ERROR");
        assert_eq!(json["code"], "E009");
        assert_eq!(json["context"]["file"], "model.one");
        assert_eq!(json["error_metadata"]["requires_halt"], true);
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}
