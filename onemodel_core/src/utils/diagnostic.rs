//! Error reports handed to whatever presents problems to the user.

use super::span::{Position, Span};
use crate::logging::codes::{self, Code};
use serde::Serialize;
use std::fmt;

/// An `(error_kind, message, position)` triple plus the stable error code.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub code: Code,
    pub kind: &'static str,
    pub message: String,
    pub position: Position,
    #[serde(skip)]
    span: Option<Span>,
}

impl Diagnostic {
    pub fn new(code: Code, kind: &'static str, message: impl Into<String>, position: Position) -> Self {
        Self {
            code,
            kind,
            message: message.into(),
            position,
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn span(&self) -> Span {
        self.span
            .clone()
            .unwrap_or_else(|| Span::point(self.position.clone()))
    }

    /// Cargo-style rendering with the offending source underlined
    pub fn render(&self) -> String {
        let mut out = format!("error[{}]: {}\n", self.code, self.message);
        out.push_str(&self.span().format_excerpt());

        if let Some(metadata) = codes::get_error_metadata(self.code.as_str()) {
            out.push_str(&format!("  = help: {}\n", metadata.recommended_action));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) at {}: {}", self.kind, self.code, self.position, self.message)
    }
}
