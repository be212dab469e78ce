//! Source location tracking for the OneModel lexer
//!
//! A [`Position`] walks through the source one character at a time. Tokens
//! record a [`Span`] made of two position snapshots so diagnostics can point
//! back into the original text long after lexing has finished.
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// A named source text shared by every position created while lexing it.
#[derive(Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            text: text.into(),
        })
    }

    /// Get a line of text by 0-based line number, without its terminator
    pub fn line(&self, line: usize) -> Option<&str> {
        self.text
            .split('\n')
            .nth(line)
            .map(|l| l.trim_end_matches('\r'))
    }
}

/// A cursor into source text.
///
/// `index` counts characters consumed and is `-1` until the first call to
/// [`Position::advance`]. `line` and `column` are 0-based and are derived
/// from the newlines consumed so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub index: isize,
    pub line: usize,
    pub column: isize,
    source: Arc<SourceFile>,
}

impl Position {
    /// Create the sentinel position that precedes the first character
    pub fn new(source: Arc<SourceFile>) -> Self {
        Self {
            index: -1,
            line: 0,
            column: -1,
            source,
        }
    }

    /// Move one character forward. `previous` is the character being left
    /// behind, `None` for the initial advance onto the first character.
    pub fn advance(&mut self, previous: Option<char>) {
        self.index += 1;
        if previous == Some('\n') {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    /// Independent copy of this position. Advancing the original afterwards
    /// leaves the snapshot untouched.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    pub fn filename(&self) -> &str {
        &self.source.name
    }

    pub fn source_text(&self) -> &str {
        &self.source.text
    }

    pub fn source(&self) -> &Arc<SourceFile> {
        &self.source
    }

    /// Character index clamped to zero, for slicing
    pub fn offset(&self) -> usize {
        self.index.max(0) as usize
    }

    /// 1-based line number for humans
    pub fn display_line(&self) -> usize {
        self.line + 1
    }

    /// 1-based column number for humans
    pub fn display_column(&self) -> usize {
        self.offset_in_line() + 1
    }

    fn offset_in_line(&self) -> usize {
        self.column.max(0) as usize
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.filename(),
            self.display_line(),
            self.display_column()
        )
    }
}

// Serialized positions omit the shared source text.
impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Position", 4)?;
        state.serialize_field("index", &self.index)?;
        state.serialize_field("line", &self.line)?;
        state.serialize_field("column", &self.column)?;
        state.serialize_field("filename", self.filename())?;
        state.end()
    }
}

/// A span of source text from start (inclusive) to end (exclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start.index <= end.index, "Span start must not be after end");
        Self { start, end }
    }

    /// Zero-width span at a position
    pub fn point(pos: Position) -> Self {
        Self {
            end: pos.clone(),
            start: pos,
        }
    }

    /// Number of characters covered
    pub fn len(&self) -> usize {
        (self.end.index - self.start.index).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start.index == self.end.index
    }

    /// Source text covered by this span
    pub fn text(&self) -> String {
        self.start
            .source_text()
            .chars()
            .skip(self.start.offset())
            .take(self.len())
            .collect()
    }

    pub fn filename(&self) -> &str {
        self.start.filename()
    }

    /// Render a cargo-style excerpt with the span underlined.
    pub fn format_excerpt(&self) -> String {
        let line_no = self.start.display_line();
        let gutter = " ".repeat(line_no.to_string().len());
        let mut out = format!("{} --> {}\n", gutter, self.start);

        if let Some(line) = self.start.source().line(self.start.line) {
            let width = if self.start.line == self.end.line {
                self.len().max(1)
            } else {
                line.chars().count().saturating_sub(self.start.offset_in_line())
            };

            out.push_str(&format!("{} |\n", gutter));
            out.push_str(&format!("{} | {}\n", line_no, line));
            out.push_str(&format!(
                "{} | {}{}\n",
                gutter,
                " ".repeat(self.start.offset_in_line()),
                "^".repeat(width.max(1))
            ));
        }

        out
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.display_line(),
                self.start.display_column(),
                self.end.display_column()
            )
        } else {
            write!(
                f,
                "{}:{}-{}:{}",
                self.start.display_line(),
                self.start.display_column(),
                self.end.display_line(),
                self.end.display_column()
            )
        }
    }
}
