//! Error and success codes with their classification metadata
//!
//! Every event the core emits carries one of these codes. The registry maps
//! each error code to how it should be treated and what the user can do.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Stable identifier attached to every log event and diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
}

pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const TOO_MANY_LINES: Code = Code::new("E012");
}

pub mod lexical {
    use super::Code;

    pub const ILLEGAL_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E022");
    pub const STRING_TOO_LARGE: Code = Code::new("E023");
    pub const COMMENT_TOO_LONG: Code = Code::new("E024");
    pub const TOO_MANY_TOKENS: Code = Code::new("E025");
}

pub mod scope {
    use super::Code;

    pub const EMPTY_SCOPE: Code = Code::new("E060");
    pub const UNRESOLVED_NAME: Code = Code::new("E061");
    pub const NAME_COLLISION: Code = Code::new("E062");
    pub const FLATTEN_TOO_DEEP: Code = Code::new("E063");
    pub const FULLNAME_TOO_LONG: Code = Code::new("E064");
}

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const MODEL_INSTANTIATED: Code = Code::new("I060");
    pub const FLATTENING_COMPLETE: Code = Code::new("I061");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

use self::Severity::{Critical, High, Low, Medium};

#[rustfmt::skip]
const ERROR_TABLE: &[ErrorMetadata] = &[
    // System
    ErrorMetadata::new("ERR001", "System", Critical, false, true,
        "Internal consistency failure",
        "Report a bug with the input that triggered it"),
    ErrorMetadata::new("ERR002", "System", Critical, false, true,
        "Logging or runtime initialization failed",
        "Check ONEMODEL_* environment variables and the preferences file"),
    ErrorMetadata::new("ERR003", "System", High, false, true,
        "Runtime preferences could not be loaded",
        "Fix the preferences TOML file or remove the --config flag"),

    // File processing
    ErrorMetadata::new("E005", "FileProcessing", Medium, false, true,
        "Source file not found",
        "Check the path and that the file exists"),
    ErrorMetadata::new("E006", "FileProcessing", Low, false, true,
        "Source file does not have the .one extension",
        "Rename the file or unset ONEMODEL_REQUIRE_ONE_EXTENSION"),
    ErrorMetadata::new("E007", "FileProcessing", High, false, true,
        "Source file exceeds the configured size limit",
        "Split the model into smaller files"),
    ErrorMetadata::new("E008", "FileProcessing", Low, false, true,
        "Source file is empty",
        "Add model definitions to the file"),
    ErrorMetadata::new("E009", "FileProcessing", Medium, false, true,
        "Permission denied while reading source file",
        "Check file permissions"),
    ErrorMetadata::new("E010", "FileProcessing", Medium, false, true,
        "Source file is not valid UTF-8",
        "Re-save the file with UTF-8 encoding"),
    ErrorMetadata::new("E011", "FileProcessing", Medium, true, true,
        "I/O error while reading source file",
        "Retry, then check the file system"),
    ErrorMetadata::new("E012", "FileProcessing", High, false, true,
        "Source file has too many lines",
        "Split the model into smaller files"),

    // Lexical
    ErrorMetadata::new("E020", "Lexical", High, false, true,
        "Character not allowed in OneModel source",
        "Remove the character or place it inside a string literal"),
    ErrorMetadata::new("E021", "Lexical", High, false, true,
        "String literal is missing its closing quote",
        "Add the closing '\"'"),
    ErrorMetadata::new("E022", "Lexical", Medium, false, true,
        "Identifier exceeds the maximum length",
        "Use a shorter name"),
    ErrorMetadata::new("E023", "Lexical", Medium, false, true,
        "String literal exceeds the maximum size",
        "Shorten the string"),
    ErrorMetadata::new("E024", "Lexical", Low, false, true,
        "Comment exceeds the maximum length",
        "Split the comment over several lines"),
    ErrorMetadata::new("E025", "Lexical", High, false, true,
        "Source produces too many tokens",
        "Split the model into smaller files"),

    // Scope
    ErrorMetadata::new("E060", "Scope", Critical, false, true,
        "Scope stack used while empty",
        "Balance every push with a pop; prefer Scope::enter guards"),
    ErrorMetadata::new("E061", "Scope", Medium, true, false,
        "Name is not bound in any visible namespace",
        "Define the name before it is referenced"),
    ErrorMetadata::new("E062", "Scope", High, false, true,
        "Two entities flatten to the same full name",
        "Rename one of the entities or instances"),
    ErrorMetadata::new("E063", "Scope", High, false, true,
        "Model instances are nested deeper than the flattening limit",
        "Reduce sub-model nesting"),
    ErrorMetadata::new("E064", "Scope", Medium, false, true,
        "Flattened name exceeds the maximum length",
        "Use shorter instance names"),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| ERROR_TABLE.iter().map(|m| (m.code, m)).collect())
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code).copied()
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
