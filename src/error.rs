//! Error types and source context for key/value parsing
//!
//! Every error produced while scanning carries the byte offset the scanner
//! was looking at when the rule was violated. Offsets always index a real
//! character of the input: failures caused by running out of input point at
//! the last character instead of one past the end.

use std::fmt;
use thiserror::Error;

/// Main error type for the typed (serde) entry points
#[derive(Debug, Error)]
pub enum KvError {
    /// The input was not a well-formed key/value line
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The parsed pairs could not be converted into the requested type
    #[error("Serde error: {0}")]
    Serde(#[from] SerdeError),
}

/// Errors raised by the scanner and the key validation step
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A key had to start here but the character is not a key character
    #[error("Missing key at position {position}")]
    MissingKey { position: usize },

    /// A key was followed by something other than `=`
    #[error("Missing assignment operator at position {position}")]
    MissingAssignmentOperator { position: usize },

    /// Input ended after a key, before any `=`
    #[error("Incomplete key value pair at position {position}")]
    IncompleteKeyValuePair { position: usize },

    /// Input ended right after `=`
    #[error("Missing value for key '{key}' at position {position}")]
    MissingValue { key: String, position: usize },

    /// A quoted value was never closed
    #[error("Missing end quote for key '{key}' at position {position}")]
    MissingEndQuote { key: String, position: usize },

    /// A well-formed pair used a key the active policy rejects
    #[error("Invalid key '{invalid_key}' at position {position}")]
    InvalidKey { invalid_key: String, position: usize },

    /// A key appeared twice while duplicates are configured as errors
    #[error("Duplicate key '{key}' at position {position}")]
    DuplicateKey { key: String, position: usize },
}

impl ParseError {
    /// Byte offset of the character the error refers to
    pub fn position(&self) -> usize {
        match self {
            ParseError::MissingKey { position }
            | ParseError::MissingAssignmentOperator { position }
            | ParseError::IncompleteKeyValuePair { position }
            | ParseError::MissingValue { position, .. }
            | ParseError::MissingEndQuote { position, .. }
            | ParseError::InvalidKey { position, .. }
            | ParseError::DuplicateKey { position, .. } => *position,
        }
    }

    /// The key attached to a tokenizer error, if the scanner had one
    ///
    /// Only the value-stage errors know their key. [`ParseError::InvalidKey`]
    /// reports through [`ParseError::invalid_key`] instead.
    pub fn key(&self) -> Option<&str> {
        match self {
            ParseError::MissingValue { key, .. }
            | ParseError::MissingEndQuote { key, .. }
            | ParseError::DuplicateKey { key, .. } => Some(key),
            _ => None,
        }
    }

    /// The rejected key of a validation failure
    pub fn invalid_key(&self) -> Option<&str> {
        match self {
            ParseError::InvalidKey { invalid_key, .. } => Some(invalid_key),
            _ => None,
        }
    }

    /// Short kind name, stable across message wording changes
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParseError::MissingKey { .. } => "missing key",
            ParseError::MissingAssignmentOperator { .. } => "missing assignment operator",
            ParseError::IncompleteKeyValuePair { .. } => "incomplete key value pair",
            ParseError::MissingValue { .. } => "missing value",
            ParseError::MissingEndQuote { .. } => "missing end quote",
            ParseError::InvalidKey { .. } => "invalid key",
            ParseError::DuplicateKey { .. } => "duplicate key",
        }
    }

    /// Suggestion shown beneath the source snippet
    pub fn help(&self) -> String {
        match self {
            ParseError::MissingKey { .. } => {
                "Keys may only contain ASCII letters, digits and underscores".to_string()
            }
            ParseError::MissingAssignmentOperator { .. } => {
                "Separate the key from its value with '='".to_string()
            }
            ParseError::IncompleteKeyValuePair { .. } => {
                "Add '=' and a value after the key".to_string()
            }
            ParseError::MissingValue { key, .. } => {
                format!("Give '{}' a value, or use \"\" for an empty one", key)
            }
            ParseError::MissingEndQuote { .. } => {
                "Close the quoted value with a matching '\"'".to_string()
            }
            ParseError::InvalidKey { invalid_key, .. } => {
                format!("'{}' is not one of the accepted keys", invalid_key)
            }
            ParseError::DuplicateKey { key, .. } => {
                format!("Remove the repeated assignment to '{}'", key)
            }
        }
    }

    /// Attaches the offending input so the error can be rendered with a caret
    pub fn with_source_context(self, source: &str) -> ErrorContext {
        ErrorContext::new(source.to_string(), self)
    }
}

/// Serde integration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeError {
    /// Custom serde error message
    #[error("{0}")]
    Custom(String),

    /// A string value could not be read as the requested type
    #[error("Invalid value '{value}' for key '{key}': expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}

impl serde::de::Error for SerdeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        SerdeError::Custom(msg.to_string())
    }
}

impl serde::de::Error for KvError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        KvError::Serde(SerdeError::Custom(msg.to_string()))
    }
}

/// A parse error paired with the input it was raised for
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// The input line that failed to parse
    pub source: String,
    /// The error being reported
    pub error: ParseError,
}

impl ErrorContext {
    /// Creates a new error context
    pub fn new(source: String, error: ParseError) -> Self {
        Self { source, error }
    }

    /// Renders the input with a caret under the error position
    ///
    /// The caret column counts characters, not bytes, so it lines up in a
    /// terminal even when values contain multi-byte text.
    pub fn source_snippet(&self) -> String {
        let position = self.error.position().min(self.source.len());
        let column = self
            .source
            .char_indices()
            .take_while(|(offset, _)| *offset < position)
            .count();

        format!("  | {}\n  | {}^\n", self.source, " ".repeat(column))
    }

    /// The character at the error position, if there is one
    pub fn error_char(&self) -> Option<char> {
        self.source
            .get(self.error.position()..)
            .and_then(|rest| rest.chars().next())
    }

    /// Full multi-line rendering: header, snippet and help
    pub fn format_error(&self) -> String {
        let mut output = format!(
            "Error at position {}: {}\n",
            self.error.position(),
            self.error
        );
        output.push('\n');
        output.push_str(&self.source_snippet());
        output.push_str(&format!("\nHelp: {}\n", self.error.help()));
        output
    }

    /// One-line rendering for logs
    pub fn format_compact(&self) -> String {
        match self.error_char() {
            Some(ch) => format!("{} (near '{}')", self.error, ch),
            None => self.error.to_string(),
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_error())
    }
}

impl std::error::Error for ErrorContext {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
