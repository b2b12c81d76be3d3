//! Error types for the multiline content model and its text codec.
//!
//! ## Error Categories
//!
//! - **Argument errors**: a null value handed to a field, or a name that does
//!   not match the field/tag naming rules
//! - **Ownership errors**: a field that already belongs to a collection
//! - **Read-only violations**: any mutation of a frozen snapshot
//! - **Format errors**: malformed notation, always with a 1-based line number
//! - **I/O errors**: reading or writing the byte stream around the codec
//!
//! Value conversions never produce an error; they return `None` instead.
//!
//! ## Examples
//!
//! ```rust
//! use mlc::{from_str, Error};
//!
//! let result = from_str("A: 1\n  b$d: 2");
//! match result {
//!     Err(Error::Format { line, .. }) => assert_eq!(line, 2),
//!     _ => panic!("expected a format error"),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// What kind of name failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Field,
    Tag,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Field => write!(f, "field"),
            NameKind::Tag => write!(f, "tag"),
        }
    }
}

/// Represents every failure the content model and codec can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A required argument was null (for example [`Value::Null`](crate::Value::Null)
    /// assigned as a field value)
    #[error("Argument '{0}' must not be null")]
    NullArgument(&'static str),

    /// A field or tag name does not match its naming rule
    #[error("Invalid {kind} name '{name}'")]
    InvalidName { kind: NameKind, name: String },

    /// The field is already owned by a collection
    #[error("Field '{0}' already belongs to a collection")]
    DuplicateOwnership(String),

    /// Adding the field would make it its own ancestor
    #[error("Field '{0}' cannot be added below itself")]
    CyclicOwnership(String),

    /// A mutator was called on a read-only snapshot
    #[error("The instance is read-only")]
    ReadOnly,

    /// Text that cannot be turned into a value of the requested kind
    #[error("Invalid {kind} value '{text}'")]
    InvalidValue { kind: &'static str, text: String },

    /// A positional argument was outside the collection
    #[error("Index {index} is out of range for a collection of {len} fields")]
    IndexOutOfRange { index: usize, len: usize },

    /// Malformed notation
    #[error("Format error at line {line}: {message}")]
    Format { line: usize, message: String },

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Free-form error, such as invalid UTF-8 input
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an invalid field name error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mlc::Error;
    ///
    /// let err = Error::invalid_field_name("a b");
    /// assert!(err.to_string().contains("'a b'"));
    /// ```
    pub fn invalid_field_name(name: &str) -> Self {
        Error::InvalidName {
            kind: NameKind::Field,
            name: name.to_string(),
        }
    }

    /// Creates an invalid tag name error.
    pub fn invalid_tag_name(name: &str) -> Self {
        Error::InvalidName {
            kind: NameKind::Tag,
            name: name.to_string(),
        }
    }

    /// Creates an invalid value error for the `Value::parse_*` constructors.
    pub fn invalid_value(kind: &'static str, text: &str) -> Self {
        Error::InvalidValue {
            kind,
            text: text.to_string(),
        }
    }

    /// Creates a format error. Only the first line of `message` is kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mlc::Error;
    ///
    /// let err = Error::format(7, "missing name\nsecond line");
    /// assert_eq!(err.to_string(), "Format error at line 7: missing name");
    /// ```
    pub fn format<T: fmt::Display>(line: usize, message: T) -> Self {
        let message = message.to_string();
        Error::Format {
            line,
            message: message.lines().next().unwrap_or_default().to_string(),
        }
    }

    /// Wraps a lower-level error with the line it was raised on.
    ///
    /// Format errors pass through untouched so nested parsers keep the
    /// innermost line number.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Error::Format { .. } => self,
            other => Error::format(line, other),
        }
    }

    /// Returns the line number of a format error.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Format { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for stream reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
