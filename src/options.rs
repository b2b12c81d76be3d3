//! Configuration options for writing notation text.
//!
//! - [`WriteOptions`]: main configuration struct
//! - [`LineEnding`]: line terminator written after every line
//!
//! ## Examples
//!
//! ```rust
//! use mlc::{fields, to_string_with_options, LineEnding, WriteOptions};
//!
//! let data = fields! { "Server" => { "Port" => 8080 } };
//!
//! let options = WriteOptions::new().with_indent(2);
//! assert_eq!(to_string_with_options(&data, &options), "Server:\n  Port: 8080\n");
//!
//! let options = WriteOptions::new().with_line_ending(LineEnding::CrLf);
//! assert!(to_string_with_options(&data, &options).ends_with("8080\r\n"));
//! ```

use serde::{Deserialize, Serialize};

/// Line terminator choice.
///
/// # Examples
///
/// ```rust
/// use mlc::LineEnding;
///
/// assert_eq!(LineEnding::Lf.as_str(), "\n");
/// assert_eq!(LineEnding::CrLf.as_str(), "\r\n");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Configuration options for the serializer.
///
/// Hosts can load these from their own configuration files since the struct
/// implements serde's traits.
///
/// # Examples
///
/// ```rust
/// use mlc::{LineEnding, WriteOptions};
///
/// let options = WriteOptions::new();
/// assert_eq!(options.indent, 4);
/// assert_eq!(options.line_ending, LineEnding::Lf);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// Spaces per nesting level. The serializer treats 0 as 1.
    pub indent: usize,
    pub line_ending: LineEnding,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            indent: 4,
            line_ending: LineEnding::default(),
        }
    }
}

impl WriteOptions {
    /// Creates default options (4-space indent, `\n` line endings).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of spaces per nesting level, at least 1.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mlc::WriteOptions;
    ///
    /// let options = WriteOptions::new().with_indent(2);
    /// assert_eq!(options.indent, 2);
    /// assert_eq!(WriteOptions::new().with_indent(0).indent, 1);
    /// ```
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.max(1);
        self
    }

    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }
}
