//! # mlc
//!
//! Multiline content notation: an indentation-based text format for trees of
//! named, tagged fields, together with a typed value model.
//!
//! ## What is it?
//!
//! A document is a list of fields, one per line. Every field has a name and
//! holds either a value or nested subfields:
//!
//! ```text
//! .Version: 2
//! Server [Required]:
//!     Host: example.org
//!     Port: 8080
//! ```
//!
//! See [`notation`] for the full format reference.
//!
//! ## Key Features
//!
//! - **Tree model**: [`Field`] and [`FieldCollection`] with exclusive
//!   ownership, case-insensitive path lookup (`"Server/Port"`) and change
//!   handlers
//! - **Typed values**: [`Value`] covers integers, floats, text, bytes, dates,
//!   durations, IP addresses and [`Size`]s, with a total conversion matrix
//!   that reports failure as `None` instead of erroring
//! - **Tags**: boolean flags per field, see [`Tag`] and [`TagCollection`]
//! - **Stable output**: writing a parsed document and parsing it again
//!   reproduces it exactly
//! - **Serde compatible**: [`Value`] and [`FieldCollection`] implement
//!   `Serialize` and `Deserialize`
//!
//! ## Quick Start
//!
//! ```rust
//! use mlc::{from_str, to_string};
//!
//! let text = "Server:\n    Host: example.org\n    Port: 8080\n";
//! let fields = from_str(text).unwrap();
//!
//! let port = fields.get_path("server/port").unwrap();
//! assert_eq!(port.as_u16(), Some(8080));
//!
//! fields.set_path("Server/Tls", true).unwrap();
//! assert_eq!(
//!     to_string(&fields),
//!     "Server:\n    Host: example.org\n    Port: 8080\n    Tls: true\n"
//! );
//! ```
//!
//! ### Building Trees
//!
//! ```rust
//! use mlc::{fields, Tag};
//!
//! let fields = fields! {
//!     "Name" => "demo",
//!     "Limits" => { "Memory" => "2Gi" },
//! };
//!
//! let memory = fields.get_path("Limits/Memory").unwrap();
//! assert_eq!(memory.as_size().map(|s| s.count()), Some(2u64 << 30));
//!
//! let name = fields.find_first("name").unwrap();
//! name.add_tag(Tag::new("Required", true).unwrap()).unwrap();
//! assert!(name.has_tag("required"));
//! ```
//!
//! ### Error Handling
//!
//! Parse errors carry the 1-based line they occurred on:
//!
//! ```rust
//! use mlc::{from_str, Error};
//!
//! match from_str("A: 1\nB C: 2\n") {
//!     Err(Error::Format { line, .. }) => assert_eq!(line, 2),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

pub mod collection;
pub mod convert;
pub mod de;
pub mod error;
pub mod field;
pub mod macros;
pub mod notation;
pub mod options;
pub mod section;
pub mod ser;
pub mod size;
pub mod tag;
pub mod value;

pub use collection::{FieldCollection, Paths};
pub use de::Parser;
pub use error::{Error, NameKind, Result};
pub use field::Field;
pub use options::{LineEnding, WriteOptions};
pub use section::{parse_sections, write_sections, Section};
pub use ser::Serializer;
pub use size::Size;
pub use tag::{Tag, TagCollection};
pub use value::{Value, ValueKind};

use std::io;

/// Writes `fields` as notation text with default options.
///
/// # Examples
///
/// ```rust
/// use mlc::{fields, to_string};
///
/// assert_eq!(to_string(&fields! { "A" => 1 }), "A: 1\n");
/// ```
#[must_use]
pub fn to_string(fields: &FieldCollection) -> String {
    to_string_with_options(fields, &WriteOptions::default())
}

/// Writes `fields` as notation text with custom options.
#[must_use]
pub fn to_string_with_options(fields: &FieldCollection, options: &WriteOptions) -> String {
    let mut serializer = Serializer::new(options.clone());
    serializer.write_fields(fields);
    serializer.into_inner()
}

/// Writes `fields` to a writer as UTF-8 notation text.
///
/// # Examples
///
/// ```rust
/// use mlc::{fields, to_writer};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &fields! { "A" => "x" }).unwrap();
/// assert_eq!(buffer, b"A: x\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
pub fn to_writer<W>(writer: W, fields: &FieldCollection) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, fields, &WriteOptions::default())
}

/// Writes `fields` to a writer with custom options.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
pub fn to_writer_with_options<W>(
    mut writer: W,
    fields: &FieldCollection,
    options: &WriteOptions,
) -> Result<()>
where
    W: io::Write,
{
    let text = to_string_with_options(fields, options);
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Parses notation text.
///
/// # Examples
///
/// ```rust
/// use mlc::{from_str, Value};
///
/// let fields = from_str("A:\n  B: 1\n").unwrap();
/// assert_eq!(fields.get_path("A/B"), Some(Value::from("1")));
/// ```
///
/// # Errors
///
/// Returns [`Error::Format`] with the offending line number.
pub fn from_str(s: &str) -> Result<FieldCollection> {
    Parser::new(s).parse()
}

/// Parses notation text from UTF-8 bytes, skipping a byte order mark.
///
/// # Examples
///
/// ```rust
/// use mlc::{from_slice, Value};
///
/// let fields = from_slice(b"\xEF\xBB\xBFA: 1").unwrap();
/// assert_eq!(fields.get_path("A"), Some(Value::from("1")));
/// ```
///
/// # Errors
///
/// Returns [`Error::Custom`] for invalid UTF-8, otherwise as [`from_str`].
pub fn from_slice(v: &[u8]) -> Result<FieldCollection> {
    let v = v.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(v);
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(format!("Invalid UTF-8: {}", e)))?;
    from_str(s)
}

/// Parses notation text from an I/O stream.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, otherwise as [`from_slice`].
pub fn from_reader<R>(mut reader: R) -> Result<FieldCollection>
where
    R: io::Read,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reader_writer_round_trip() {
        let fields = fields! { "A" => { "B" => " x " }, "C" => 3 };
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &fields).unwrap();

        let back = from_reader(Cursor::new(buffer)).unwrap();
        assert_eq!(back.get_path("A/B"), Some(Value::from(" x ")));
        assert_eq!(back.get_path("C"), Some(Value::from("3")));
    }

    #[test]
    fn test_from_slice_rejects_invalid_utf8() {
        assert!(matches!(from_slice(&[0x41, 0x3a, 0xff]), Err(Error::Custom(_))));
    }

    #[test]
    fn test_writer_with_options() {
        let mut buffer = Vec::new();
        let options = WriteOptions::new().with_line_ending(LineEnding::CrLf);
        to_writer_with_options(&mut buffer, &fields! { "A" => 1 }, &options).unwrap();
        assert_eq!(buffer, b"A: 1\r\n");
    }
}
