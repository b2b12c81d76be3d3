//! Notation serialization.
//!
//! This module provides the [`Serializer`] that writes a
//! [`FieldCollection`] as notation text.
//!
//! ## Overview
//!
//! Every field becomes one line:
//!
//! - **Container fields**: `name [tags]:` followed by the subfields one
//!   level deeper
//! - **Value fields**: `name [tags]: value`
//! - **Escaping**: leading and trailing spaces are written as `\_`, and
//!   control characters, `\` and `[` are backslash-escaped, so parsing the
//!   output yields the same value
//!
//! ## Usage
//!
//! Most users should use the functions in the crate root:
//!
//! ```rust
//! use mlc::{fields, to_string};
//!
//! let data = fields! { "A" => " padded ", "B" => { "C" => true } };
//! assert_eq!(to_string(&data), "A: \\_padded\\_\nB:\n    C: true\n");
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use mlc::{fields, Serializer, WriteOptions};
//!
//! let mut serializer = Serializer::new(WriteOptions::new().with_indent(1));
//! serializer.write_fields(&fields! { "A" => { "B" => 1 } });
//! assert_eq!(serializer.into_inner(), "A:\n B: 1\n");
//! ```

use crate::{Field, FieldCollection, WriteOptions};

/// The notation serializer.
pub struct Serializer {
    output: String,
    options: WriteOptions,
}

impl Serializer {
    pub fn new(options: WriteOptions) -> Self {
        Serializer {
            output: String::with_capacity(256),
            options,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Appends every field of `fields`, starting at nesting level zero.
    pub fn write_fields(&mut self, fields: &FieldCollection) {
        let before = self.output.len();
        self.write_level(fields, 0);
        log::trace!(
            "wrote {} top-level fields ({} bytes)",
            fields.len(),
            self.output.len() - before
        );
    }

    fn write_level(&mut self, fields: &FieldCollection, level: usize) {
        for field in fields {
            self.write_field(&field, level);
        }
    }

    fn write_field(&mut self, field: &Field, level: usize) {
        self.write_indent(level);
        self.output.push_str(&field.name());

        if field.has_tags() {
            self.output.push_str(" [");
            let tags = field.tags();
            for (i, tag) in tags.iter().enumerate() {
                if i > 0 {
                    self.output.push(' ');
                }
                self.output.push_str(&tag.to_string());
            }
            self.output.push(']');
        }

        self.output.push(':');
        match field.value() {
            Some(value) => {
                self.output.push(' ');
                self.output.push_str(&escape_value(&value.to_string()));
                self.output.push_str(self.options.line_ending.as_str());
            }
            None => {
                self.output.push_str(self.options.line_ending.as_str());
                if let Some(subfields) = field.existing_subfields() {
                    self.write_level(&subfields, level + 1);
                }
            }
        }
    }

    #[inline]
    fn write_indent(&mut self, level: usize) {
        let width = level * self.options.indent.max(1);
        self.output.extend(std::iter::repeat(' ').take(width));
    }
}

/// Escapes a value so the parser reads it back unchanged.
///
/// # Examples
///
/// ```rust
/// use mlc::ser::escape_value;
///
/// assert_eq!(escape_value(" V 3 "), r"\_V 3\_");
/// assert_eq!(escape_value("a\tb"), r"a\tb");
/// assert_eq!(escape_value(r"C:\[x]"), r"C:\\\[x]");
/// ```
#[must_use]
pub fn escape_value(text: &str) -> String {
    let leading = text.len() - text.trim_start_matches(' ').len();
    let trailing = if leading == text.len() {
        0
    } else {
        text.len() - text.trim_end_matches(' ').len()
    };
    let middle = &text[leading..text.len() - trailing];

    let mut out = String::with_capacity(text.len() + 8);
    for _ in 0..leading {
        out.push_str("\\_");
    }
    for ch in middle.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '[' => out.push_str("\\["),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{0008}' => out.push_str("\\b"),
            _ => out.push(ch),
        }
    }
    for _ in 0..trailing {
        out.push_str("\\_");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Tag, Value};

    fn render(fields: &FieldCollection) -> String {
        let mut serializer = Serializer::new(WriteOptions::new());
        serializer.write_fields(fields);
        serializer.into_inner()
    }

    #[test]
    fn test_escape_value() {
        assert_eq!(escape_value(""), "");
        assert_eq!(escape_value("plain"), "plain");
        assert_eq!(escape_value("   "), r"\_\_\_");
        assert_eq!(escape_value(" a b "), r"\_a b\_");
        assert_eq!(escape_value("line\r\nnext"), r"line\r\nnext");
        assert_eq!(escape_value("\u{0008}"), r"\b");
        assert_eq!(escape_value("x [y]"), r"x \[y]");
    }

    #[test]
    fn test_nested_layout() {
        let fields = FieldCollection::new();
        fields.set_path("A/B/C", "1").unwrap();
        fields.set_path("D", "2").unwrap();
        assert_eq!(render(&fields), "A:\n    B:\n        C: 1\nD: 2\n");
    }

    #[test]
    fn test_tags_and_empty_values() {
        let fields = FieldCollection::new();
        let field = Field::with_value("F", "").unwrap();
        field.add_tag(Tag::new("Test", true).unwrap()).unwrap();
        field.add_tag(Tag::new("Off", false).unwrap()).unwrap();
        fields.add(field).unwrap();
        let container = Field::new("G").unwrap();
        container.add_tag(Tag::modifier("Sorted", true).unwrap()).unwrap();
        fields.add(container).unwrap();

        assert_eq!(render(&fields), "F [Test !Off]: \nG [.Sorted]:\n");
    }

    #[test]
    fn test_typed_values_use_canonical_text() {
        let fields = FieldCollection::new();
        fields.add(Field::with_value("Flag", true).unwrap()).unwrap();
        fields.add(Field::with_value("Bytes", Value::Binary(vec![0xab, 0x01])).unwrap()).unwrap();
        fields.add(Field::with_value("Ratio", 0.5f64).unwrap()).unwrap();
        assert_eq!(render(&fields), "Flag: true\nBytes: ab01\nRatio: 0.5\n");
    }

    #[test]
    fn test_crlf() {
        let fields = FieldCollection::new();
        fields.set_path("A/B", "1").unwrap();
        let options = WriteOptions::new()
            .with_indent(2)
            .with_line_ending(crate::LineEnding::CrLf);
        let mut serializer = Serializer::new(options);
        serializer.write_fields(&fields);
        assert_eq!(serializer.into_inner(), "A:\r\n  B: 1\r\n");
    }

    #[test]
    fn test_zero_indent_keeps_nesting() {
        let fields = FieldCollection::new();
        fields.set_path("A/B", "1").unwrap();

        let options = WriteOptions {
            indent: 0,
            ..WriteOptions::new()
        };
        let mut serializer = Serializer::new(options);
        serializer.write_fields(&fields);
        let text = serializer.into_inner();
        assert_eq!(text, "A:\n B: 1\n");
        assert_eq!(crate::from_str(&text).unwrap(), fields);
    }
}
