//! Named sections of notation text.
//!
//! A section header is a line starting at column 0 whose trimmed text is
//! `[Name]`. Every line up to the next header is the section body, parsed
//! as ordinary notation. Section names follow the field name rules and may
//! repeat.
//!
//! ```rust
//! use mlc::{parse_sections, Value};
//!
//! let text = "[Server]\nPort: 80\n\n[Client]\nRetries: 3\n";
//! let sections = parse_sections(text).unwrap();
//!
//! assert_eq!(sections.len(), 2);
//! assert_eq!(sections[1].name, "Client");
//! assert_eq!(sections[1].fields.get_path("Retries"), Some(Value::from("3")));
//! ```

use crate::de::Parser;
use crate::{Error, Field, FieldCollection, Result, Serializer, WriteOptions};

/// A named block of fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub name: String,
    pub fields: FieldCollection,
}

impl Section {
    pub fn new(name: &str, fields: FieldCollection) -> Result<Section> {
        if !Field::is_name_valid(name) {
            return Err(Error::invalid_field_name(name));
        }
        Ok(Section {
            name: name.to_string(),
            fields,
        })
    }
}

/// Splits `text` into sections and parses each body.
///
/// # Errors
///
/// Returns [`Error::Format`] for non-blank text before the first header, for
/// invalid section names, and for any error inside a body. Line numbers are
/// counted from the start of `text`.
pub fn parse_sections(text: &str) -> Result<Vec<Section>> {
    let mut sections = Vec::new();
    // (name, first body line index, body lines)
    let mut current: Option<(String, usize, Vec<&str>)> = None;

    for (index, raw) in text.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if let Some(name) = section_header(line) {
            if !Field::is_name_valid(name) {
                return Err(Error::invalid_field_name(name).at_line(index + 1));
            }
            if let Some(done) = current.take() {
                sections.push(finish(done)?);
            }
            log::trace!("section '{}' starts at line {}", name, index + 1);
            current = Some((name.to_string(), index + 1, Vec::new()));
            continue;
        }
        match current.as_mut() {
            Some((_, _, body)) => body.push(line),
            None if line.trim().is_empty() => {}
            None => {
                return Err(Error::format(
                    index + 1,
                    "Content before the first section header",
                ))
            }
        }
    }
    if let Some(done) = current {
        sections.push(finish(done)?);
    }
    log::debug!("parsed {} sections", sections.len());
    Ok(sections)
}

fn finish((name, offset, body): (String, usize, Vec<&str>)) -> Result<Section> {
    let fields = Parser::with_line_offset(&body.join("\n"), offset).parse()?;
    Ok(Section { name, fields })
}

fn section_header(line: &str) -> Option<&str> {
    if !line.starts_with('[') {
        return None;
    }
    line.trim_end()
        .strip_prefix('[')?
        .strip_suffix(']')
        .map(str::trim)
}

/// Writes sections separated by blank lines.
///
/// # Examples
///
/// ```rust
/// use mlc::{fields, write_sections, Section, WriteOptions};
///
/// let sections = vec![Section::new("A", fields! { "X" => 1 }).unwrap()];
/// assert_eq!(write_sections(&sections, &WriteOptions::new()), "[A]\nX: 1\n");
/// ```
#[must_use]
pub fn write_sections(sections: &[Section], options: &WriteOptions) -> String {
    let newline = options.line_ending.as_str();
    let mut out = String::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.push_str(newline);
        }
        out.push('[');
        out.push_str(&section.name);
        out.push(']');
        out.push_str(newline);
        let mut serializer = Serializer::new(options.clone());
        serializer.write_fields(&section.fields);
        out.push_str(&serializer.into_inner());
    }
    out
}
