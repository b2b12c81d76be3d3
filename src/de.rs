//! Notation parsing.
//!
//! This module provides the [`Parser`] that turns notation text into a
//! [`FieldCollection`].
//!
//! ## Overview
//!
//! Parsing runs in three passes:
//!
//! 1. **Lines**: the input is split into physical lines numbered from 1;
//!    blank lines are skipped
//! 2. **Line grammar**: a character state machine extracts the indentation,
//!    name, tags and optional value of each line
//! 3. **Tree**: an owner stack keyed by indentation decides which line each
//!    line belongs to, then the fields are built level by level with header
//!    fields (names starting with `.`) first
//!
//! A space counts as one column of indentation and a tab as
//! [`TAB_WIDTH`] columns, so tab- and space-indented blocks never line up by
//! accident.
//!
//! ## Line Grammar
//!
//! ```text
//! indent name [tags] (':' | '=') value [tags]
//! ```
//!
//! - A line ending right after the delimiter declares a container field;
//!   any character after it, even a space, declares a value
//! - Tags are separated by whitespace, `,` or `;` and accept the `!`, `+`
//!   and `-` shorthands
//! - Values are trimmed; `\_` writes a space that survives trimming and
//!   `\t`, `\b`, `\n`, `\r` write control characters. Any other escaped
//!   character stands for itself
//!
//! ## Usage
//!
//! ```rust
//! use mlc::{from_str, Value};
//!
//! let fields = from_str("Server:\n    Host: example.org\n    Port = 8080 [Required]\n").unwrap();
//! assert_eq!(fields.get_path("Server/Port"), Some(Value::from("8080")));
//! assert!(fields.find_first("Server/Port").unwrap().has_tag("required"));
//! ```

use crate::{Error, Field, FieldCollection, Result, Tag, TagCollection};

/// Indentation weight of a tab character.
pub const TAB_WIDTH: usize = 1000;

/// The notation parser.
///
/// Created via [`Parser::new`]; [`Parser::with_line_offset`] shifts the line
/// numbers reported in errors, for input cut out of a larger text.
pub struct Parser<'a> {
    input: &'a str,
    line_offset: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Whitespace,
    BeforeName,
    Name,
    AfterName,
    Tag,
    BeforeValue,
    Value,
    ValueLiteral,
}

/// One non-blank line, split into its parts.
#[derive(Debug, PartialEq)]
struct Line {
    number: usize,
    indent: usize,
    name: String,
    tags: Vec<String>,
    value: Option<String>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            input,
            line_offset: 0,
        }
    }

    pub fn with_line_offset(input: &'a str, line_offset: usize) -> Self {
        Parser { input, line_offset }
    }

    /// Parses the whole input. No partial tree is returned on error.
    pub fn parse(&self) -> Result<FieldCollection> {
        let mut lines = Vec::new();
        for (index, text) in self.input.split('\n').enumerate() {
            let number = self.line_offset + index + 1;
            let text = text.strip_suffix('\r').unwrap_or(text);
            if let Some(line) = parse_line(text, number)? {
                lines.push(line);
            }
        }

        let (roots, children) = build_outline(&lines);
        let fields = FieldCollection::new();
        build_level(&lines, &children, &roots, &fields)?;
        log::debug!(
            "parsed {} lines into {} top-level fields",
            lines.len(),
            fields.len()
        );
        Ok(fields)
    }
}

fn parse_line(text: &str, number: usize) -> Result<Option<Line>> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let mut state = State::Whitespace;
    let mut indent = 0;
    let mut name = String::new();
    let mut tags = Vec::new();
    let mut token = String::new();
    let mut trailing_tags = false;
    let mut value: Option<String> = None;
    // Length of the value up to its last character that survives trimming.
    let mut kept = 0;

    let mut chars = text.char_indices().peekable();
    while let Some(&(pos, ch)) = chars.peek() {
        match state {
            State::Whitespace => match ch {
                ' ' => indent += 1,
                '\t' => indent += TAB_WIDTH,
                _ => {
                    state = State::BeforeName;
                    continue;
                }
            },
            State::BeforeName => {
                if matches!(ch, '[' | ':' | '=') {
                    return Err(Error::format(number, "Missing field name"));
                }
                state = State::Name;
                continue;
            }
            State::Name => match ch {
                ' ' | '\t' => state = State::AfterName,
                '[' => state = State::Tag,
                ':' | '=' => {
                    value = start_value(text, pos);
                    state = State::BeforeValue;
                }
                _ => name.push(ch),
            },
            State::AfterName => match ch {
                ' ' | '\t' => {}
                '[' => state = State::Tag,
                ':' | '=' => {
                    value = start_value(text, pos);
                    state = State::BeforeValue;
                }
                _ => {
                    return Err(Error::format(
                        number,
                        format!("Unexpected character '{}' after field name '{}'", ch, name),
                    ))
                }
            },
            State::Tag => match ch {
                ']' => {
                    flush_token(&mut token, &mut tags);
                    if trailing_tags {
                        // Closed list ends the line.
                        state = State::Value;
                        break;
                    }
                    state = State::AfterName;
                }
                ' ' | '\t' | ',' | ';' => flush_token(&mut token, &mut tags),
                _ => token.push(ch),
            },
            State::BeforeValue => match ch {
                ' ' | '\t' => {}
                _ => {
                    state = State::Value;
                    continue;
                }
            },
            State::Value => {
                let buffer = value.get_or_insert_with(String::new);
                match ch {
                    '\\' => state = State::ValueLiteral,
                    '[' if closes_line(&text[pos + 1..]) => {
                        trailing_tags = true;
                        state = State::Tag;
                    }
                    ' ' | '\t' => buffer.push(ch),
                    _ => {
                        buffer.push(ch);
                        kept = buffer.len();
                    }
                }
            }
            State::ValueLiteral => {
                let buffer = value.get_or_insert_with(String::new);
                buffer.push(unescape(ch));
                kept = buffer.len();
                state = State::Value;
            }
        }
        chars.next();
    }

    match state {
        State::Tag => {
            return Err(Error::format(number, "Unterminated tag list"));
        }
        State::ValueLiteral => {
            let buffer = value.get_or_insert_with(String::new);
            buffer.push('\\');
            kept = buffer.len();
        }
        _ => {}
    }
    if let Some(buffer) = value.as_mut() {
        buffer.truncate(kept);
    }

    Ok(Some(Line {
        number,
        indent,
        name,
        tags,
        value,
    }))
}

/// A value exists if anything follows the delimiter at `pos`.
fn start_value(text: &str, pos: usize) -> Option<String> {
    if pos + 1 < text.len() {
        Some(String::new())
    } else {
        None
    }
}

/// Returns `true` if `rest` holds a `]` followed only by whitespace.
fn closes_line(rest: &str) -> bool {
    match rest.find(']') {
        Some(end) => rest[end + 1..].trim_matches(|c| c == ' ' || c == '\t').is_empty(),
        None => false,
    }
}

fn flush_token(token: &mut String, tags: &mut Vec<String>) {
    if !token.is_empty() {
        tags.push(std::mem::take(token));
    }
}

fn unescape(ch: char) -> char {
    match ch {
        '_' => ' ',
        't' => '\t',
        'b' => '\u{0008}',
        'n' => '\n',
        'r' => '\r',
        other => other,
    }
}

/// Assigns every line an owner using the indentation stack. Returns the
/// top-level line indices and the children of every line.
fn build_outline(lines: &[Line]) -> (Vec<usize>, Vec<Vec<usize>>) {
    let mut roots = Vec::new();
    let mut children = vec![Vec::new(); lines.len()];
    let mut owners: Vec<usize> = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            let previous = &lines[index - 1];
            if line.indent > previous.indent {
                owners.push(index - 1);
            } else if line.indent < previous.indent {
                while owners
                    .last()
                    .is_some_and(|&owner| lines[owner].indent >= line.indent)
                {
                    owners.pop();
                }
            }
        }
        match owners.last() {
            Some(&owner) => children[owner].push(index),
            None => roots.push(index),
        }
    }
    (roots, children)
}

fn build_level(
    lines: &[Line],
    children: &[Vec<usize>],
    level: &[usize],
    into: &FieldCollection,
) -> Result<()> {
    let headers = level.iter().filter(|&&i| lines[i].name.starts_with('.'));
    let data = level.iter().filter(|&&i| !lines[i].name.starts_with('.'));

    for &index in headers.chain(data) {
        let line = &lines[index];
        let field = build_field(lines, children, index).map_err(|e| e.at_line(line.number))?;
        into.add(field).map_err(|e| e.at_line(line.number))?;
    }
    Ok(())
}

fn build_field(lines: &[Line], children: &[Vec<usize>], index: usize) -> Result<Field> {
    let line = &lines[index];
    let field = Field::new(&line.name)?;

    if !line.tags.is_empty() {
        let mut tags = TagCollection::new();
        for token in &line.tags {
            tags.add(Tag::parse(token)?)?;
        }
        tags.sort()?;
        field.set_tags(&tags)?;
    }

    if !children[index].is_empty() {
        if line.value.is_some() {
            log::debug!(
                "line {}: value of '{}' ignored, the field has subfields",
                line.number,
                line.name
            );
        }
        build_level(lines, children, &children[index], &field.subfields())?;
    } else if let Some(value) = &line.value {
        field.set_value(value.as_str())?;
    }
    Ok(field)
}
