//! Notation Format Reference
//!
//! This module documents the multiline content notation as read by
//! [`Parser`](crate::Parser) and written by [`Serializer`](crate::Serializer).
//!
//! # Overview
//!
//! A document is a tree of named fields, one field per line. Indentation
//! nests fields; each field holds either a text value or subfields, and may
//! carry boolean tags.
//!
//! ```text
//! .Version: 2
//! Server [Required]:
//!     Host: example.org
//!     Port: 8080
//!     Banner: \_Welcome\_ [Localized]
//! Client:
//!     Retries = 3
//! ```
//!
//! # Lines
//!
//! ```text
//! indent name [tags] (':' | '=') value [tags]
//! ```
//!
//! **Rules**:
//! - Blank lines are ignored and line numbers in errors count from 1
//! - `\r\n` and `\n` line endings are both accepted
//! - The name ends at whitespace, `[`, `:` or `=`; only whitespace, a tag
//!   list or the delimiter may follow it
//! - A line without a delimiter, or ending right after it, is a container
//! - Any character after the delimiter makes a value, even a single space:
//!   `Name: ` holds the empty string while `Name:` holds subfields
//!
//! ## Names
//!
//! Field names match `^\.?[Letter|Digit][Letter|Digit|-]*$` and compare
//! case-insensitively. Names with a leading `.` are headers and are moved
//! before the other fields of their level when parsed.
//!
//! ## Indentation
//!
//! A space weighs one column and a tab weighs
//! [`TAB_WIDTH`](crate::de::TAB_WIDTH) columns.
//!
//! - Deeper than the previous line: the previous line owns this one
//! - Same depth: same owner as the previous line
//! - Shallower: owners are dropped until one is strictly shallower
//!
//! A line that owns other lines keeps only its subfields; a value written on
//! it is discarded.
//!
//! # Values
//!
//! Values are trimmed of spaces and tabs at both ends. Escapes:
//!
//! | Escape | Character            |
//! |--------|----------------------|
//! | `\_`   | space, never trimmed |
//! | `\t`   | tab                  |
//! | `\b`   | backspace            |
//! | `\n`   | line feed            |
//! | `\r`   | carriage return      |
//! | `\x`   | `x` for any other    |
//!
//! A trailing `[...]` is a tag list only when nothing but whitespace follows
//! the first `]`; `\[` keeps a bracket in the value.
//!
//! # Tags
//!
//! Tag lists may appear after the name, after the value, or both. Tokens are
//! separated by whitespace, `,` or `;`:
//!
//! | Token            | Meaning                  |
//! |------------------|--------------------------|
//! | `Name`, `+Name`, `Name+` | set              |
//! | `!Name`, `-Name`, `Name-` | cleared         |
//! | `.Name`          | modifier tag             |
//!
//! Tag names match `^@?Letter[Letter|Digit]*$`. Parsed tags are sorted with
//! modifiers first.
//!
//! # Writing
//!
//! The serializer writes one line per field, `indent` spaces per level
//! (4 by default), tags before the delimiter and `: ` before values.
//! Parsing written output and writing it again gives the same text.
//!
//! # Sections
//!
//! [`parse_sections`](crate::parse_sections) reads documents split by
//! `[Name]` header lines at column 0:
//!
//! ```text
//! [Server]
//! Port: 8080
//!
//! [Client]
//! Retries: 3
//! ```
