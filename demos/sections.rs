//! Split a document into `[Section]` blocks.
//!
//! Run with: cargo run --example sections

use mlc::{parse_sections, write_sections, WriteOptions};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let text = "\
[Header]
.Format: mlc

[Server]
Port: 8080

[Server]
Port: 8081
";

    let sections = parse_sections(text)?;
    for section in &sections {
        println!("[{}] {} field(s)", section.name, section.fields.len());
    }

    let written = write_sections(&sections, &WriteOptions::new().with_indent(2));
    assert_eq!(written, text);

    match parse_sections("stray: 1\n[Server]\n") {
        Err(err) => println!("Expected error: {}", err),
        Ok(_) => unreachable!("content before the first header is rejected"),
    }

    Ok(())
}
