//! Parse notation text, edit it and write it back.
//!
//! Run with: cargo run --example simple

use mlc::{from_str, to_string, Tag};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let text = "\
.Version: 1
Server [Required]:
    Host: example.org
    Port: 8080
    Banner: \\_Welcome\\_
";

    let fields = from_str(text)?;

    let port = fields.get_path("Server/Port").and_then(|v| v.as_u16());
    println!("Port: {:?}", port);

    let banner = fields.get_path("Server/Banner").unwrap_or_default();
    println!("Banner: {:?}", banner.to_string());

    fields.set_path("Server/Port", 8443u16)?;
    let host = fields.find_first("server/host").ok_or("missing host")?;
    host.add_tag(Tag::new("Public", true)?)?;

    let written = to_string(&fields);
    println!("Notation output:\n{}", written);

    // Parsing the output and writing it again gives the same text
    assert_eq!(to_string(&from_str(&written)?), written);
    println!("✓ Round-trip successful");

    Ok(())
}
