//! Build a tree with paths and the `fields!` macro, then walk it.
//!
//! Run with: cargo run --example paths

use mlc::{fields, to_string, Field, Value, ValueKind};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let config = fields! {
        "Name" => "cache",
        "Limits" => {
            "Memory" => "512Mi",
            "Entries" => 10_000u32,
        },
    };

    config.set_path("Limits/Timeout", "00:00:30")?;
    config.add_path("Peers/Peer", "10.0.0.1")?;
    config.add_path("Peers/Peer", "10.0.0.2")?;

    config.on_changed(|| println!("  (tree changed)"));
    config.set_path("Name", "cache-eu")?;

    println!("All paths:");
    for (path, field) in config.all_paths() {
        match field.value() {
            Some(value) => println!("  {} = {}", path, value),
            None => println!("  {}/", path),
        }
    }

    let memory = config.get_path("Limits/Memory").and_then(|v| v.as_size());
    println!("Memory bytes: {:?}", memory.map(|s| s.count()));

    let timeout = config.get_path("Limits/Timeout").and_then(|v| v.as_duration());
    println!("Timeout seconds: {:?}", timeout.map(|d| d.num_seconds()));

    let peers: Vec<Value> = config
        .find_all("Peers/Peer")
        .iter()
        .filter_map(Field::value)
        .filter_map(|v| v.convert(ValueKind::Ipv4))
        .collect();
    println!("Peers: {:?}", peers);

    println!("Notation output:\n{}", to_string(&config));
    Ok(())
}
