use crate::datetime_utils::Clock;
use crate::error_utils::{parse_json_with_context, serialize_to_json_with_context};
use crate::filename_utils::tweets_output_filename;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Returns a copy of the value with the keys of every object in sorted order
pub fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), sort_keys(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Writes a 4-space indented, key-sorted rendering of the document followed by a newline
pub fn print_sorted<W: Write>(document: &Value, out: &mut W) -> Result<()> {
    let sorted = sort_keys(document);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut *out, PrettyFormatter::with_indent(b"    "));
    sorted
        .serialize(&mut serializer)
        .context("Failed to render tweets document")?;
    writeln!(out).context("Failed to write to output")?;
    Ok(())
}

/// Saves the document as 2-space indented UTF-8 JSON named after the clock's current second
pub fn save_output(document: &Value, output_dir: &Path, clock: &dyn Clock) -> Result<PathBuf> {
    let filename = tweets_output_filename(&clock.now());
    let file_path = output_dir.join(filename);

    if file_path.exists() {
        debug!(
            "Overwriting output written within the same second: {path}",
            path = file_path.display()
        );
    }

    let json = serialize_to_json_with_context(document, "tweets document")?;
    fs::write(&file_path, json).with_context(|| {
        format!(
            "Failed to write tweets JSON to {path}",
            path = file_path.display()
        )
    })?;

    info!("Saved tweets data to {path}", path = file_path.display());

    Ok(file_path)
}

/// Load a previously saved tweets document
pub fn load_output(file_path: &Path) -> Result<Value> {
    let json_content = fs::read_to_string(file_path).with_context(|| {
        format!(
            "Failed to read tweets JSON file {path}",
            path = file_path.display()
        )
    })?;

    parse_json_with_context(&json_content, "tweets document")
}
