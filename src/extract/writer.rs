use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Serialize `value` indented by `indent` spaces, or compact when 0,
/// with a trailing newline.
pub fn render_json<T: Serialize + ?Sized>(value: &T, indent: usize) -> Result<String> {
    let mut buf = Vec::new();
    if indent == 0 {
        serde_json::to_writer(&mut buf, value).context("Failed to serialize JSON")?;
    } else {
        let spaces = vec![b' '; indent];
        let mut serializer =
            Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&spaces));
        value
            .serialize(&mut serializer)
            .context("Failed to serialize JSON")?;
    }
    buf.push(b'\n');
    String::from_utf8(buf).context("Serialized JSON is not valid UTF-8")
}

/// Write `value` as JSON, creating parent directories as needed.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, indent: usize) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let content = render_json(value, indent)?;
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}
