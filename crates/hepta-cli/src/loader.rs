//! Source loading from files or stdin.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Read a whole source. The path `-` means standard input.
pub fn load_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read source from stdin")?;
        return Ok(buffer);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read source from {}", path.display()))
}
