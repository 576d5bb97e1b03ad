//! Input loading
//!
//! The coordinator reads the whole input file into memory before
//! partitioning. The file is treated as bytes: invalid UTF-8 sequences are
//! replaced rather than rejected, and lines are split on `\n` with the same
//! rules as the line-block codec.

use crate::distributed::codec::decode_lines;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Read `path` into an ordered list of lines
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    Ok(decode_lines(&String::from_utf8_lossy(&bytes)))
}
