//! Append-only CSV log of analyzed items.
//!
//! Each item is written as soon as it is analyzed, so earlier rows survive a crash.
//! Each row contains: id, timestamp, name, confidence, and the joined modifiers.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use super::{join_mods, quote, AnalyzedItem};

const CSV_HEADER: &str = "id,analyzed_at,name,confidence,modifiers";

/// Creates the file with a header if it is missing or empty.
///
/// Existing content is never overwritten.
pub fn init_csv(path: &Path) -> Result<()> {
    if path.exists() {
        let file = File::open(path).context("Failed to open existing CSV")?;
        if BufReader::new(file).lines().next().is_some() {
            return Ok(());
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Failed to create CSV directory")?;
    }
    let mut file = File::create(path).context("Failed to create CSV file")?;
    writeln!(file, "{}", CSV_HEADER).context("Failed to write CSV header")?;
    Ok(())
}

/// Appends one item row, opening the file for each write.
pub fn append_item(path: &Path, item: &AnalyzedItem) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context("Failed to open CSV for append")?;

    let line = format!(
        "{},{},{},{:.2},{}",
        item.id,
        item.analyzed_at.format("%Y-%m-%dT%H:%M:%S"),
        quote(&item.name),
        item.confidence,
        quote(&join_mods(&item.mod_entries)),
    );

    writeln!(file, "{}", line).context("Failed to write CSV row")?;
    Ok(())
}
