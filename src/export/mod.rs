//! Analyzed item records: history, CSV export and modifier tables.

pub mod csv_writer;
pub mod history;
pub mod item;

pub use history::{HistorySort, ItemHistory, ItemStorage, MemoryStorage};
pub use item::AnalyzedItem;

use crate::entry::ModEntry;

const ITEM_HEADER: &str = "Item Name,Modifiers";
const MOD_HEADER: &str = "Mod,Value";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvExportOptions {
    pub include_headers: bool,
}

impl Default for CsvExportOptions {
    fn default() -> Self {
        Self {
            include_headers: true,
        }
    }
}

/// Wraps a field in double quotes, doubling any quotes inside.
pub fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// `"name: value; name: value"` for an item's modifiers.
pub fn join_mods(entries: &[ModEntry]) -> String {
    entries
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// One row per item: quoted name, then the quoted joined modifiers.
pub fn generate_csv(items: &[AnalyzedItem], options: &CsvExportOptions) -> String {
    let mut lines = Vec::with_capacity(items.len() + 1);
    if options.include_headers {
        lines.push(ITEM_HEADER.to_string());
    }
    for item in items {
        lines.push(format!(
            "{},{}",
            quote(&item.name),
            quote(&join_mods(&item.mod_entries))
        ));
    }
    lines.join("\n")
}

/// `Mod,Value` table of the entries. Empty input gives an empty string.
pub fn mods_to_csv(entries: &[ModEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let rows: Vec<String> = entries
        .iter()
        .map(|e| format!("{},{}", quote(&e.name), quote(&e.value)))
        .collect();
    format!("{}\n{}", MOD_HEADER, rows.join("\n"))
}
