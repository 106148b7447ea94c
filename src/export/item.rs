use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entry::ModEntry;

/// One analyzed tooltip, ready for history or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedItem {
    pub id: Uuid,
    pub name: String,
    pub analyzed_at: DateTime<Local>,
    pub mod_entries: Vec<ModEntry>,
    pub ocr_text: String,
    pub confidence: f64,
}

impl AnalyzedItem {
    pub fn new(
        name: impl Into<String>,
        mod_entries: Vec<ModEntry>,
        ocr_text: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            analyzed_at: Local::now(),
            mod_entries,
            ocr_text: ocr_text.into(),
            confidence,
        }
    }

    /// The name, or `"Unnamed item (<date>)"` when it is blank.
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            format!("Unnamed item ({})", self.analyzed_at.format("%Y-%m-%d"))
        } else {
            self.name.clone()
        }
    }

    pub fn mod_count(&self) -> usize {
        self.mod_entries.len()
    }
}
