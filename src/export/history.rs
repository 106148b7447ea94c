//! In-memory history of analyzed items.
//!
//! Newest items come first. Every change is handed to an [`ItemStorage`], which
//! decides whether and where the list is kept.

use anyhow::Result;
use std::cmp::Ordering;
use uuid::Uuid;

use super::AnalyzedItem;
use crate::entry::ModEntry;

/// Where the history list is kept between sessions.
pub trait ItemStorage {
    fn load(&self) -> Result<Vec<AnalyzedItem>>;
    fn save(&mut self, items: &[AnalyzedItem]) -> Result<()>;
}

/// Storage that keeps the last saved list in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Vec<AnalyzedItem>,
}

impl MemoryStorage {
    pub fn with_items(items: Vec<AnalyzedItem>) -> Self {
        Self { items }
    }

    pub fn saved(&self) -> &[AnalyzedItem] {
        &self.items
    }
}

impl ItemStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<AnalyzedItem>> {
        Ok(self.items.clone())
    }

    fn save(&mut self, items: &[AnalyzedItem]) -> Result<()> {
        self.items = items.to_vec();
        Ok(())
    }
}

/// Display order for [`ItemHistory::sorted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistorySort {
    /// Newest first
    #[default]
    Date,
    /// Case-insensitive name order
    Name,
    /// Most modifiers first
    Mods,
}

#[derive(Debug)]
pub struct ItemHistory<S: ItemStorage> {
    items: Vec<AnalyzedItem>,
    storage: S,
}

impl<S: ItemStorage> ItemHistory<S> {
    /// Creates the history from whatever the storage already holds.
    pub fn new(storage: S) -> Result<Self> {
        let items = storage.load()?;
        tracing::debug!("Loaded {} history items", items.len());
        Ok(Self { items, storage })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Inserts the item at the front.
    pub fn add_item(&mut self, item: AnalyzedItem) -> Result<()> {
        self.items.insert(0, item);
        self.storage.save(&self.items)
    }

    /// Builds an item from an analysis result and inserts it at the front.
    pub fn record(
        &mut self,
        name: &str,
        mod_entries: Vec<ModEntry>,
        ocr_text: &str,
        confidence: f64,
    ) -> Result<&AnalyzedItem> {
        self.add_item(AnalyzedItem::new(name, mod_entries, ocr_text, confidence))?;
        Ok(&self.items[0])
    }

    /// Returns false if no item has the id.
    pub fn remove_item(&mut self, id: Uuid) -> Result<bool> {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() == before {
            return Ok(false);
        }
        self.storage.save(&self.items)?;
        Ok(true)
    }

    /// Returns false if no item has the id.
    pub fn update_item_name(&mut self, id: Uuid, name: &str) -> Result<bool> {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return Ok(false);
        };
        item.name = name.to_string();
        self.storage.save(&self.items)?;
        Ok(true)
    }

    pub fn clear_all(&mut self) -> Result<()> {
        self.items.clear();
        self.storage.save(&self.items)
    }

    pub fn items(&self) -> &[AnalyzedItem] {
        &self.items
    }

    pub fn get_item(&self, id: Uuid) -> Option<&AnalyzedItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Every modifier of every item, newest item first.
    pub fn all_mod_entries(&self) -> Vec<ModEntry> {
        self.items
            .iter()
            .flat_map(|item| item.mod_entries.iter().cloned())
            .collect()
    }

    /// Items whose name, or any modifier name or value, contains the query
    /// case-insensitively. A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&AnalyzedItem> {
        let query = query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| query.is_empty() || matches_query(item, &query))
            .collect()
    }

    pub fn sorted(&self, sort: HistorySort) -> Vec<&AnalyzedItem> {
        let mut items: Vec<&AnalyzedItem> = self.items.iter().collect();
        sort_items(&mut items, sort);
        items
    }

    /// [`search`](Self::search) followed by a stable sort.
    pub fn filtered(&self, query: &str, sort: HistorySort) -> Vec<&AnalyzedItem> {
        let mut items = self.search(query);
        sort_items(&mut items, sort);
        items
    }
}

fn matches_query(item: &AnalyzedItem, query: &str) -> bool {
    item.name.to_lowercase().contains(query)
        || item.mod_entries.iter().any(|m| {
            m.name.to_lowercase().contains(query) || m.value.to_lowercase().contains(query)
        })
}

fn sort_items(items: &mut [&AnalyzedItem], sort: HistorySort) {
    items.sort_by(|a, b| match sort {
        HistorySort::Date => b.analyzed_at.cmp(&a.analyzed_at),
        HistorySort::Name => compare_names(&a.name, &b.name),
        HistorySort::Mods => b.mod_count().cmp(&a.mod_count()),
    });
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
