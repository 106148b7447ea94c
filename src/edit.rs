//! Manual correction of extracted modifier entries.
//!
//! Every operation returns a new list; on error the input is untouched.

use anyhow::{bail, Result};

use crate::entry::ModEntry;

/// Which half of an entry to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Name,
    Value,
}

/// Replaces one field of the entry at `index` with the trimmed `value`.
pub fn update_entry(
    entries: &[ModEntry],
    index: usize,
    field: EntryField,
    value: &str,
) -> Result<Vec<ModEntry>> {
    let Some(current) = entries.get(index) else {
        bail!("Invalid index {} (have {} entries)", index, entries.len());
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("Cannot set an empty value");
    }

    let mut updated = current.clone();
    match field {
        EntryField::Name => updated.name = trimmed.to_string(),
        EntryField::Value => updated.value = trimmed.to_string(),
    }
    if !updated.is_valid() {
        bail!("Invalid modifier entry \"{}\"", updated);
    }

    let mut result = entries.to_vec();
    result[index] = updated;
    Ok(result)
}

pub fn delete_entry(entries: &[ModEntry], index: usize) -> Result<Vec<ModEntry>> {
    if index >= entries.len() {
        bail!("Invalid index {} (have {} entries)", index, entries.len());
    }
    let mut result = entries.to_vec();
    result.remove(index);
    Ok(result)
}

pub fn add_entry(entries: &[ModEntry], entry: ModEntry) -> Result<Vec<ModEntry>> {
    if !entry.is_valid() {
        bail!("Invalid modifier entry \"{}\"", entry);
    }
    let mut result = entries.to_vec();
    result.push(entry);
    Ok(result)
}

/// Drops structurally invalid entries, keeping order.
pub fn retain_valid(entries: &[ModEntry]) -> Vec<ModEntry> {
    let valid: Vec<ModEntry> = entries.iter().filter(|e| e.is_valid()).cloned().collect();
    if valid.len() != entries.len() {
        tracing::warn!("Removed {} invalid modifier entries", entries.len() - valid.len());
    }
    valid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ModEntry> {
        vec![
            ModEntry::new("Damage Increase", "25%"),
            ModEntry::new("Luck", "100"),
        ]
    }

    #[test]
    fn test_update_value() {
        let entries = sample();
        let updated = update_entry(&entries, 1, EntryField::Value, " 120 ").unwrap();
        assert_eq!(updated[1], ModEntry::new("Luck", "120"));
        assert_eq!(entries[1].value, "100");
    }

    #[test]
    fn test_update_name() {
        let updated = update_entry(&sample(), 0, EntryField::Name, "Spell Damage Increase").unwrap();
        assert_eq!(updated[0].name, "Spell Damage Increase");
    }

    #[test]
    fn test_update_rejects_bad_input() {
        let entries = sample();
        assert!(update_entry(&entries, 5, EntryField::Value, "1").is_err());
        assert!(update_entry(&entries, 0, EntryField::Value, "   ").is_err());
        assert!(update_entry(&entries, 0, EntryField::Value, "abc").is_err());
        assert!(update_entry(&entries, 0, EntryField::Name, "X").is_err());
        assert!(update_entry(&entries, 0, EntryField::Name, "null").is_err());
    }

    #[test]
    fn test_update_error_message() {
        let err = update_entry(&sample(), 2, EntryField::Value, "1").unwrap_err();
        assert_eq!(err.to_string(), "Invalid index 2 (have 2 entries)");
    }

    #[test]
    fn test_delete_entry() {
        let updated = delete_entry(&sample(), 0).unwrap();
        assert_eq!(updated, vec![ModEntry::new("Luck", "100")]);
        assert!(delete_entry(&sample(), 2).is_err());
        assert!(delete_entry(&[], 0).is_err());
    }

    #[test]
    fn test_add_entry() {
        let updated = add_entry(&sample(), ModEntry::new("Faster Casting", "1")).unwrap();
        assert_eq!(updated.len(), 3);
        assert_eq!(updated[2].name, "Faster Casting");

        assert!(add_entry(&sample(), ModEntry::new("Faster Casting", "")).is_err());
    }

    #[test]
    fn test_retain_valid() {
        let entries = vec![
            ModEntry::new("Luck", "100"),
            ModEntry::new("undefined", "5"),
            ModEntry::new("Mana Increase", "8"),
            ModEntry::new("Weight", "heavy"),
        ];
        assert_eq!(
            retain_valid(&entries),
            vec![ModEntry::new("Luck", "100"), ModEntry::new("Mana Increase", "8")]
        );
    }
}
