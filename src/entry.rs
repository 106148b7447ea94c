//! Modifier entries and the structural validity rule.
//!
//! A modifier entry is a (name, value) pair read off a tooltip line such as
//! `Damage Increase 25%`. Every entry that leaves the engine satisfies
//! [`ModEntry::is_valid`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Names that show up when a value was stringified instead of read.
const PLACEHOLDER_NAMES: [&str; 3] = ["undefined", "null", "nan"];

/// A single modifier read from tooltip text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModEntry {
    /// Modifier name, e.g. "Hit Chance Increase"
    pub name: String,
    /// Modifier value, e.g. "15%" or "+5"
    pub value: String,
}

impl ModEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns true if the entry passes every structural check.
    pub fn is_valid(&self) -> bool {
        structural_rejections(self).is_empty()
    }
}

impl fmt::Display for ModEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Why an entry failed the structural pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralRejection {
    /// Name has at most one character after trimming
    NameTooShort,
    /// Value is empty after trimming
    EmptyValue,
    /// Name is a stringified placeholder (undefined, null, NaN)
    PlaceholderName,
    /// Value is neither a plain/percent number nor a signed integer
    MalformedValue,
}

impl fmt::Display for StructuralRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralRejection::NameTooShort => write!(f, "name is too short"),
            StructuralRejection::EmptyValue => write!(f, "value is empty"),
            StructuralRejection::PlaceholderName => write!(f, "name is a placeholder"),
            StructuralRejection::MalformedValue => write!(f, "value is not numeric"),
        }
    }
}

/// Returns every structural rule the entry breaks. Empty means valid.
pub fn structural_rejections(entry: &ModEntry) -> Vec<StructuralRejection> {
    let name = entry.name.trim();
    let value = entry.value.trim();
    let mut rejections = Vec::new();

    if name.chars().count() <= 1 {
        rejections.push(StructuralRejection::NameTooShort);
    }
    if value.is_empty() {
        rejections.push(StructuralRejection::EmptyValue);
    }
    if PLACEHOLDER_NAMES
        .iter()
        .any(|p| name.eq_ignore_ascii_case(p))
    {
        rejections.push(StructuralRejection::PlaceholderName);
    }
    if !value.is_empty() && !is_numeric_value(value) {
        rejections.push(StructuralRejection::MalformedValue);
    }

    rejections
}

/// Matches `^\d+%?$` or `^[+-]?\d+$`.
pub fn is_numeric_value(value: &str) -> bool {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    if let Some(digits) = value.strip_suffix('%') {
        return all_digits(digits);
    }
    let unsigned = value
        .strip_prefix('+')
        .or_else(|| value.strip_prefix('-'))
        .unwrap_or(value);
    all_digits(unsigned)
}
