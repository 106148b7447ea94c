//! Ultima Online denoising rules.
//!
//! Removes entries that are OCR artifacts or item attributes rather than
//! modifiers. Every rule that fires is reported, so a rejection can always be
//! explained.

use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, LazyLock};

use super::compile_patterns;
use crate::analysis::config::DomainRules;
use crate::entry::ModEntry;

/// Filter built from the built-in tables, shared by every default analyzer.
pub static DEFAULT_DOMAIN_FILTER: LazyLock<Arc<DomainFilter>> =
    LazyLock::new(|| Arc::new(DomainFilter::new(&DomainRules::default())));

/// A domain rule that rejected an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainRejection {
    /// Name exactly matches the deny list
    DeniedName,
    /// Name contains a denied substring
    DeniedSubstring(String),
    /// Name matches a misread attribute word
    OcrConfusion(String),
    /// Value matches a reject pattern
    RejectedValue(String),
    /// Value is below the modifier's minimum meaningful value
    BelowMinimum { minimum: u32, actual: u64 },
}

impl fmt::Display for DomainRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainRejection::DeniedName => write!(f, "name is a known non-modifier word"),
            DomainRejection::DeniedSubstring(s) => write!(f, "name contains \"{}\"", s),
            DomainRejection::OcrConfusion(p) => write!(f, "name matches OCR error pattern {}", p),
            DomainRejection::RejectedValue(p) => write!(f, "value matches reject pattern {}", p),
            DomainRejection::BelowMinimum { minimum, actual } => {
                write!(f, "value {} is below minimum {}", actual, minimum)
            }
        }
    }
}

/// Compiled form of [`DomainRules`].
#[derive(Debug, Clone)]
pub struct DomainFilter {
    denied_names: HashSet<String>,
    denied_substrings: Vec<String>,
    ocr_confusion: Vec<Regex>,
    rejected_values: Vec<Regex>,
    minimum_values: HashMap<String, u32>,
}

impl DomainFilter {
    /// Builds the filter. Patterns that fail to compile are skipped with a warning.
    pub fn new(rules: &DomainRules) -> Self {
        let normalize = |s: &String| s.trim().to_lowercase();
        Self {
            denied_names: rules.denied_names.iter().map(normalize).collect(),
            denied_substrings: rules.denied_substrings.iter().map(normalize).collect(),
            ocr_confusion: compile_patterns(&rules.ocr_confusion_patterns, "OCR confusion"),
            rejected_values: compile_patterns(&rules.rejected_value_patterns, "rejected value"),
            minimum_values: rules
                .minimum_values
                .iter()
                .map(|(name, min)| (normalize(name), *min))
                .collect(),
        }
    }

    /// Returns every domain rule the entry breaks. Empty means the entry is kept.
    pub fn rejections(&self, entry: &ModEntry) -> Vec<DomainRejection> {
        let name = entry.name.trim().to_lowercase();
        let value = entry.value.trim();
        let mut rejections = Vec::new();

        if self.denied_names.contains(&name) {
            rejections.push(DomainRejection::DeniedName);
        }

        if let Some(s) = self
            .denied_substrings
            .iter()
            .find(|s| !s.is_empty() && name.contains(s.as_str()))
        {
            rejections.push(DomainRejection::DeniedSubstring(s.clone()));
        }

        if let Some(p) = self.ocr_confusion.iter().find(|p| p.is_match(&name)) {
            rejections.push(DomainRejection::OcrConfusion(p.as_str().to_string()));
        }

        if let Some(p) = self.rejected_values.iter().find(|p| p.is_match(value)) {
            rejections.push(DomainRejection::RejectedValue(p.as_str().to_string()));
        }

        if let (Some(&minimum), Some(actual)) =
            (self.minimum_values.get(&name), numeric_magnitude(value))
        {
            if actual < u64::from(minimum) {
                rejections.push(DomainRejection::BelowMinimum { minimum, actual });
            }
        }

        rejections
    }

    pub fn is_valid(&self, entry: &ModEntry) -> bool {
        self.rejections(entry).is_empty()
    }

    /// Keeps the entries no rule rejects, in their original order.
    pub fn filter(&self, entries: &[ModEntry]) -> Vec<ModEntry> {
        entries
            .iter()
            .filter(|e| self.is_valid(e))
            .cloned()
            .collect()
    }
}

impl Default for DomainFilter {
    fn default() -> Self {
        DomainFilter::clone(&DEFAULT_DOMAIN_FILTER)
    }
}

/// Integer formed by the value's digits, ignoring sign and percent.
fn numeric_magnitude(value: &str) -> Option<u64> {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Counts before and after filtering, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub original_count: usize,
    pub filtered_count: usize,
    pub removed_count: usize,
    /// Percentage removed with one decimal, e.g. "25.0%"
    pub removal_rate: String,
}

impl FilterStats {
    pub fn new(original_count: usize, filtered_count: usize) -> Self {
        let removed_count = original_count.saturating_sub(filtered_count);
        let removal_rate = if original_count > 0 {
            format!("{:.1}%", removed_count as f64 / original_count as f64 * 100.0)
        } else {
            "0%".to_string()
        };
        Self {
            original_count,
            filtered_count,
            removed_count,
            removal_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(name: &str, value: &str) -> Vec<DomainRejection> {
        DEFAULT_DOMAIN_FILTER.rejections(&ModEntry::new(name, value))
    }

    #[test]
    fn test_real_modifiers_pass() {
        for (name, value) in [
            ("Damage Increase", "25%"),
            ("Hit Chance Increase", "15%"),
            ("Swing Speed Increase", "10%"),
            ("Lower Reagent Cost", "20%"),
            ("Hit Point Regeneration", "2"),
            ("Luck", "100"),
        ] {
            assert!(rejected(name, value).is_empty(), "{} {} should pass", name, value);
        }
    }

    #[test]
    fn test_denied_names_exact_match() {
        assert!(rejected("II", "5").contains(&DomainRejection::DeniedName));
        assert!(rejected("The", "5").contains(&DomainRejection::DeniedName));
        assert!(rejected("Quantity", "5").contains(&DomainRejection::DeniedName));
        assert!(rejected("Material", "5").contains(&DomainRejection::DeniedName));
        assert!(rejected("ltem", "5").contains(&DomainRejection::DeniedName));
    }

    #[test]
    fn test_durability_rejected_by_name_and_substring() {
        let result = rejected("Durability", "255");
        assert!(result.contains(&DomainRejection::DeniedName));
        assert!(result.contains(&DomainRejection::DeniedSubstring("durability".into())));
    }

    #[test]
    fn test_substring_net() {
        assert_eq!(
            rejected("Strength Requirement Bonus", "5").first(),
            Some(&DomainRejection::DeniedSubstring("strength requirement".into()))
        );
        assert!(rejected("Item Weight", "6")
            .contains(&DomainRejection::DeniedSubstring("weight".into())));
    }

    #[test]
    fn test_ocr_confusion_patterns() {
        let result = rejected("Durabllity", "255");
        assert!(matches!(result.as_slice(), [DomainRejection::OcrConfusion(_)]));

        assert!(!rejected("Welght", "6").is_empty());
        assert!(!rejected("Requlrement", "40").is_empty());
        assert!(!rejected("Prioriti", "1").is_empty());
    }

    #[test]
    fn test_rejected_values() {
        assert!(matches!(
            rejected("Mana Regeneration", "000").as_slice(),
            [DomainRejection::RejectedValue(_)]
        ));
        assert!(matches!(
            rejected("Mana Regeneration", "1000").as_slice(),
            [DomainRejection::RejectedValue(_)]
        ));
        assert!(matches!(
            rejected("Mana Regeneration", "2.5").as_slice(),
            [DomainRejection::RejectedValue(_)]
        ));
        assert!(rejected("Mana Regeneration", "999").is_empty());
    }

    #[test]
    fn test_minimum_value_rule() {
        assert_eq!(
            rejected("Swing Speed Increase", "4%"),
            vec![DomainRejection::BelowMinimum { minimum: 5, actual: 4 }]
        );
        assert!(rejected("Swing Speed Increase", "5%").is_empty());
        assert_eq!(
            rejected("Damage Increase", "0%"),
            vec![DomainRejection::BelowMinimum { minimum: 1, actual: 0 }]
        );
    }

    #[test]
    fn test_zero_value_with_minimum_reports_both_rules() {
        let result = rejected("Luck", "0");
        assert!(matches!(result[0], DomainRejection::RejectedValue(_)));
        assert!(result.contains(&DomainRejection::BelowMinimum { minimum: 1, actual: 0 }));
    }

    #[test]
    fn test_minimum_lookup_is_case_insensitive() {
        assert!(!rejected("  SWING speed INCREASE ", "2").is_empty());
    }

    #[test]
    fn test_custom_rules() {
        let mut rules = DomainRules::default();
        rules.minimum_values.insert("Faster Casting".into(), 2);
        rules.denied_names.push("Blessed".into());
        let filter = DomainFilter::new(&rules);

        assert!(!filter.is_valid(&ModEntry::new("Faster Casting", "1")));
        assert!(filter.is_valid(&ModEntry::new("Faster Casting", "2")));
        assert!(!filter.is_valid(&ModEntry::new("blessed", "1")));
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let rules = DomainRules {
            ocr_confusion_patterns: vec!["(unclosed".into(), r"(?i)we[il]ght".into()],
            ..DomainRules::default()
        };
        let filter = DomainFilter::new(&rules);
        assert_eq!(filter.ocr_confusion.len(), 1);
        assert!(!filter.is_valid(&ModEntry::new("Welght", "6")));
    }

    #[test]
    fn test_filter_keeps_order() {
        let entries = vec![
            ModEntry::new("Luck", "100"),
            ModEntry::new("Weight", "6"),
            ModEntry::new("Mana Increase", "8"),
        ];
        assert_eq!(
            DEFAULT_DOMAIN_FILTER.filter(&entries),
            vec![ModEntry::new("Luck", "100"), ModEntry::new("Mana Increase", "8")]
        );
    }

    #[test]
    fn test_filter_stats() {
        let stats = FilterStats::new(4, 3);
        assert_eq!(stats.removed_count, 1);
        assert_eq!(stats.removal_rate, "25.0%");
        assert_eq!(FilterStats::new(0, 0).removal_rate, "0%");
    }

    #[test]
    fn test_rejection_reasons() {
        assert_eq!(
            DomainRejection::BelowMinimum { minimum: 5, actual: 4 }.to_string(),
            "value 4 is below minimum 5"
        );
        assert_eq!(
            DomainRejection::DeniedSubstring("hue".into()).to_string(),
            "name contains \"hue\""
        );
    }
}
