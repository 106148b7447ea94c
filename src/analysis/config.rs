//! Analysis configuration loaded from config.json.
//!
//! If the config file doesn't exist or can't be parsed, the Ultima Online
//! defaults are used. Every section is `#[serde(default)]`, so a config file
//! only needs the values it overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Default pattern for "name value" pairs: letters/spaces, whitespace, number with optional %.
pub const DEFAULT_MOD_PATTERN: &str = r"([A-Za-z ]+)\s(\d+%?|\d+)";

/// Complete analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Two-group pattern locating modifier name and value
    pub mod_pattern: String,
    /// Run the Ultima Online denoising pass after the structural pass
    pub apply_domain_filter: bool,
    /// Emit per-entry rejection diagnostics and a filtering summary
    pub enable_debug_logging: bool,
    /// Rules a line must satisfy to be used as an item name
    pub name_validation: NameValidation,
    /// A line matching any of these looks like a modifier, not a name
    pub mod_text_patterns: Vec<String>,
    /// Whitespace and line cleanup applied before extraction
    pub text_preprocessing: TextPreprocessing,
    /// Lookup tables used by the domain filter
    pub domain_rules: DomainRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameValidation {
    /// Minimum cleaned name length, in characters
    pub min_length: usize,
    /// Maximum cleaned name length, in characters
    pub max_length: usize,
    /// The whole cleaned name must match this
    pub allowed_character_pattern: String,
    /// The cleaned name must match none of these
    pub excluded_patterns: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextPreprocessing {
    /// Collapse whitespace runs inside each line to a single space
    pub normalize_whitespace: bool,
    /// Drop lines that are empty after the other steps
    pub remove_empty_lines: bool,
    /// Trim leading and trailing whitespace of each line
    pub trim_lines: bool,
}

/// Lookup tables for the domain filter.
///
/// The deny tables and the minimum-value table are maintained independently.
/// Names are compared lower-cased and trimmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainRules {
    /// Exact-match names that are OCR artifacts or item attributes
    pub denied_names: Vec<String>,
    /// Substrings that reject a name wherever they appear
    pub denied_substrings: Vec<String>,
    /// Patterns catching misread spellings of attribute words
    pub ocr_confusion_patterns: Vec<String>,
    /// Values matching any of these are rejected
    pub rejected_value_patterns: Vec<String>,
    /// Minimum meaningful integer value per modifier name
    pub minimum_values: BTreeMap<String, u32>,
}

/// Partial update for [`AnalysisConfig`]. `None` keeps the current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisConfigPatch {
    pub mod_pattern: Option<String>,
    pub apply_domain_filter: Option<bool>,
    pub enable_debug_logging: Option<bool>,
    pub name_validation: Option<NameValidation>,
    pub mod_text_patterns: Option<Vec<String>>,
    pub text_preprocessing: Option<TextPreprocessing>,
    pub domain_rules: Option<DomainRules>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            mod_pattern: DEFAULT_MOD_PATTERN.to_string(),
            apply_domain_filter: true,
            enable_debug_logging: false,
            name_validation: NameValidation::default(),
            mod_text_patterns: strings(&[
                r"\d+%",
                r"\+\d+",
                r"(?i)resist",
                r"(?i)increase",
                r"(?i)regeneration",
                r"(?i)damage",
                r"(?i)hit\s+chance",
                r"(?i)defense\s+chance",
            ]),
            text_preprocessing: TextPreprocessing::default(),
            domain_rules: DomainRules::default(),
        }
    }
}

impl Default for NameValidation {
    fn default() -> Self {
        Self {
            min_length: 2,
            max_length: 60,
            allowed_character_pattern: r"^[\w\s\-\+\(\)]+$".to_string(),
            excluded_patterns: strings(&[
                r"^[\d\s\+\-%\(\)]+$", // digits and symbols only
                r"^\d+\s*%?\s*$",      // bare number or percentage
                r"^[\+\-]\d+",         // sign-prefixed number
            ]),
        }
    }
}

impl Default for TextPreprocessing {
    fn default() -> Self {
        Self {
            normalize_whitespace: true,
            remove_empty_lines: true,
            trim_lines: true,
        }
    }
}

impl Default for DomainRules {
    fn default() -> Self {
        Self {
            denied_names: strings(&[
                // roman numerals
                "i", "ii", "iii", "iv", "v",
                // stray characters
                "o", "0", "l", "1",
                // articles and prepositions
                "the", "of", "and", "to", "in",
                // item description text
                "ltem", "ltems", "equipment",
                // equipment info
                "durability", "uses", "range",
                // item attributes
                "hue", "priority",
                "weight", "amount", "quantity", "count",
                "layer", "type", "material",
                // requirements
                "strength requirement", "requirement",
            ]),
            denied_substrings: strings(&[
                "durability",
                "durabitity",
                "durabiiity",
                "hue",
                "priority",
                "weight",
                "uses",
                "strength requirement",
                "requirement",
            ]),
            ocr_confusion_patterns: strings(&[
                r"(?i)durab[il]+[it]+y",
                r"(?i)priorit[iy]",
                r"(?i)we[il]ght",
                r"(?i)strength\s+requ[il]rement",
                r"(?i)requ[il]rement",
            ]),
            rejected_value_patterns: strings(&[
                r"^0+$",        // all zeros
                r"^\d{4,}$",    // implausibly large
                r"^[+\-]?\d*\.", // decimal
            ]),
            minimum_values: [
                ("damage increase", 1),
                ("hit chance increase", 1),
                ("swing speed increase", 5),
                ("luck", 1),
                ("lower reagent cost", 1),
                ("lower mana cost", 1),
                ("mana increase", 1),
                ("stamina increase", 1),
                ("hit point increase", 1),
            ]
            .into_iter()
            .map(|(name, min)| (name.to_string(), min))
            .collect(),
        }
    }
}

impl AnalysisConfig {
    /// Loose preset: no domain filter, wide length bounds, no excluded patterns.
    pub fn permissive() -> Self {
        let defaults = Self::default();
        Self {
            apply_domain_filter: false,
            enable_debug_logging: true,
            name_validation: NameValidation {
                min_length: 1,
                max_length: 100,
                excluded_patterns: Vec::new(),
                ..defaults.name_validation.clone()
            },
            ..defaults
        }
    }

    /// Returns a copy with every `Some` field of the patch applied.
    pub fn merged(&self, patch: AnalysisConfigPatch) -> Self {
        let current = self.clone();
        Self {
            mod_pattern: patch.mod_pattern.unwrap_or(current.mod_pattern),
            apply_domain_filter: patch
                .apply_domain_filter
                .unwrap_or(current.apply_domain_filter),
            enable_debug_logging: patch
                .enable_debug_logging
                .unwrap_or(current.enable_debug_logging),
            name_validation: patch.name_validation.unwrap_or(current.name_validation),
            mod_text_patterns: patch.mod_text_patterns.unwrap_or(current.mod_text_patterns),
            text_preprocessing: patch
                .text_preprocessing
                .unwrap_or(current.text_preprocessing),
            domain_rules: patch.domain_rules.unwrap_or(current.domain_rules),
        }
    }

    /// Load config from file, or return defaults if it is missing or invalid.
    pub fn load(config_path: &Path) -> Self {
        if config_path.exists() {
            match fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => {
                        tracing::info!("Loaded analysis config from {}", config_path.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse analysis config: {}. Using defaults.", e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read analysis config: {}. Using defaults.", e);
                }
            }
        } else {
            tracing::info!(
                "{} not found. Using default config.",
                config_path.display()
            );
        }
        Self::default()
    }

    /// Load config from file, failing on a missing or malformed file.
    pub fn load_strict(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", config_path.display()))
    }

    /// Save config as pretty JSON.
    pub fn save(&self, config_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(config_path, json)
            .with_context(|| format!("Failed to write config: {}", config_path.display()))
    }
}
