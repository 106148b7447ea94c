//! Item name candidate validity.
//!
//! A line is a usable item name if its cleaned form has a sensible length,
//! uses allowed characters, matches no excluded pattern, and does not look
//! like a modifier line.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{compile_pattern, compile_patterns};
use crate::analysis::config::{NameValidation, TextPreprocessing};
use crate::ocr::preprocess::preprocess;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationReason {
    Valid,
    /// Fails length, character, or excluded-pattern checks
    InvalidFormat,
    /// Matches a modifier-text pattern
    LikelyModText,
}

/// Result of checking one name candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub reason: ValidationReason,
    /// Candidate after the configured preprocessing
    pub cleaned_text: String,
}

/// Compiled name validation rules.
#[derive(Debug, Clone)]
pub struct NameRules {
    min_length: usize,
    max_length: usize,
    /// `None` when the configured pattern does not compile; then no name passes
    allowed_characters: Option<Regex>,
    excluded: Vec<Regex>,
    mod_text: Vec<Regex>,
    debug_logging: bool,
}

impl NameRules {
    pub fn new(validation: &NameValidation, mod_text_patterns: &[String]) -> Self {
        Self {
            min_length: validation.min_length,
            max_length: validation.max_length,
            allowed_characters: compile_pattern(
                &validation.allowed_character_pattern,
                "allowed character",
            ),
            excluded: compile_patterns(&validation.excluded_patterns, "excluded"),
            mod_text: compile_patterns(mod_text_patterns, "mod text"),
            debug_logging: false,
        }
    }

    /// Emit a `debug!` line for every rejected name.
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    pub fn debug_logging(&self) -> bool {
        self.debug_logging
    }

    /// Length, character, and excluded-pattern checks on the cleaned name.
    pub fn is_valid_item_name(&self, name: &str) -> bool {
        let clean = clean_item_name(name);
        let length = clean.chars().count();

        if length < self.min_length || length > self.max_length {
            if self.debug_logging {
                tracing::debug!("Item name rejected (length {}): \"{}\"", length, clean);
            }
            return false;
        }

        match &self.allowed_characters {
            Some(allowed) if allowed.is_match(&clean) => {}
            _ => {
                if self.debug_logging {
                    tracing::debug!("Item name rejected (characters): \"{}\"", clean);
                }
                return false;
            }
        }

        if let Some(p) = self.excluded.iter().find(|p| p.is_match(&clean)) {
            if self.debug_logging {
                tracing::debug!("Item name rejected (excluded {}): \"{}\"", p.as_str(), clean);
            }
            return false;
        }

        true
    }

    /// True if the raw line matches any modifier-text pattern.
    pub fn is_likely_mod_text(&self, text: &str) -> bool {
        self.mod_text.iter().any(|p| p.is_match(text))
    }

    /// Full candidate check: format first, then modifier-likeness.
    pub fn check_candidate(&self, text: &str, preprocessing: &TextPreprocessing) -> ValidationOutcome {
        let cleaned_text = preprocess(text, preprocessing);

        let reason = if !self.is_valid_item_name(text) {
            ValidationReason::InvalidFormat
        } else if self.is_likely_mod_text(text) {
            ValidationReason::LikelyModText
        } else {
            ValidationReason::Valid
        };

        ValidationOutcome {
            is_valid: reason == ValidationReason::Valid,
            reason,
            cleaned_text,
        }
    }
}

impl Default for NameRules {
    fn default() -> Self {
        let config = crate::analysis::config::AnalysisConfig::default();
        Self::new(&config.name_validation, &config.mod_text_patterns)
    }
}

/// Strips everything but ASCII letters, digits, `_`, whitespace, `-`, `+`,
/// `(` and `)`, then collapses whitespace and trims.
pub fn clean_item_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| {
            c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-' | '+' | '(' | ')')
        })
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}
