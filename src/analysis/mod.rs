//! Configurable tooltip analysis.
//!
//! This module provides:
//! - `OcrAnalyzer`, holding an immutable configuration snapshot and its compiled patterns
//! - Modifier extraction: preprocess → pattern → structural pass → domain pass
//! - Item name estimation with the analyzer's name rules
//! - Configuration validation

pub mod config;

pub use config::{AnalysisConfig, AnalysisConfigPatch, DomainRules, NameValidation, TextPreprocessing};

use chrono::{DateTime, Local};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

use crate::entry::{structural_rejections, ModEntry, StructuralRejection};
use crate::naming::{EstimationTrace, ItemNameEstimator, NameEstimation};
use crate::ocr::{extract_pairs, preprocess};
use crate::validate::domain::{DomainFilter, DomainRejection, FilterStats, DEFAULT_DOMAIN_FILTER};
use crate::validate::name::ValidationOutcome;
use crate::validate::compile_pattern;

/// Why an extracted entry did not make it into the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionKind {
    Structural(StructuralRejection),
    Domain(DomainRejection),
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionKind::Structural(r) => write!(f, "structural: {}", r),
            RejectionKind::Domain(r) => write!(f, "domain: {}", r),
        }
    }
}

/// An extracted entry together with every rule that rejected it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    pub entry: ModEntry,
    pub kinds: Vec<RejectionKind>,
}

impl RejectedEntry {
    pub fn reasons(&self) -> Vec<String> {
        self.kinds.iter().map(|k| k.to_string()).collect()
    }
}

/// Full account of one extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionReport {
    /// Every pair the pattern matched, in text order
    pub raw: Vec<ModEntry>,
    /// Entries that passed every enabled pass
    pub accepted: Vec<ModEntry>,
    pub rejected: Vec<RejectedEntry>,
    pub stats: FilterStats,
}

/// Outcome of [`validate_configuration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Patterns compiled from one configuration snapshot.
#[derive(Debug)]
struct CompiledRules {
    mod_pattern: Option<Regex>,
    domain: Arc<DomainFilter>,
    estimator: ItemNameEstimator,
}

impl CompiledRules {
    fn new(config: &AnalysisConfig) -> Self {
        let domain = if config.domain_rules == DomainRules::default() {
            Arc::clone(&*DEFAULT_DOMAIN_FILTER)
        } else {
            Arc::new(DomainFilter::new(&config.domain_rules))
        };

        Self {
            mod_pattern: compile_pattern(&config.mod_pattern, "mod"),
            domain,
            estimator: ItemNameEstimator::from_config(config),
        }
    }
}

/// Tooltip analyzer bound to one configuration snapshot.
///
/// Cloning is cheap and shares the snapshot. [`OcrAnalyzer::update_config`]
/// builds a new snapshot instead of mutating the shared one, so a clone handed
/// to another thread keeps seeing the configuration it started with.
#[derive(Debug, Clone)]
pub struct OcrAnalyzer {
    config: Arc<AnalysisConfig>,
    rules: Arc<CompiledRules>,
}

impl OcrAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        let rules = CompiledRules::new(&config);
        Self {
            config: Arc::new(config),
            rules: Arc::new(rules),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Shared handle to the current configuration.
    pub fn snapshot(&self) -> Arc<AnalysisConfig> {
        Arc::clone(&self.config)
    }

    /// Applies a partial update, replacing the snapshot.
    pub fn update_config(&mut self, patch: AnalysisConfigPatch) {
        *self = Self::new(self.config.merged(patch));
    }

    /// Runs the configured text preprocessing.
    pub fn preprocess(&self, text: &str) -> String {
        preprocess(text, &self.config.text_preprocessing)
    }

    /// Extracts modifier entries that pass every enabled pass.
    pub fn extract_mods(&self, text: &str) -> Vec<ModEntry> {
        self.extract_with_report(text).accepted
    }

    /// Extracts modifier entries and explains every rejection.
    pub fn extract_with_report(&self, text: &str) -> ExtractionReport {
        let preprocessed = self.preprocess(text);

        let raw: Vec<ModEntry> = match &self.rules.mod_pattern {
            Some(pattern) => extract_pairs(&preprocessed, pattern)
                .into_iter()
                .map(|(name, value)| ModEntry { name, value })
                .collect(),
            None => Vec::new(),
        };

        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for entry in &raw {
            let kinds = self.rejections(entry);
            if kinds.is_empty() {
                accepted.push(entry.clone());
            } else {
                if self.config.enable_debug_logging {
                    let reasons: Vec<String> = kinds.iter().map(|k| k.to_string()).collect();
                    tracing::debug!("Rejected \"{}\": {}", entry, reasons.join("; "));
                }
                rejected.push(RejectedEntry {
                    entry: entry.clone(),
                    kinds,
                });
            }
        }

        let stats = FilterStats::new(raw.len(), accepted.len());
        if self.config.enable_debug_logging && stats.removed_count > 0 {
            tracing::info!(
                "OCR analysis: {} -> {} ({} removed)",
                stats.original_count,
                stats.filtered_count,
                stats.removal_rate
            );
        }

        ExtractionReport {
            raw,
            accepted,
            rejected,
            stats,
        }
    }

    /// Structural rules first; domain rules only for structurally valid entries.
    fn rejections(&self, entry: &ModEntry) -> Vec<RejectionKind> {
        let structural = structural_rejections(entry);
        if !structural.is_empty() {
            return structural.into_iter().map(RejectionKind::Structural).collect();
        }
        if !self.config.apply_domain_filter {
            return Vec::new();
        }
        self.rules
            .domain
            .rejections(entry)
            .into_iter()
            .map(RejectionKind::Domain)
            .collect()
    }

    pub fn is_valid_item_name(&self, name: &str) -> bool {
        self.rules.estimator.rules().is_valid_item_name(name)
    }

    pub fn is_likely_mod_text(&self, text: &str) -> bool {
        self.rules.estimator.rules().is_likely_mod_text(text)
    }

    /// Checks whether a line can serve as the item name.
    pub fn check_name_candidate(&self, text: &str) -> ValidationOutcome {
        self.rules
            .estimator
            .rules()
            .check_candidate(text, &self.config.text_preprocessing)
    }

    pub fn estimate_item_name(&self, text: &str, modifiers: &[ModEntry]) -> NameEstimation {
        self.rules.estimator.estimate(text, modifiers)
    }

    pub fn estimate_item_name_at(
        &self,
        text: &str,
        modifiers: &[ModEntry],
        now: DateTime<Local>,
    ) -> NameEstimation {
        self.rules.estimator.estimate_at(text, modifiers, now)
    }

    pub fn trace_item_name(&self, text: &str, modifiers: &[ModEntry]) -> EstimationTrace {
        self.rules.estimator.trace_at(text, modifiers, Local::now())
    }

    pub fn validate(&self) -> ConfigValidation {
        validate_configuration(&self.config)
    }
}

impl Default for OcrAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

/// Checks that every pattern in the configuration compiles.
///
/// Semantic sanity (e.g. an allowed-character pattern that matches nothing)
/// is not checked.
pub fn validate_configuration(config: &AnalysisConfig) -> ConfigValidation {
    let mut errors = Vec::new();

    let mut check = |pattern: &str, label: String| {
        if let Err(e) = Regex::new(pattern) {
            errors.push(format!("Invalid {}: {}", label, e));
        }
    };

    check(&config.mod_pattern, "mod pattern".to_string());
    check(
        &config.name_validation.allowed_character_pattern,
        "allowed character pattern".to_string(),
    );
    for (i, p) in config.name_validation.excluded_patterns.iter().enumerate() {
        check(p, format!("excluded pattern #{}", i));
    }
    for (i, p) in config.mod_text_patterns.iter().enumerate() {
        check(p, format!("mod text pattern #{}", i));
    }
    for (i, p) in config.domain_rules.ocr_confusion_patterns.iter().enumerate() {
        check(p, format!("OCR confusion pattern #{}", i));
    }
    for (i, p) in config.domain_rules.rejected_value_patterns.iter().enumerate() {
        check(p, format!("rejected value pattern #{}", i));
    }

    ConfigValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}
