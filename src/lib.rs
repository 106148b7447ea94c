//! OCR tooltip analysis for Ultima Online items.
//!
//! Turns the raw OCR text of an item tooltip into a list of modifier
//! name/value pairs and a suggested item name with a confidence score.
//!
//! ```text
//! text → preprocess → pattern extraction → structural check → domain filter → entries
//!      → name candidates → name validation → confidence → estimation (or fallback)
//! ```

pub mod analysis;
pub mod edit;
pub mod entry;
pub mod export;
pub mod naming;
pub mod ocr;
pub mod paths;
pub mod validate;

pub use analysis::{
    validate_configuration, AnalysisConfig, AnalysisConfigPatch, ConfigValidation,
    ExtractionReport, OcrAnalyzer, RejectedEntry, RejectionKind,
};
pub use entry::ModEntry;
pub use naming::{EstimationSource, NameEstimation};

use std::sync::LazyLock;

static DEFAULT_ANALYZER: LazyLock<OcrAnalyzer> = LazyLock::new(OcrAnalyzer::default);

/// Extracts the modifier entries of a tooltip under the given configuration.
pub fn extract_modifiers(text: &str, config: &AnalysisConfig) -> Vec<ModEntry> {
    if *config == *DEFAULT_ANALYZER.config() {
        DEFAULT_ANALYZER.extract_mods(text)
    } else {
        OcrAnalyzer::new(config.clone()).extract_mods(text)
    }
}

/// Suggests an item name using the default name rules. Never fails.
pub fn estimate_item_name(text: &str, modifiers: &[ModEntry]) -> NameEstimation {
    DEFAULT_ANALYZER.estimate_item_name(text, modifiers)
}
