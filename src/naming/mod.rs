//! Item name estimation.
//!
//! Picks the first usable name candidate from the OCR text and scores it, or
//! manufactures a timestamped fallback name when no line qualifies.

pub mod confidence;
pub mod estimator;

pub use confidence::{
    confidence_report, select_best, select_best_breakdown, Adjustment, AdjustmentKind,
    ConfidenceBreakdown,
};
pub use estimator::{
    should_auto_fill, source_priority, CandidateVerdict, EstimationTrace, ItemNameEstimator,
    AUTO_FILL_THRESHOLD, MIN_CONFIDENCE,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a suggested name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationSource {
    /// A line of the OCR text
    Ocr,
    /// Synthesized from the modifier count and a timestamp
    Fallback,
}

impl fmt::Display for EstimationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimationSource::Ocr => write!(f, "ocr"),
            EstimationSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// The externally consumed name suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameEstimation {
    pub suggested_name: String,
    /// Heuristic trust in the name, 0.0 to 1.0
    pub confidence: f64,
    pub source: EstimationSource,
}
