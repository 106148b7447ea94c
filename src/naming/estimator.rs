use chrono::{DateTime, Local};
use serde::Serialize;

use super::confidence::{
    fallback_breakdown, score_with_details, Adjustment, AdjustmentKind, ConfidenceBreakdown,
};
use super::{EstimationSource, NameEstimation};
use crate::analysis::config::{AnalysisConfig, TextPreprocessing};
use crate::entry::ModEntry;
use crate::ocr::candidates::{extract_candidates, parse_lines, NameCandidate};
use crate::validate::name::{NameRules, ValidationOutcome};

/// Estimations at or above this are confident enough to pre-fill a name field.
pub const AUTO_FILL_THRESHOLD: f64 = 0.3;

/// Estimations below this are replaced by a fallback name at exactly this confidence.
pub const MIN_CONFIDENCE: f64 = 0.1;

/// One candidate and how validation judged it.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateVerdict {
    pub candidate: NameCandidate,
    pub outcome: ValidationOutcome,
}

/// Everything the estimator looked at, for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct EstimationTrace {
    pub estimation: NameEstimation,
    pub breakdown: ConfidenceBreakdown,
    /// Candidates checked, in order, up to and including the first valid one
    pub verdicts: Vec<CandidateVerdict>,
}

/// Suggests an item name from OCR text.
///
/// Two stages, each run at most once:
/// 1. OCR-derived: the first candidate line that validates wins and is scored.
///    Later candidates are not compared against it.
/// 2. Fallback: a timestamped name with fixed confidence.
///
/// A result below [`MIN_CONFIDENCE`] is replaced by a minimum-confidence
/// fallback name. Never fails.
#[derive(Debug, Clone, Default)]
pub struct ItemNameEstimator {
    rules: NameRules,
    preprocessing: TextPreprocessing,
}

impl ItemNameEstimator {
    pub fn new(rules: NameRules, preprocessing: TextPreprocessing) -> Self {
        Self {
            rules,
            preprocessing,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            NameRules::new(&config.name_validation, &config.mod_text_patterns)
                .with_debug_logging(config.enable_debug_logging),
            config.text_preprocessing,
        )
    }

    pub fn rules(&self) -> &NameRules {
        &self.rules
    }

    /// Estimates using the current local time for fallback names.
    pub fn estimate(&self, text: &str, modifiers: &[ModEntry]) -> NameEstimation {
        self.estimate_at(text, modifiers, Local::now())
    }

    pub fn estimate_at(
        &self,
        text: &str,
        modifiers: &[ModEntry],
        now: DateTime<Local>,
    ) -> NameEstimation {
        self.trace_at(text, modifiers, now).estimation
    }

    /// Runs the estimation and keeps every intermediate verdict.
    pub fn trace_at(
        &self,
        text: &str,
        modifiers: &[ModEntry],
        now: DateTime<Local>,
    ) -> EstimationTrace {
        let mut verdicts = Vec::new();

        let trace = match self.try_ocr_derived(text, &mut verdicts) {
            Some((suggested_name, breakdown)) => EstimationTrace {
                estimation: NameEstimation {
                    suggested_name,
                    confidence: breakdown.final_score,
                    source: EstimationSource::Ocr,
                },
                breakdown,
                verdicts,
            },
            None => {
                let breakdown = fallback_breakdown(modifiers.len());
                EstimationTrace {
                    estimation: NameEstimation {
                        suggested_name: fallback_name(modifiers.len(), now),
                        confidence: breakdown.final_score,
                        source: EstimationSource::Fallback,
                    },
                    breakdown,
                    verdicts,
                }
            }
        };

        apply_confidence_floor(trace, now)
    }

    fn try_ocr_derived(
        &self,
        text: &str,
        verdicts: &mut Vec<CandidateVerdict>,
    ) -> Option<(String, ConfidenceBreakdown)> {
        let lines = parse_lines(text, &self.preprocessing);
        if lines.is_empty() {
            return None;
        }

        for candidate in extract_candidates(&lines) {
            let outcome = self.rules.check_candidate(&candidate.text, &self.preprocessing);
            let valid = outcome.is_valid;
            let result = valid.then(|| {
                (
                    outcome.cleaned_text.clone(),
                    score_with_details(&candidate, &outcome),
                )
            });
            verdicts.push(CandidateVerdict { candidate, outcome });
            if result.is_some() {
                return result;
            }
        }

        if self.rules.debug_logging() {
            tracing::debug!("No usable item name among {} lines", lines.len());
        }
        None
    }
}

fn apply_confidence_floor(trace: EstimationTrace, now: DateTime<Local>) -> EstimationTrace {
    if trace.estimation.confidence >= MIN_CONFIDENCE {
        return trace;
    }

    EstimationTrace {
        estimation: NameEstimation {
            suggested_name: fallback_name(0, now),
            confidence: MIN_CONFIDENCE,
            source: EstimationSource::Fallback,
        },
        breakdown: ConfidenceBreakdown {
            source: EstimationSource::Fallback,
            base_score: MIN_CONFIDENCE,
            adjustments: vec![Adjustment {
                kind: AdjustmentKind::Floor,
                delta: 0.0,
                reason: format!(
                    "Confidence {:.2} below minimum {:.2}",
                    trace.estimation.confidence, MIN_CONFIDENCE
                ),
            }],
            final_score: MIN_CONFIDENCE,
        },
        verdicts: trace.verdicts,
    }
}

/// `"<N>-modifier item MM/DD HH:MM"`, or `"item MM/DD HH:MM"` without modifiers.
pub fn fallback_name(mod_count: usize, now: DateTime<Local>) -> String {
    let timestamp = now.format("%m/%d %H:%M");
    if mod_count == 0 {
        format!("item {}", timestamp)
    } else {
        format!("{}-modifier item {}", mod_count, timestamp)
    }
}

/// True if the estimation should pre-populate the name field.
pub fn should_auto_fill(estimation: &NameEstimation) -> bool {
    estimation.confidence >= AUTO_FILL_THRESHOLD
}

/// Ranking of sources for callers merging several suggestions.
pub fn source_priority(source: EstimationSource) -> u8 {
    match source {
        EstimationSource::Ocr => 3,
        EstimationSource::Fallback => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::candidates::Priority;
    use crate::validate::name::ValidationReason;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap()
    }

    fn estimate(text: &str, modifiers: &[ModEntry]) -> NameEstimation {
        ItemNameEstimator::default().estimate_at(text, modifiers, fixed_now())
    }

    #[test]
    fn test_first_line_name() {
        let text = "Katana\nDamage Increase 25%\nHit Chance Increase 15%\nSwing Speed Increase 10%\nDurability 255/255";
        let result = estimate(text, &[]);

        assert_eq!(result.suggested_name, "Katana");
        assert_eq!(result.source, EstimationSource::Ocr);
        assert!(result.confidence >= 0.9 && result.confidence <= 1.0);
    }

    #[test]
    fn test_modifier_first_line_falls_through_to_second() {
        let text = "Damage Increase 25%\nExceptional Katana\nHit Chance Increase 15%";
        let trace = ItemNameEstimator::default().trace_at(text, &[], fixed_now());

        assert_eq!(trace.estimation.suggested_name, "Exceptional Katana");
        assert_eq!(trace.verdicts.len(), 2);
        assert_eq!(trace.verdicts[0].outcome.reason, ValidationReason::LikelyModText);
        assert_eq!(trace.verdicts[1].candidate.priority, Priority::Secondary);
        assert!((trace.estimation.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_first_valid_candidate_wins_without_comparison() {
        // "Exceptional Katana" would score 0.9, but "ab" validates first
        let result = estimate("Damage Increase 25%\nab\nExceptional Katana", &[]);
        assert_eq!(result.suggested_name, "ab");
        assert!((result.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_first_line_is_never_chosen() {
        let result = estimate("25%\nKatana", &[]);
        assert_eq!(result.suggested_name, "Katana");
        assert!((result.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_only_fourth_line_valid_falls_back() {
        let text = "Damage Increase 25%\nMana Increase 8\nFire Resist 10%\nKatana";
        let mods = vec![ModEntry::new("Damage Increase", "25%")];
        let result = estimate(text, &mods);

        assert_eq!(result.source, EstimationSource::Fallback);
        assert_eq!(result.confidence, 0.3);
        assert_eq!(result.suggested_name, "1-modifier item 03/07 09:05");
    }

    #[test]
    fn test_empty_text_fallback() {
        let result = estimate("", &[]);
        assert_eq!(result.source, EstimationSource::Fallback);
        assert_eq!(result.confidence, 0.2);
        assert_eq!(result.suggested_name, "item 03/07 09:05");
        assert!(!should_auto_fill(&result));
    }

    #[test]
    fn test_whitespace_only_text_fallback() {
        let mods = vec![ModEntry::new("Luck", "100"), ModEntry::new("Mana Increase", "8")];
        let result = estimate("  \n\t\n ", &mods);
        assert_eq!(result.confidence, 0.3);
        assert_eq!(result.suggested_name, "2-modifier item 03/07 09:05");
        assert!(should_auto_fill(&result));
    }

    #[test]
    fn test_confidence_floor() {
        let weak = EstimationTrace {
            estimation: NameEstimation {
                suggested_name: "x".into(),
                confidence: 0.05,
                source: EstimationSource::Ocr,
            },
            breakdown: fallback_breakdown(0),
            verdicts: Vec::new(),
        };
        let floored = apply_confidence_floor(weak, fixed_now());

        assert_eq!(floored.estimation.confidence, MIN_CONFIDENCE);
        assert_eq!(floored.estimation.source, EstimationSource::Fallback);
        assert_eq!(floored.estimation.suggested_name, "item 03/07 09:05");
        assert_eq!(floored.breakdown.adjustments[0].kind, AdjustmentKind::Floor);
    }

    #[test]
    fn test_non_empty_line_always_yields_name() {
        for text in ["!!!", "25%", "Katana", "Damage 5\n+5\n10%"] {
            let result = estimate(text, &[]);
            assert!(!result.suggested_name.is_empty());
            assert!((0.0..=1.0).contains(&result.confidence));
        }
    }

    #[test]
    fn test_from_config_carries_debug_flag() {
        let quiet = ItemNameEstimator::from_config(&AnalysisConfig::default());
        assert!(!quiet.rules().debug_logging());

        let verbose = ItemNameEstimator::from_config(&AnalysisConfig::permissive());
        assert!(verbose.rules().debug_logging());
    }

    #[test]
    fn test_source_priority() {
        assert!(source_priority(EstimationSource::Ocr) > source_priority(EstimationSource::Fallback));
    }
}
