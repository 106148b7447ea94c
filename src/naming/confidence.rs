use serde::Serialize;
use std::fmt;

use super::{EstimationSource, NameEstimation};
use crate::ocr::candidates::{NameCandidate, Priority};
use crate::validate::name::ValidationOutcome;

/// Fallback confidence when no modifiers were extracted.
pub const FALLBACK_CONFIDENCE_NO_MODS: f64 = 0.2;

/// Fallback confidence when at least one modifier was extracted.
pub const FALLBACK_CONFIDENCE_WITH_MODS: f64 = 0.3;

/// Cleaned names within this length range (in characters) earn a bonus.
const GOOD_LENGTH: std::ops::RangeInclusive<usize> = 3..=30;
const LENGTH_BONUS: f64 = 0.10;

const LETTER_RATIO_THRESHOLD: f64 = 0.6;
const LETTER_RATIO_BONUS: f64 = 0.05;

const NO_SPECIAL_CHARS_BONUS: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Candidate failed validation
    Validation,
    TextLength,
    LetterRatio,
    NoSpecialCharacters,
    /// Negative adjustment keeping the total at 1.0
    Cap,
    FallbackBase,
    /// Replacement of a too-weak estimation by the minimum-confidence fallback
    Floor,
}

impl fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdjustmentKind::Validation => "validation",
            AdjustmentKind::TextLength => "text_length",
            AdjustmentKind::LetterRatio => "letter_ratio",
            AdjustmentKind::NoSpecialCharacters => "no_special_characters",
            AdjustmentKind::Cap => "cap",
            AdjustmentKind::FallbackBase => "fallback_base",
            AdjustmentKind::Floor => "floor",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Adjustment {
    pub kind: AdjustmentKind,
    pub delta: f64,
    pub reason: String,
}

/// Auditable score: `final_score == base_score + sum of deltas`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceBreakdown {
    pub source: EstimationSource,
    pub base_score: f64,
    pub adjustments: Vec<Adjustment>,
    pub final_score: f64,
}

/// Base confidence from the candidate's line position.
pub fn position_score(priority: Priority) -> f64 {
    match priority {
        Priority::Primary => 0.9,
        Priority::Secondary => 0.7,
    }
}

/// Scores an OCR-derived candidate. Invalid candidates score exactly 0.
pub fn score(candidate: &NameCandidate, validation: &ValidationOutcome) -> f64 {
    score_with_details(candidate, validation).final_score
}

/// Scores an OCR-derived candidate and records every adjustment.
pub fn score_with_details(
    candidate: &NameCandidate,
    validation: &ValidationOutcome,
) -> ConfidenceBreakdown {
    if !validation.is_valid {
        return ConfidenceBreakdown {
            source: EstimationSource::Ocr,
            base_score: 0.0,
            adjustments: vec![Adjustment {
                kind: AdjustmentKind::Validation,
                delta: 0.0,
                reason: format!("Invalid: {:?}", validation.reason),
            }],
            final_score: 0.0,
        };
    }

    let base_score = position_score(candidate.priority);
    let mut adjustments = text_quality(&validation.cleaned_text);

    let total: f64 = base_score + adjustments.iter().map(|a| a.delta).sum::<f64>();
    if total > 1.0 {
        adjustments.push(Adjustment {
            kind: AdjustmentKind::Cap,
            delta: 1.0 - total,
            reason: "Capped at 100%".to_string(),
        });
    }

    ConfidenceBreakdown {
        source: EstimationSource::Ocr,
        base_score,
        adjustments,
        final_score: total.min(1.0),
    }
}

/// Bonuses for length, letter share, and absence of special characters.
fn text_quality(text: &str) -> Vec<Adjustment> {
    let mut adjustments = Vec::new();
    let length = text.chars().count();

    if GOOD_LENGTH.contains(&length) {
        adjustments.push(Adjustment {
            kind: AdjustmentKind::TextLength,
            delta: LENGTH_BONUS,
            reason: format!("Good length ({} chars)", length),
        });
    }

    if length > 0 {
        let letters = text.chars().filter(|c| c.is_ascii_alphabetic()).count();
        let ratio = letters as f64 / length as f64;
        if ratio > LETTER_RATIO_THRESHOLD {
            adjustments.push(Adjustment {
                kind: AdjustmentKind::LetterRatio,
                delta: LETTER_RATIO_BONUS,
                reason: format!("High letter ratio ({:.0}%)", ratio * 100.0),
            });
        }
    }

    let special = text
        .chars()
        .filter(|c| !c.is_ascii_alphanumeric() && *c != ' ')
        .count();
    if special == 0 {
        adjustments.push(Adjustment {
            kind: AdjustmentKind::NoSpecialCharacters,
            delta: NO_SPECIAL_CHARS_BONUS,
            reason: "No special characters".to_string(),
        });
    }

    adjustments
}

/// Fixed fallback confidence: 0.2 without modifiers, 0.3 with.
pub fn fallback_confidence(mod_count: usize) -> f64 {
    if mod_count == 0 {
        FALLBACK_CONFIDENCE_NO_MODS
    } else {
        FALLBACK_CONFIDENCE_WITH_MODS
    }
}

pub fn fallback_breakdown(mod_count: usize) -> ConfidenceBreakdown {
    let score = fallback_confidence(mod_count);
    let reason = if mod_count == 0 {
        "No modifiers - minimum fallback confidence".to_string()
    } else {
        format!("{} modifiers available - standard fallback confidence", mod_count)
    };
    ConfidenceBreakdown {
        source: EstimationSource::Fallback,
        base_score: score,
        adjustments: vec![Adjustment {
            kind: AdjustmentKind::FallbackBase,
            delta: 0.0,
            reason,
        }],
        final_score: score,
    }
}

/// Highest confidence wins; on ties the earliest estimation is kept.
pub fn select_best(estimations: &[NameEstimation]) -> Option<&NameEstimation> {
    estimations.iter().fold(None, |best, current| match best {
        Some(b) if current.confidence <= b.confidence => Some(b),
        _ => Some(current),
    })
}

/// Same selection rule as [`select_best`], over breakdowns.
pub fn select_best_breakdown(breakdowns: &[ConfidenceBreakdown]) -> Option<&ConfidenceBreakdown> {
    breakdowns.iter().fold(None, |best, current| match best {
        Some(b) if current.final_score <= b.final_score => Some(b),
        _ => Some(current),
    })
}

fn percent(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

/// Human-readable audit of one or more breakdowns and the selected one.
pub fn confidence_report(breakdowns: &[ConfidenceBreakdown]) -> String {
    let Some(best) = select_best_breakdown(breakdowns) else {
        return "No calculations available".to_string();
    };

    let mut lines = vec![
        "Confidence Calculation Report".to_string(),
        "=".repeat(40),
    ];

    for (index, b) in breakdowns.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("{}. {} method:", index + 1, b.source.to_string().to_uppercase()));
        lines.push(format!("   Base score: {}%", percent(b.base_score)));
        for adj in &b.adjustments {
            let sign = if adj.delta >= 0.0 { "+" } else { "" };
            lines.push(format!(
                "   {}: {}{}% ({})",
                adj.kind,
                sign,
                percent(adj.delta),
                adj.reason
            ));
        }
        lines.push(format!("   Final score: {}%", percent(b.final_score)));
    }

    lines.push(String::new());
    lines.push(format!(
        "Selected: {} ({}%)",
        best.source.to_string().to_uppercase(),
        percent(best.final_score)
    ));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::name::ValidationReason;

    fn candidate(text: &str, priority: Priority) -> NameCandidate {
        NameCandidate {
            text: text.to_string(),
            line_index: 0,
            priority,
        }
    }

    fn valid(text: &str) -> ValidationOutcome {
        ValidationOutcome {
            is_valid: true,
            reason: ValidationReason::Valid,
            cleaned_text: text.to_string(),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_invalid_scores_zero() {
        let outcome = ValidationOutcome {
            is_valid: false,
            reason: ValidationReason::LikelyModText,
            cleaned_text: "Damage Increase 25%".into(),
        };
        let c = candidate("Damage Increase 25%", Priority::Primary);
        assert_eq!(score(&c, &outcome), 0.0);

        let details = score_with_details(&c, &outcome);
        assert_eq!(details.adjustments[0].kind, AdjustmentKind::Validation);
        assert_eq!(details.final_score, 0.0);
    }

    #[test]
    fn test_primary_clean_name_capped_at_one() {
        let c = candidate("Katana", Priority::Primary);
        let details = score_with_details(&c, &valid("Katana"));

        assert_eq!(details.base_score, 0.9);
        assert_eq!(details.final_score, 1.0);
        assert_eq!(details.adjustments.last().unwrap().kind, AdjustmentKind::Cap);
    }

    #[test]
    fn test_secondary_clean_name() {
        let c = candidate("Exceptional Katana", Priority::Secondary);
        assert!(approx(score(&c, &valid("Exceptional Katana")), 0.9));
    }

    #[test]
    fn test_quality_bonuses_individually() {
        let c = candidate("", Priority::Secondary);

        // Too long, letters only, no specials
        let long = "a".repeat(31);
        assert!(approx(score(&c, &valid(&long)), 0.8));

        // Good length, low letter ratio, special character
        assert!(approx(score(&c, &valid("12-34")), 0.8));

        // Good length, letters, one special character
        assert!(approx(score(&c, &valid("Ring (+5)")), 0.8));
    }

    #[test]
    fn test_breakdown_sums_to_final() {
        for (text, priority) in [
            ("Katana", Priority::Primary),
            ("Ring (+5)", Priority::Secondary),
            ("ab", Priority::Secondary),
        ] {
            let d = score_with_details(&candidate(text, priority), &valid(text));
            let sum: f64 = d.base_score + d.adjustments.iter().map(|a| a.delta).sum::<f64>();
            assert!(approx(sum, d.final_score), "{}: {} vs {}", text, sum, d.final_score);
            assert!((0.0..=1.0).contains(&d.final_score));
        }
    }

    #[test]
    fn test_fallback_confidence() {
        assert_eq!(fallback_confidence(0), 0.2);
        assert_eq!(fallback_confidence(1), 0.3);
        assert_eq!(fallback_confidence(12), 0.3);

        let d = fallback_breakdown(3);
        assert_eq!(d.source, EstimationSource::Fallback);
        assert_eq!(d.final_score, 0.3);
    }

    #[test]
    fn test_select_best_keeps_first_on_tie() {
        let make = |name: &str, confidence: f64| NameEstimation {
            suggested_name: name.to_string(),
            confidence,
            source: EstimationSource::Ocr,
        };
        let estimations = vec![make("a", 0.5), make("b", 0.9), make("c", 0.9), make("d", 0.1)];

        assert_eq!(select_best(&estimations).unwrap().suggested_name, "b");
        assert!(select_best(&[]).is_none());
    }

    #[test]
    fn test_select_best_breakdown() {
        let breakdowns = vec![fallback_breakdown(0), fallback_breakdown(2), fallback_breakdown(5)];
        let best = select_best_breakdown(&breakdowns).unwrap();
        assert!(std::ptr::eq(best, &breakdowns[1]));
    }

    #[test]
    fn test_confidence_report() {
        let ocr = score_with_details(&candidate("Katana", Priority::Primary), &valid("Katana"));
        let report = confidence_report(&[ocr, fallback_breakdown(3)]);

        assert!(report.starts_with("Confidence Calculation Report"));
        assert!(report.contains("1. OCR method:"));
        assert!(report.contains("   Base score: 90%"));
        assert!(report.contains("text_length: +10%"));
        assert!(report.contains("2. FALLBACK method:"));
        assert!(report.ends_with("Selected: OCR (100%)"));

        assert_eq!(confidence_report(&[]), "No calculations available");
    }
}
