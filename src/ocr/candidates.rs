use serde::{Deserialize, Serialize};

use super::preprocess::preprocess_lines;
use crate::analysis::config::TextPreprocessing;

/// Number of leading lines considered as item name candidates.
const MAX_CANDIDATES: usize = 3;

/// How much a candidate's position suggests it is the item name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// First line: tooltips put the item name here
    Primary,
    /// Second or third line: used when OCR merged or reordered the first line
    Secondary,
}

/// A line that might be the item name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCandidate {
    pub text: String,
    /// Index among the non-empty preprocessed lines
    pub line_index: usize,
    pub priority: Priority,
}

/// Splits text into non-empty, trimmed lines after the configured preprocessing.
pub fn parse_lines(text: &str, options: &TextPreprocessing) -> Vec<String> {
    preprocess_lines(text, options)
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Line 0 is the primary candidate; lines 1 and 2 are secondary.
pub fn extract_candidates(lines: &[String]) -> Vec<NameCandidate> {
    lines
        .iter()
        .take(MAX_CANDIDATES)
        .enumerate()
        .map(|(line_index, text)| NameCandidate {
            text: text.clone(),
            line_index,
            priority: if line_index == 0 {
                Priority::Primary
            } else {
                Priority::Secondary
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_lines_drops_blank_lines() {
        let options = TextPreprocessing {
            normalize_whitespace: false,
            remove_empty_lines: false,
            trim_lines: false,
        };
        assert_eq!(
            parse_lines("  Katana \n\n   \nLuck 100", &options),
            lines(&["Katana", "Luck 100"])
        );
    }

    #[test]
    fn test_parse_lines_empty_input() {
        assert!(parse_lines("", &TextPreprocessing::default()).is_empty());
        assert!(parse_lines(" \n \n", &TextPreprocessing::default()).is_empty());
    }

    #[test]
    fn test_candidates_priorities() {
        let candidates = extract_candidates(&lines(&["Katana", "Exceptional", "Luck 100", "Mana Increase 8"]));

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].priority, Priority::Primary);
        assert_eq!(candidates[0].text, "Katana");
        assert_eq!(candidates[1].priority, Priority::Secondary);
        assert_eq!(candidates[1].line_index, 1);
        assert_eq!(candidates[2].priority, Priority::Secondary);
        assert_eq!(candidates[2].text, "Luck 100");
    }

    #[test]
    fn test_single_line_single_candidate() {
        let candidates = extract_candidates(&lines(&["Katana"]));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].priority, Priority::Primary);
    }

    #[test]
    fn test_no_lines_no_candidates() {
        assert!(extract_candidates(&[]).is_empty());
    }
}
