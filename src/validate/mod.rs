//! Entry and name validation beyond the structural rule in `entry`.
//!
//! - `domain`: Ultima Online denoising of modifier entries
//! - `name`: whether a line can serve as an item name

pub mod domain;
pub mod name;

pub use domain::{DomainFilter, DomainRejection, FilterStats, DEFAULT_DOMAIN_FILTER};
pub use name::{clean_item_name, NameRules, ValidationOutcome, ValidationReason};

use regex::Regex;

/// Compiles a configured pattern, logging and returning `None` on failure.
pub(crate) fn compile_pattern(pattern: &str, label: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!("Ignoring invalid {} pattern \"{}\": {}", label, pattern, e);
            None
        }
    }
}

/// Compiles every pattern that can be compiled, in order.
pub(crate) fn compile_patterns(patterns: &[String], label: &str) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| compile_pattern(p, label))
        .collect()
}
