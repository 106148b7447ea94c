//! Text stages of the analysis pipeline.
//!
//! OCR text → preprocessed lines → raw (name, value) pairs / name candidates.
//! Validation and scoring live in `validate` and `naming`.

pub mod candidates;
pub mod extract;
pub mod preprocess;

pub use candidates::{extract_candidates, parse_lines, NameCandidate, Priority};
pub use extract::extract_pairs;
pub use preprocess::{preprocess, preprocess_lines};
