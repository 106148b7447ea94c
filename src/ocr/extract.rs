use regex::Regex;

/// Collects every (name, value) pair the pattern finds in the text.
///
/// Matches are taken left to right without overlap. Group 1 is the name and
/// group 2 the value, both trimmed; a group the pattern lacks yields an empty
/// string. Nothing is discarded here, validation happens downstream.
///
/// `captures_iter` starts a fresh search on every call, so the result depends
/// only on the text and the pattern.
pub fn extract_pairs(text: &str, pattern: &Regex) -> Vec<(String, String)> {
    pattern
        .captures_iter(text)
        .map(|caps| {
            let group = |i: usize| {
                caps.get(i)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default()
            };
            (group(1), group(2))
        })
        .collect()
}
