use crate::analysis::config::TextPreprocessing;

/// Cleans recognized text line by line.
///
/// The same pipeline feeds both modifier extraction and name candidates:
/// 1. split on line breaks (`\n` or `\r\n`)
/// 2. `normalize_whitespace`: collapse whitespace runs inside the line to one space
/// 3. `trim_lines`: trim the line
/// 4. `remove_empty_lines`: drop zero-length lines
///
/// Line breaks survive, so whitespace collapsing never joins two lines. The
/// mod pattern can still span a break: with the default pattern's `\s`,
/// `"Katana\n25%"` yields `("Katana", "25%")`.
pub fn preprocess_lines(text: &str, options: &TextPreprocessing) -> Vec<String> {
    text.lines()
        .map(|line| {
            let line = if options.normalize_whitespace {
                collapse_whitespace(line)
            } else {
                line.to_string()
            };
            if options.trim_lines {
                line.trim().to_string()
            } else {
                line
            }
        })
        .filter(|line| !options.remove_empty_lines || !line.is_empty())
        .collect()
}

/// Joins [`preprocess_lines`] back into a single block.
pub fn preprocess(text: &str, options: &TextPreprocessing) -> String {
    preprocess_lines(text, options).join("\n")
}

/// Replaces every run of whitespace with a single space.
///
/// Leading and trailing runs become one space each; trimming is a separate step.
pub fn collapse_whitespace(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_space = false;
    for c in line.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}
