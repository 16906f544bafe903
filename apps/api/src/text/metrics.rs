//! Labeled number extraction, e.g. `"- Skill Gap Percentage: 42.5%"` → `42.5`.

use crate::text::{starts_with_ignore_case, strip_bullet_prefix};

/// Finds the first line starting with `label` (case-insensitive) whose text after
/// the first `:` parses as a number once everything but digits and `.` is removed.
///
/// Matching lines without a colon or with an unparsable value are skipped.
pub fn find_labeled_number(text: &str, label: &str) -> Option<f64> {
    text.lines()
        .map(strip_bullet_prefix)
        .filter(|line| starts_with_ignore_case(line, label))
        .find_map(|line| {
            let (_, value) = line.split_once(':')?;
            let digits: String = value
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            digits.parse::<f64>().ok()
        })
}
