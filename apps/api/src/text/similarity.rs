//! Character-level similarity ratio between resume and job description.
//!
//! `2 * matched / total_len` over a character diff, the same measure as a
//! sequence-matcher ratio. Very long inputs are cut off by a diff deadline,
//! which can only lower the match count.

use std::time::Duration;

use similar::{Algorithm, TextDiff};

const DIFF_DEADLINE: Duration = Duration::from_millis(500);

/// Similarity of `a` and `b` in `[0.0, 1.0]`. Two empty strings are identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let ratio = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .timeout(DIFF_DEADLINE)
        .diff_chars(a, b)
        .ratio();
    f64::from(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(x: f64, y: f64) -> bool {
        (x - y).abs() < 1e-6
    }

    #[test]
    fn test_identical_strings() {
        assert!(approx(similarity_ratio("rust engineer", "rust engineer"), 1.0));
    }

    #[test]
    fn test_empty_strings() {
        assert!(approx(similarity_ratio("", ""), 1.0));
        assert!(approx(similarity_ratio("abc", ""), 0.0));
    }

    #[test]
    fn test_disjoint_strings() {
        assert!(approx(similarity_ratio("abc", "xyz"), 0.0));
    }

    #[test]
    fn test_known_ratio() {
        // common "bcd": 2 * 3 / 8
        assert!(approx(similarity_ratio("abcd", "bcde"), 0.75));
        assert!(approx(similarity_ratio("abxcd", "abcd"), 8.0 / 9.0));
    }

    #[test]
    fn test_is_order_sensitive() {
        // "tide" vs "diet" share two characters in order
        assert!(approx(similarity_ratio("tide", "diet"), 0.5));
    }

    #[test]
    fn test_repetitive_text_still_matches() {
        let text = "ab".repeat(150);
        assert!(approx(similarity_ratio(&text, &text), 1.0));
        assert!(approx(similarity_ratio(&format!("x{text}"), &text), 600.0 / 601.0));
    }

    #[test]
    fn test_long_text_ratio_in_range() {
        let resume = "Rust, Tokio, Postgres; built a storage engine and a query planner.\n".repeat(40);
        let jd = "Looking for a systems engineer with Rust and Postgres experience.".repeat(40);
        let ratio = similarity_ratio(&resume, &jd);
        assert!(ratio > 0.0 && ratio < 1.0, "ratio out of range: {ratio}");
    }
}
