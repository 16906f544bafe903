// Text handling for model output: character cleanup, markdown stripping,
// prefix-based section/metric extraction, and string similarity.
// Everything here is pure and synchronous.

pub mod metrics;
pub mod normalize;
pub mod sections;
pub mod similarity;

/// Strips leading `-` and space characters, then surrounding whitespace.
///
/// Shared by the section extractor and the metric parser, which both treat
/// `"- Label: value"` and `"Label: value"` the same way.
pub(crate) fn strip_bullet_prefix(line: &str) -> &str {
    line.trim_start_matches(['-', ' ']).trim()
}

/// Case-insensitive `starts_with` without allocating for the common ASCII case.
pub(crate) fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    if prefix.is_ascii() {
        text.len() >= prefix.len()
            && text.is_char_boundary(prefix.len())
            && text[..prefix.len()].eq_ignore_ascii_case(prefix)
    } else {
        text.to_lowercase().starts_with(&prefix.to_lowercase())
    }
}
