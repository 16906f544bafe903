//! Prefix-based section extraction over the model's bulleted ATS analysis.
//!
//! The ATS prompt asks for one `- Header:` bullet per section, so a header is
//! found by prefix and the next raw `- ` line ends it. Content lines that are
//! themselves `- ` bullets also end the section; callers fall back to the full
//! analysis text when the extracted section comes back empty.

use crate::text::{starts_with_ignore_case, strip_bullet_prefix};

/// Marker that terminates a captured section.
const SECTION_TERMINATOR: &str = "- ";

/// Returns the lines following the first line that starts with `header`
/// (case-insensitive), up to the next `- ` line. Empty when the header is absent.
pub fn extract_section(full_text: &str, header: &str) -> String {
    let mut captured: Vec<&str> = Vec::new();
    let mut capturing = false;

    for line in full_text.lines() {
        if capturing {
            if line.trim_start().starts_with(SECTION_TERMINATOR) {
                break;
            }
            captured.push(strip_bullet_prefix(line));
        } else if starts_with_ignore_case(strip_bullet_prefix(line), header) {
            capturing = true;
        }
    }

    captured.join("\n").trim().to_string()
}
