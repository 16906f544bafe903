//! Character normalization and markdown stripping applied before export.
//!
//! `normalize` maps text into the Latin-1 range so the PDF writer's builtin
//! fonts can always encode it. It is lossy and total: it never fails.
//! `strip_markup` removes the lightweight markdown the model tends to emit.

use std::sync::LazyLock;

use regex::Regex;

/// Typographic characters with a plain-ASCII replacement.
const REPLACEMENTS: &[(char, &str)] = &[
    ('\u{2022}', "-"),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2026}', "..."),
];

/// Highest code point representable in Latin-1.
const LATIN1_MAX: char = '\u{FF}';

/// Canonical bullet marker emitted by `strip_markup`.
pub const BULLET_MARKER: &str = "\u{2022} ";

static HEADING_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:#{1,6}[ \t]*)+").unwrap());

static BULLET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[-*+][ \t]+").unwrap());

/// Replaces typographic punctuation with ASCII and drops anything outside Latin-1.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match REPLACEMENTS.iter().find(|(from, _)| *from == ch) {
            Some((_, to)) => out.push_str(to),
            None if ch <= LATIN1_MAX => out.push(ch),
            None => {}
        }
    }
    out
}

/// Removes markdown emphasis delimiters and heading markers, and rewrites
/// `-`/`*`/`+` list markers to a single `• ` bullet.
pub fn strip_markup(text: &str) -> String {
    // Removing one delimiter can splice two halves into a new one ("_**_").
    let mut text = text.to_string();
    while text.contains("**") || text.contains("__") {
        text = text.replace("**", "").replace("__", "");
    }

    let text = HEADING_MARKERS.replace_all(&text, "");
    BULLET_LINE.replace_all(&text, BULLET_MARKER).into_owned()
}
