//! Text helpers shared by the list and detail parsers.

use crate::types::PLACEHOLDER;
use regex::Regex;
use std::sync::OnceLock;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex is valid"))
}

/// Collapse every whitespace run to a single space and trim the ends.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    whitespace_re().replace_all(s, " ").trim().to_string()
}

/// Turn a Brazilian-formatted capture into dot-decimal form.
///
/// Only the first comma is rewritten; thousand-separator dots are left as
/// captured.
pub(crate) fn decimal(raw: &str) -> String {
    raw.replacen(',', ".", 1)
}

/// First capture group of `re` in `haystack`, normalized, or the placeholder.
pub(crate) fn capture_decimal(re: &Regex, haystack: &str) -> String {
    re.captures(haystack)
        .and_then(|c| c.get(1).map(|m| decimal(m.as_str())))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Truncate to at most `max` characters, never splitting a code point.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
