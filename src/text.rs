use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every whitespace run into a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}

/// Like [`collapse_whitespace`], but an empty result means "absent".
pub fn clean_fragment(text: Option<&str>) -> Option<String> {
    let cleaned = collapse_whitespace(text?);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
