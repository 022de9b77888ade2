use regex::Regex;
use std::sync::LazyLock;

static BUDGET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\$|€|£)\s?\d[\d,]*(?:\s?-\s?\d[\d,]*)?").unwrap());

static FIRST_INTEGER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Keep only the amount (or range) from a budget label, dropping noise like
/// "Avg Bid". Text without a currency amount is kept as is.
pub fn parse_budget(raw: &str) -> String {
    match BUDGET_REGEX.find(raw) {
        Some(m) => m.as_str().to_string(),
        None => raw.to_string(),
    }
}

/// First integer in a label such as "23 bids".
pub fn parse_bids(raw: &str) -> Option<u32> {
    FIRST_INTEGER_REGEX.find(raw)?.as_str().parse().ok()
}
