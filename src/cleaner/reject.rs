/// Descriptions shown instead of the real text on gated listings.
const BLOCKED_PHRASES: [&str; 3] = [
    "please sign up or login to see details",
    "sign up or login to see details",
    "please login to see details",
];

pub fn is_blocked_description(description: &str) -> bool {
    let lower = description.to_lowercase();
    BLOCKED_PHRASES.iter().any(|phrase| lower.contains(phrase))
}
