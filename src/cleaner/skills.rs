use crate::dataset::model::RawSkills;

/// Normalize skills to an ordered list of trimmed, non-empty strings.
///
/// Accepts a native list, a bracketed list literal such as `['a', 'b']` or
/// `["a","b"]`, or a bare comma-separated string.
pub fn normalize_skills(skills: Option<&RawSkills>) -> Vec<String> {
    match skills {
        None => Vec::new(),
        Some(RawSkills::List(items)) => items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(RawSkills::Text(text)) => parse_skills_text(text),
    }
}

fn parse_skills_text(text: &str) -> Vec<String> {
    let text = text.trim();

    if text.starts_with('[')
        && let Ok(items) = serde_json::from_str::<Vec<String>>(text)
    {
        return items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }

    // Python-style literals such as `['a', 'b']` are not JSON.
    if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        return inner
            .split(',')
            .map(|part| part.trim().trim_matches('\'').trim_matches('"').trim())
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
    }

    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
