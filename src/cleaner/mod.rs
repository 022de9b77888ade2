//! Record cleaning.
//!
//! Turns raw scraped rows into [`ProjectRecord`]s: required fields enforced,
//! gated listings removed, optional fields defaulted, skills normalized,
//! `match_text` derived and duplicates (by url) dropped.

pub mod reject;
pub mod skills;

pub use reject::is_blocked_description;
pub use skills::normalize_skills;

use std::collections::HashSet;
use tracing::{debug, info, instrument};

use crate::dataset::errors::DatasetError;
use crate::dataset::model::{
    BUDGET_UNSPECIFIED, ProjectRecord, RawDataset, RawRecord, TIME_LEFT_UNKNOWN,
};

pub const REQUIRED_COLUMNS: [&str; 4] = ["title", "description", "skills", "url"];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanStats {
    pub input: usize,
    pub missing_required: usize,
    pub blocked: usize,
    pub duplicates: usize,
    pub output: usize,
}

pub fn clean(dataset: &RawDataset) -> Result<Vec<ProjectRecord>, DatasetError> {
    clean_with_stats(dataset).map(|(records, _)| records)
}

#[instrument(skip_all, fields(rows = dataset.len()))]
pub fn clean_with_stats(
    dataset: &RawDataset,
) -> Result<(Vec<ProjectRecord>, CleanStats), DatasetError> {
    check_schema(dataset)?;

    let mut stats = CleanStats {
        input: dataset.len(),
        ..CleanStats::default()
    };
    let mut seen_urls = HashSet::new();
    let mut cleaned = Vec::with_capacity(dataset.len());

    for raw in &dataset.records {
        let Some((title, description, url)) = required_fields(raw) else {
            stats.missing_required += 1;
            continue;
        };

        if is_blocked_description(&description) {
            debug!(%url, "dropping gated listing");
            stats.blocked += 1;
            continue;
        }

        let record = build_record(raw, title, description, url);

        if !seen_urls.insert(record.url.clone()) {
            stats.duplicates += 1;
            continue;
        }
        cleaned.push(record);
    }

    stats.output = cleaned.len();
    info!(
        input = stats.input,
        missing_required = stats.missing_required,
        blocked = stats.blocked,
        duplicates = stats.duplicates,
        output = stats.output,
        "cleaned dataset"
    );

    Ok((cleaned, stats))
}

fn check_schema(dataset: &RawDataset) -> Result<(), DatasetError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !dataset.has_column(c))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DatasetError::Schema(missing))
    }
}

/// Trimmed title, description and url, or `None` if any is missing or empty.
fn required_fields(raw: &RawRecord) -> Option<(String, String, String)> {
    let trimmed = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Some((
        trimmed(&raw.title)?,
        trimmed(&raw.description)?,
        trimmed(&raw.url)?,
    ))
}

fn build_record(raw: &RawRecord, title: String, description: String, url: String) -> ProjectRecord {
    let skills = normalize_skills(raw.skills.as_ref());
    let match_text = build_match_text(&title, &description, &skills);

    ProjectRecord {
        platform: raw.platform.clone().unwrap_or_default(),
        category: raw.category.clone().unwrap_or_default(),
        title,
        description,
        skills,
        budget: raw
            .budget
            .clone()
            .unwrap_or_else(|| BUDGET_UNSPECIFIED.to_string()),
        time_left: raw
            .time_left
            .clone()
            .unwrap_or_else(|| TIME_LEFT_UNKNOWN.to_string()),
        bids_count: coerce_bids_count(raw.bids_count.as_deref()),
        url,
        scraped_at: raw.scraped_at.clone().unwrap_or_default(),
        match_text,
    }
}

pub fn build_match_text(title: &str, description: &str, skills: &[String]) -> String {
    format!("{} {} {}", title, description, skills.join(" "))
        .trim()
        .to_string()
}

/// Integer bid count; float text is truncated, anything else becomes 0.
pub fn coerce_bids_count(raw: Option<&str>) -> u32 {
    let Some(raw) = raw.map(str::trim) else {
        return 0;
    };

    if let Ok(n) = raw.parse::<u32>() {
        return n;
    }

    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 => f as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::model::{CLEAN_COLUMNS, RAW_COLUMNS, RawSkills};

    fn row(title: &str, description: &str, url: &str) -> RawRecord {
        RawRecord {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            skills: Some(RawSkills::Text("['python', 'flask']".to_string())),
            url: Some(url.to_string()),
            ..RawRecord::default()
        }
    }

    fn dataset(records: Vec<RawRecord>) -> RawDataset {
        RawDataset::new(RAW_COLUMNS, records)
    }

    #[test]
    fn test_missing_required_column_is_schema_error() {
        let ds = RawDataset::new(["title", "description", "url"], vec![]);
        let err = clean(&ds).unwrap_err();
        assert!(matches!(err, DatasetError::Schema(cols) if cols == vec!["skills".to_string()]));
    }

    #[test]
    fn test_empty_required_fields_are_dropped() {
        let ds = dataset(vec![
            row("  ", "desc", "u1"),
            row("Title", "", "u2"),
            row("Title", "desc", "   "),
            RawRecord {
                description: None,
                ..row("Title", "x", "u3")
            },
            row(" Kept ", " desc ", " u4 "),
        ]);

        let (records, stats) = clean_with_stats(&ds).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(stats.missing_required, 4);
        assert_eq!(records[0].title, "Kept");
        assert_eq!(records[0].description, "desc");
        assert_eq!(records[0].url, "u4");
    }

    #[test]
    fn test_blocked_description_is_dropped() {
        let ds = dataset(vec![
            row("Gated", "Please Sign Up or Login to see details", "u1"),
            row("Open", "Build a scraper", "u2"),
        ]);

        let records = clean(&ds).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "u2");
    }

    #[test]
    fn test_optional_defaults() {
        let ds = dataset(vec![RawRecord {
            bids_count: Some("many".to_string()),
            ..row("T", "D", "u1")
        }]);

        let record = &clean(&ds).unwrap()[0];
        assert_eq!(record.budget, "Not specified");
        assert_eq!(record.time_left, "Unknown");
        assert_eq!(record.bids_count, 0);
    }

    #[test]
    fn test_match_text() {
        let ds = dataset(vec![row("Python API", "Build REST backend", "u1")]);
        let record = &clean(&ds).unwrap()[0];
        assert_eq!(record.skills, vec!["python", "flask"]);
        assert_eq!(record.match_text, "Python API Build REST backend python flask");
    }

    #[test]
    fn test_match_text_without_skills_has_no_trailing_space() {
        assert_eq!(build_match_text("T", "D", &[]), "T D");
    }

    #[test]
    fn test_dedup_keeps_first() {
        let ds = dataset(vec![
            row("First", "one", "dup"),
            row("Other", "two", "u2"),
            row("Second", "three", "dup"),
        ]);

        let records = clean(&ds).unwrap();
        let urls: Vec<&str> = records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["dup", "u2"]);
        assert_eq!(records[0].title, "First");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let ds = dataset(vec![
            row("A", "alpha", "u1"),
            row("B", "Sign up or login to see details", "u2"),
            row("C", "gamma", "u1"),
            RawRecord {
                budget: Some("$30 - $250".to_string()),
                bids_count: Some("12.0".to_string()),
                ..row("D", "delta", "u3")
            },
        ]);

        let once = clean(&ds).unwrap();
        let again = clean(&RawDataset::from(once.as_slice())).unwrap();
        assert_eq!(once, again);
    }

    #[test]
    fn test_empty_dataset_with_clean_columns() {
        let ds = RawDataset::new(CLEAN_COLUMNS, vec![]);
        assert!(clean(&ds).unwrap().is_empty());
    }

    #[test]
    fn test_coerce_bids_count() {
        assert_eq!(coerce_bids_count(Some("17")), 17);
        assert_eq!(coerce_bids_count(Some(" 4.0 ")), 4);
        assert_eq!(coerce_bids_count(Some("-3")), 0);
        assert_eq!(coerce_bids_count(Some("NaN")), 0);
        assert_eq!(coerce_bids_count(Some("")), 0);
        assert_eq!(coerce_bids_count(None), 0);
    }
}

#[cfg(all(test, feature = "fuzz"))]
mod proptests {
    use super::*;
    use crate::dataset::model::{RAW_COLUMNS, RawSkills};
    use proptest::prelude::*;

    fn raw_record() -> impl Strategy<Value = RawRecord> {
        (
            proptest::option::of("[ a-zA-Z]{0,12}"),
            proptest::option::of("[ a-zA-Z]{0,24}"),
            proptest::option::of("[a-c ,'\\[\\]]{0,12}"),
            proptest::option::of("u[0-3]"),
            proptest::option::of("[0-9.a-]{0,4}"),
        )
            .prop_map(|(title, description, skills, url, bids)| RawRecord {
                title,
                description,
                skills: skills.map(RawSkills::Text),
                url,
                bids_count: bids,
                ..RawRecord::default()
            })
    }

    proptest! {
        #[test]
        fn clean_is_idempotent(records in proptest::collection::vec(raw_record(), 0..12)) {
            let once = clean(&RawDataset::new(RAW_COLUMNS, records)).unwrap();
            let again = clean(&RawDataset::from(once.as_slice())).unwrap();
            prop_assert_eq!(&once, &again);
        }

        #[test]
        fn cleaned_records_are_unique_and_complete(records in proptest::collection::vec(raw_record(), 0..12)) {
            let cleaned = clean(&RawDataset::new(RAW_COLUMNS, records)).unwrap();
            let mut urls = HashSet::new();
            for r in &cleaned {
                prop_assert!(!r.title.is_empty());
                prop_assert!(!r.description.is_empty());
                prop_assert!(urls.insert(r.url.clone()));
            }
        }
    }
}
