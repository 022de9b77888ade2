use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const PLATFORM: &str = "Freelancer.com";
pub const BUDGET_UNSPECIFIED: &str = "Not specified";
pub const TIME_LEFT_UNKNOWN: &str = "Unknown";

/// Skills as they arrive: a real list from the scraper, or text from a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSkills {
    List(Vec<String>),
    Text(String),
}

/// One uncleaned row. Every column may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub platform: Option<String>,
    pub category: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub skills: Option<RawSkills>,
    pub budget: Option<String>,
    pub time_left: Option<String>,
    pub bids_count: Option<String>,
    pub url: Option<String>,
    pub scraped_at: Option<String>,
    pub match_text: Option<String>,
}

/// Uncleaned rows plus the set of columns the source actually had.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDataset {
    pub columns: BTreeSet<String>,
    pub records: Vec<RawRecord>,
}

impl RawDataset {
    pub fn new<I, S>(columns: I, records: Vec<RawRecord>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            records,
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A cleaned project posting, ready for matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub platform: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    pub budget: String,
    pub time_left: String,
    pub bids_count: u32,
    pub url: String,
    pub scraped_at: String,
    pub match_text: String,
}

/// Column order of the raw dataset file.
pub const RAW_COLUMNS: [&str; 10] = [
    "platform",
    "category",
    "title",
    "description",
    "skills",
    "budget",
    "time_left",
    "bids_count",
    "url",
    "scraped_at",
];

/// Column order of the cleaned dataset file.
pub const CLEAN_COLUMNS: [&str; 11] = [
    "platform",
    "category",
    "title",
    "description",
    "skills",
    "budget",
    "time_left",
    "bids_count",
    "url",
    "scraped_at",
    "match_text",
];

impl From<&ProjectRecord> for RawRecord {
    fn from(record: &ProjectRecord) -> Self {
        Self {
            platform: Some(record.platform.clone()),
            category: Some(record.category.clone()),
            title: Some(record.title.clone()),
            description: Some(record.description.clone()),
            skills: Some(RawSkills::List(record.skills.clone())),
            budget: Some(record.budget.clone()),
            time_left: Some(record.time_left.clone()),
            bids_count: Some(record.bids_count.to_string()),
            url: Some(record.url.clone()),
            scraped_at: Some(record.scraped_at.clone()),
            match_text: Some(record.match_text.clone()),
        }
    }
}

impl From<&[ProjectRecord]> for RawDataset {
    fn from(records: &[ProjectRecord]) -> Self {
        Self::new(CLEAN_COLUMNS, records.iter().map(RawRecord::from).collect())
    }
}
