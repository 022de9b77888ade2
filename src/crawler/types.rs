use chrono::Local;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::dataset::model::{PLATFORM, RawRecord, RawSkills};

/// A listing category: a display name and the URL of its first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub url: Url,
}

impl Category {
    /// Append `suffix` (e.g. `jobs/python/`) to the site base URL, keeping
    /// any path the base already carries.
    pub fn new(name: impl Into<String>, base_url: &Url, suffix: &str) -> Result<Self, url::ParseError> {
        let joined = format!(
            "{}/{}",
            base_url.as_str().trim_end_matches('/'),
            suffix.trim_start_matches('/')
        );
        Ok(Self {
            name: name.into(),
            url: Url::parse(&joined)?,
        })
    }

    /// Page 1 is the category URL itself; page N appends `/N`.
    pub fn page_url(&self, page: u32) -> Result<Url, url::ParseError> {
        if page <= 1 {
            return Ok(self.url.clone());
        }
        Url::parse(&format!("{}/{}", self.url.as_str().trim_end_matches('/'), page))
    }
}

/// One listing card as extracted from a results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedProject {
    pub platform: String,
    pub category: String,
    pub title: String,
    pub description: Option<String>,
    pub skills: Vec<String>,
    pub budget: Option<String>,
    pub time_left: Option<String>,
    pub bids_count: Option<u32>,
    pub url: String,
    pub scraped_at: String,
}

impl ScrapedProject {
    pub fn new(category: &str, title: String, url: String) -> Self {
        Self {
            platform: PLATFORM.to_string(),
            category: category.to_string(),
            title,
            description: None,
            skills: Vec::new(),
            budget: None,
            time_left: None,
            bids_count: None,
            url,
            scraped_at: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}

impl From<ScrapedProject> for RawRecord {
    fn from(project: ScrapedProject) -> Self {
        Self {
            platform: Some(project.platform),
            category: Some(project.category),
            title: Some(project.title),
            description: project.description,
            skills: Some(RawSkills::List(project.skills)),
            budget: project.budget,
            time_left: project.time_left,
            bids_count: project.bids_count.map(|n| n.to_string()),
            url: Some(project.url),
            scraped_at: Some(project.scraped_at),
            match_text: None,
        }
    }
}
