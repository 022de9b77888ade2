//! Configuration handling.
//!
//! Everything is read from environment variables with development defaults,
//! so the binaries need no argument parsing. Values that are present but
//! unparsable produce a `ConfigError` rather than silently falling back.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::crawler::pacing::DelayRange;
use crate::crawler::types::Category;
use crate::matcher::filter::MatchFilter;

pub const ENV_BASE_URL: &str = "SCRAPE_BASE_URL";
pub const ENV_CATEGORIES: &str = "SCRAPE_CATEGORIES";
pub const ENV_PAGES: &str = "SCRAPE_PAGES";
pub const ENV_HEADLESS: &str = "SCRAPE_HEADLESS";
pub const ENV_PAGE_DELAY: &str = "SCRAPE_PAGE_DELAY_SECS";
pub const ENV_CATEGORY_DELAY: &str = "SCRAPE_CATEGORY_DELAY_SECS";
pub const ENV_WAIT_TIMEOUT: &str = "SCRAPE_WAIT_TIMEOUT_SECS";
pub const ENV_CHROME_PATH: &str = "SCRAPE_CHROME_PATH";
pub const ENV_RAW_CSV_PATH: &str = "RAW_CSV_PATH";
pub const ENV_CLEAN_CSV_PATH: &str = "CLEAN_CSV_PATH";
pub const ENV_TOP_K: &str = "MATCH_TOP_K";
pub const ENV_MIN_SCORE: &str = "MATCH_MIN_SCORE";
pub const ENV_MAX_BIDS: &str = "MATCH_MAX_BIDS";
pub const ENV_CATEGORY_FILTER: &str = "MATCH_CATEGORY";

const DEFAULT_BASE_URL: &str = "https://www.freelancer.com";
const DEFAULT_CATEGORIES: &str = "Python Development=jobs/python/;\
                                  Web Development=jobs/website-design/;\
                                  Data Entry=jobs/data-entry/;\
                                  Graphic Design=jobs/graphic-design/;\
                                  Mobile Apps=jobs/mobile-phone/";
const DEFAULT_PAGES: u32 = 3;
const DEFAULT_HEADLESS: bool = false;
const DEFAULT_PAGE_DELAY: (u64, u64) = (2, 5);
const DEFAULT_CATEGORY_DELAY: (u64, u64) = (3, 6);
const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_RAW_CSV_PATH: &str = "data/raw/freelancer_projects_raw.csv";
const DEFAULT_CLEAN_CSV_PATH: &str = "data/processed/freelancer_projects_clean.csv";
const DEFAULT_TOP_K: usize = 10;

/// Scraper settings: where to crawl and how politely.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeConfig {
    base_url: Url,
    categories: Vec<(String, String)>,
    pages_per_category: u32,
    headless: bool,
    page_delay: DelayRange,
    category_delay: DelayRange,
    wait_timeout: Duration,
    chrome_path: Option<PathBuf>,
}

impl ScrapeConfig {
    pub fn new(base_url: Url, categories: Vec<(String, String)>) -> Self {
        Self {
            base_url,
            categories,
            pages_per_category: DEFAULT_PAGES,
            headless: DEFAULT_HEADLESS,
            page_delay: DelayRange::from_secs(DEFAULT_PAGE_DELAY.0, DEFAULT_PAGE_DELAY.1),
            category_delay: DelayRange::from_secs(
                DEFAULT_CATEGORY_DELAY.0,
                DEFAULT_CATEGORY_DELAY.1,
            ),
            wait_timeout: Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS),
            chrome_path: None,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = match env::var(ENV_BASE_URL) {
            Ok(raw) => Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidValue {
                field: ENV_BASE_URL,
                reason: e.to_string(),
            })?,
            Err(_) => default_base_url(),
        };
        let categories = parse_categories(
            &env::var(ENV_CATEGORIES).unwrap_or_else(|_| DEFAULT_CATEGORIES.to_string()),
        )?;

        let mut config = Self::new(base_url, categories);
        config.pages_per_category = env_parse(ENV_PAGES, DEFAULT_PAGES)?;
        config.headless = env_bool(ENV_HEADLESS, DEFAULT_HEADLESS)?;
        if let Ok(raw) = env::var(ENV_PAGE_DELAY) {
            config.page_delay = parse_delay_range(ENV_PAGE_DELAY, &raw)?;
        }
        if let Ok(raw) = env::var(ENV_CATEGORY_DELAY) {
            config.category_delay = parse_delay_range(ENV_CATEGORY_DELAY, &raw)?;
        }
        config.wait_timeout =
            Duration::from_secs(env_parse(ENV_WAIT_TIMEOUT, DEFAULT_WAIT_TIMEOUT_SECS)?);
        config.chrome_path = env::var(ENV_CHROME_PATH)
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| PathBuf::from(raw.trim()));
        Ok(config)
    }

    pub fn with_pages(mut self, pages: u32) -> Self {
        self.pages_per_category = pages;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_delays(mut self, page_delay: DelayRange, category_delay: DelayRange) -> Self {
        self.page_delay = page_delay;
        self.category_delay = category_delay;
        self
    }

    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    pub fn with_chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
    /// `(name, url suffix)` pairs in crawl order.
    pub fn categories(&self) -> &[(String, String)] {
        &self.categories
    }
    pub fn pages_per_category(&self) -> u32 {
        self.pages_per_category
    }
    pub fn headless(&self) -> bool {
        self.headless
    }
    pub fn page_delay(&self) -> DelayRange {
        self.page_delay
    }
    pub fn category_delay(&self) -> DelayRange {
        self.category_delay
    }
    /// How long a page load waits for the first listing card.
    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }
    /// Chrome binary to launch; `None` lets the browser crate search for one.
    pub fn chrome_path(&self) -> Option<&Path> {
        self.chrome_path.as_deref()
    }

    /// Categories with their suffixes resolved against the base URL.
    pub fn category_targets(&self) -> Result<Vec<Category>, url::ParseError> {
        self.categories
            .iter()
            .map(|(name, suffix)| Category::new(name.clone(), &self.base_url, suffix))
            .collect()
    }

    /// Development defaults (mirrors `from_env` with no env overrides).
    pub fn default() -> Self {
        // DEFAULT_CATEGORIES is a constant known to parse
        let categories = parse_categories(DEFAULT_CATEGORIES).unwrap_or_default();
        Self::new(default_base_url(), categories)
    }
}

/// Dataset file locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathsConfig {
    raw_csv: PathBuf,
    clean_csv: PathBuf,
}

impl PathsConfig {
    pub fn new(raw_csv: impl Into<PathBuf>, clean_csv: impl Into<PathBuf>) -> Self {
        Self {
            raw_csv: raw_csv.into(),
            clean_csv: clean_csv.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            env::var(ENV_RAW_CSV_PATH).unwrap_or_else(|_| DEFAULT_RAW_CSV_PATH.to_string()),
            env::var(ENV_CLEAN_CSV_PATH).unwrap_or_else(|_| DEFAULT_CLEAN_CSV_PATH.to_string()),
        )
    }

    pub fn raw_csv(&self) -> &Path {
        &self.raw_csv
    }
    pub fn clean_csv(&self) -> &Path {
        &self.clean_csv
    }
}

/// Match request settings: result count plus caller-side filters.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    top_k: usize,
    filter: MatchFilter,
}

impl MatchConfig {
    pub fn new(top_k: usize, filter: MatchFilter) -> Self {
        Self { top_k, filter }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let top_k = env_parse(ENV_TOP_K, DEFAULT_TOP_K)?;
        let min_score: f64 = env_parse(ENV_MIN_SCORE, 0.0)?;
        if !(0.0..=1.0).contains(&min_score) {
            return Err(ConfigError::InvalidValue {
                field: ENV_MIN_SCORE,
                reason: format!("{min_score} is outside 0..=1"),
            });
        }
        let max_bids: u32 = env_parse(ENV_MAX_BIDS, 0)?;
        let category = env::var(ENV_CATEGORY_FILTER).unwrap_or_default();

        Ok(Self::new(top_k, MatchFilter::new(min_score, max_bids, &category)))
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
    pub fn filter(&self) -> &MatchFilter {
        &self.filter
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base url is valid")
}

fn env_parse<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            field: key,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn env_bool(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidValue {
                field: key,
                reason: format!("'{other}' is not a boolean"),
            }),
        },
        Err(_) => Ok(default),
    }
}

/// `Name=suffix;Name=suffix`
fn parse_categories(raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, suffix) = entry.split_once('=').ok_or_else(|| ConfigError::InvalidValue {
                field: ENV_CATEGORIES,
                reason: format!("'{entry}' is not NAME=SUFFIX"),
            })?;
            Ok((name.trim().to_string(), suffix.trim().to_string()))
        })
        .collect()
}

/// `min-max` in seconds, e.g. `2-5`; a single number means a fixed delay.
fn parse_delay_range(field: &'static str, raw: &str) -> Result<DelayRange, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue { field, reason };
    let secs = |s: &str| {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(Duration::from_secs_f64)
            .ok_or_else(|| invalid(format!("'{raw}' is not a delay in seconds")))
    };

    match raw.split_once('-') {
        Some((min, max)) => Ok(DelayRange::new(secs(min)?, secs(max)?)),
        None => {
            let fixed = secs(raw)?;
            Ok(DelayRange::new(fixed, fixed))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Ensure environment-variable manipulating tests run serially.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [
            ENV_BASE_URL,
            ENV_CATEGORIES,
            ENV_PAGES,
            ENV_HEADLESS,
            ENV_PAGE_DELAY,
            ENV_CATEGORY_DELAY,
            ENV_WAIT_TIMEOUT,
            ENV_CHROME_PATH,
            ENV_RAW_CSV_PATH,
            ENV_CLEAN_CSV_PATH,
            ENV_TOP_K,
            ENV_MIN_SCORE,
            ENV_MAX_BIDS,
            ENV_CATEGORY_FILTER,
        ] {
            unsafe {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn defaults_when_env_missing() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        let cfg = ScrapeConfig::from_env().unwrap();
        assert_eq!(cfg, ScrapeConfig::default());
        assert_eq!(cfg.base_url().as_str(), "https://www.freelancer.com/");
        assert_eq!(cfg.categories().len(), 5);
        assert_eq!(cfg.categories()[0], ("Python Development".into(), "jobs/python/".into()));
        assert_eq!(cfg.pages_per_category(), 3);
        assert!(!cfg.headless());
        assert_eq!(cfg.page_delay(), DelayRange::from_secs(2, 5));
        assert_eq!(cfg.category_delay(), DelayRange::from_secs(3, 6));
        assert_eq!(cfg.wait_timeout(), Duration::from_secs(15));
        assert_eq!(cfg.chrome_path(), None);

        let paths = PathsConfig::from_env();
        assert_eq!(paths.raw_csv(), Path::new(DEFAULT_RAW_CSV_PATH));
        assert_eq!(paths.clean_csv(), Path::new(DEFAULT_CLEAN_CSV_PATH));

        let matching = MatchConfig::from_env().unwrap();
        assert_eq!(matching.top_k(), 10);
        assert_eq!(matching.filter(), &MatchFilter::default());
    }

    #[test]
    fn overrides_when_env_present() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_BASE_URL, "https://example.com");
            env::set_var(ENV_CATEGORIES, "Rust=jobs/rust/ ; Go = jobs/golang/");
            env::set_var(ENV_PAGES, "1");
            env::set_var(ENV_HEADLESS, "true");
            env::set_var(ENV_PAGE_DELAY, "0");
            env::set_var(ENV_CATEGORY_DELAY, "1-2.5");
            env::set_var(ENV_WAIT_TIMEOUT, "5");
            env::set_var(ENV_CHROME_PATH, "/opt/chrome/chrome");
            env::set_var(ENV_TOP_K, "25");
            env::set_var(ENV_MAX_BIDS, "40");
            env::set_var(ENV_CATEGORY_FILTER, "python");
        }

        let cfg = ScrapeConfig::from_env().unwrap();
        let targets = cfg.category_targets().unwrap();
        assert_eq!(targets[0].url.as_str(), "https://example.com/jobs/rust/");
        assert_eq!(targets[1].name, "Go");
        assert_eq!(cfg.pages_per_category(), 1);
        assert!(cfg.headless());
        assert!(cfg.page_delay().is_zero());
        assert_eq!(
            cfg.category_delay(),
            DelayRange::new(Duration::from_secs(1), Duration::from_millis(2500))
        );
        assert_eq!(cfg.wait_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.chrome_path(), Some(Path::new("/opt/chrome/chrome")));

        let matching = MatchConfig::from_env().unwrap();
        assert_eq!(matching.top_k(), 25);
        assert_eq!(matching.filter(), &MatchFilter::new(0.0, 40, "python"));
        clear_env();
    }

    #[test]
    fn invalid_values_are_errors() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_PAGES, "three");
        }
        let err = ScrapeConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(ENV_PAGES));

        clear_env();
        unsafe {
            env::set_var(ENV_MIN_SCORE, "1.5");
        }
        assert!(MatchConfig::from_env().is_err());
        clear_env();
    }

    #[test]
    fn category_entries_need_suffix() {
        assert!(parse_categories("Python").is_err());
        assert!(parse_categories("").unwrap().is_empty());
        assert!(parse_delay_range(ENV_PAGE_DELAY, "a-b").is_err());
    }
}
