use std::collections::HashMap;
use std::fs;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use url::Url;

use crate::crawler::card::{RawCard, parse_cards};
use crate::crawler::errors::PageError;
use crate::crawler::pacing::{DelayRange, MockPacer, NoPacing};
use crate::crawler::pipeline::{CrawlSettings, Crawler, crawl_with};
use crate::crawler::selectors::SelectorSet;
use crate::crawler::source::ListingSource;
use crate::crawler::types::Category;
use crate::dataset::model::{RAW_COLUMNS, RawDataset, RawRecord};

/// Serves saved result pages keyed by page URL. Pages it does not have
/// behave like a card wait that timed out.
struct SnapshotSource {
    pages: HashMap<String, String>,
    selectors: SelectorSet,
    requested: Vec<String>,
}

impl SnapshotSource {
    fn new() -> Self {
        Self {
            pages: HashMap::new(),
            selectors: SelectorSet::freelancer(),
            requested: Vec::new(),
        }
    }

    fn with_page(mut self, url: &str, fixture: &str) -> Self {
        let html = fs::read_to_string(format!("src/crawler/tests/fixtures/{fixture}"))
            .expect("Failed to read test fixture");
        self.pages.insert(url.to_string(), html);
        self
    }
}

impl ListingSource for SnapshotSource {
    fn fetch_page(&mut self, category: &Category, page: u32) -> Result<Vec<RawCard>, PageError> {
        let url = category.page_url(page)?;
        self.requested.push(url.to_string());

        match self.pages.get(url.as_str()) {
            Some(html) => Ok(parse_cards(html, &url, &self.selectors)),
            None => Err(PageError::WaitTimeout {
                selector: self.selectors.card.clone(),
                timeout: std::time::Duration::from_secs(15),
            }),
        }
    }
}

fn category(name: &str, suffix: &str) -> Category {
    let base = Url::parse("https://www.freelancer.com").unwrap();
    Category::new(name, &base, suffix).unwrap()
}

fn settings(pages: u32) -> CrawlSettings {
    CrawlSettings {
        pages_per_category: pages,
        page_delay: DelayRange::ZERO,
        category_delay: DelayRange::ZERO,
    }
}

#[test]
fn test_extracts_primary_layout_card() {
    let mut source = SnapshotSource::new()
        .with_page("https://www.freelancer.com/jobs/python/", "listing_page.html");
    let selectors = SelectorSet::freelancer();

    let projects = Crawler::new(&mut source, &mut NoPacing, &selectors, settings(1))
        .run(&[category("Python Development", "jobs/python/")]);

    let first = &projects[0];
    assert_eq!(first.platform, "Freelancer.com");
    assert_eq!(first.category, "Python Development");
    assert_eq!(first.title, "Flask REST API backend");
    assert_eq!(
        first.url,
        "https://www.freelancer.com/projects/python/flask-rest-api-backend"
    );
    assert_eq!(
        first.description.as_deref(),
        Some("Build a REST backend in Python with Flask and PostgreSQL.")
    );
    assert_eq!(first.skills, vec!["Python", "Flask"]);
    assert_eq!(first.budget.as_deref(), Some("$250 - 750"));
    assert_eq!(first.time_left.as_deref(), Some("6 days left"));
    assert_eq!(first.bids_count, Some(23));
}

#[test]
fn test_per_field_fallbacks_and_discarded_cards() {
    let mut source = SnapshotSource::new()
        .with_page("https://www.freelancer.com/jobs/python/", "listing_page.html");
    let selectors = SelectorSet::freelancer();

    let projects = Crawler::new(&mut source, &mut NoPacing, &selectors, settings(1))
        .run(&[category("Python Development", "jobs/python/")]);

    // card without a link is dropped, the repeated url keeps the first card
    assert_eq!(projects.len(), 2);

    let fallback = &projects[1];
    assert_eq!(fallback.title, "Scrape product prices");
    assert_eq!(
        fallback.url,
        "https://www.freelancer.com/projects/python/scrape-product-prices"
    );
    assert_eq!(
        fallback.description.as_deref(),
        Some("Daily price scraper for three shops")
    );
    assert_eq!(fallback.skills, vec!["Web Scraping", "Selenium"]);
    assert_eq!(fallback.budget.as_deref(), Some("Negotiable"));
    assert_eq!(fallback.time_left, None);
    assert_eq!(fallback.bids_count, None);
}

#[test]
fn test_timed_out_page_is_skipped() {
    let mut source = SnapshotSource::new()
        .with_page("https://www.freelancer.com/jobs/python/", "listing_page.html")
        .with_page("https://www.freelancer.com/jobs/python/3", "listing_page_2.html");
    let selectors = SelectorSet::freelancer();

    let projects = Crawler::new(&mut source, &mut NoPacing, &selectors, settings(3))
        .run(&[category("Python Development", "jobs/python/")]);

    assert_eq!(
        source.requested,
        vec![
            "https://www.freelancer.com/jobs/python/",
            "https://www.freelancer.com/jobs/python/2",
            "https://www.freelancer.com/jobs/python/3",
        ]
    );
    let titles: Vec<&str> = projects.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Flask REST API backend", "Scrape product prices", "Django dashboard"]
    );
    assert_eq!(projects[2].budget.as_deref(), Some("€400"));
    assert_eq!(projects[2].bids_count, Some(5));
}

#[test]
fn test_dedup_across_categories() {
    let mut source = SnapshotSource::new()
        .with_page("https://www.freelancer.com/jobs/python/", "listing_page.html")
        .with_page("https://www.freelancer.com/jobs/api/", "listing_page.html");
    let selectors = SelectorSet::freelancer();

    let projects = Crawler::new(&mut source, &mut NoPacing, &selectors, settings(1)).run(&[
        category("Python Development", "jobs/python/"),
        category("API", "jobs/api/"),
    ]);

    assert_eq!(projects.len(), 2);
    assert!(projects.iter().all(|p| p.category == "Python Development"));
}

#[test]
fn test_pacing_between_pages_and_categories() {
    let page_delay = DelayRange::from_secs(2, 5);
    let category_delay = DelayRange::from_secs(3, 6);

    let mut pacer = MockPacer::new();
    pacer
        .expect_pause()
        .withf(move |range| *range == page_delay)
        .times(4)
        .return_const(());
    pacer
        .expect_pause()
        .withf(move |range| *range == category_delay)
        .times(1)
        .return_const(());

    let mut source = SnapshotSource::new();
    let selectors = SelectorSet::freelancer();
    let settings = CrawlSettings {
        pages_per_category: 3,
        page_delay,
        category_delay,
    };

    let projects = Crawler::new(&mut source, &mut pacer, &selectors, settings).run(&[
        category("Python Development", "jobs/python/"),
        category("Data Entry", "jobs/data-entry/"),
    ]);

    assert!(projects.is_empty());
    assert_eq!(source.requested.len(), 6);
}

#[test]
fn test_scraped_rows_feed_the_cleaner() {
    let mut source = SnapshotSource::new()
        .with_page("https://www.freelancer.com/jobs/python/", "listing_page.html");
    let selectors = SelectorSet::freelancer();

    let projects = Crawler::new(&mut source, &mut NoPacing, &selectors, settings(1))
        .run(&[category("Python Development", "jobs/python/")]);
    let raw: Vec<RawRecord> = projects.into_iter().map(RawRecord::from).collect();

    let cleaned = crate::cleaner::clean(&RawDataset::new(RAW_COLUMNS, raw)).unwrap();
    assert_eq!(cleaned.len(), 2);
    assert_eq!(
        cleaned[0].match_text,
        "Flask REST API backend Build a REST backend in Python with Flask and PostgreSQL. Python Flask"
    );
    assert_eq!(cleaned[1].bids_count, 0);
    assert_eq!(cleaned[1].time_left, "Unknown");
}

/// Records when it is dropped. Pages either fail or panic.
struct TrackedSource {
    closed: Arc<AtomicBool>,
    panic_on_fetch: bool,
}

impl ListingSource for TrackedSource {
    fn fetch_page(&mut self, _category: &Category, _page: u32) -> Result<Vec<RawCard>, PageError> {
        if self.panic_on_fetch {
            panic!("renderer crashed");
        }
        Err(PageError::Navigation("net::ERR_CONNECTION_RESET".into()))
    }
}

impl Drop for TrackedSource {
    fn drop(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[test]
fn test_source_released_when_every_page_fails() {
    let closed = Arc::new(AtomicBool::new(false));
    let source = TrackedSource {
        closed: closed.clone(),
        panic_on_fetch: false,
    };

    let projects = crawl_with(
        source,
        &mut NoPacing,
        &SelectorSet::freelancer(),
        settings(2),
        &[category("Python Development", "jobs/python/")],
    );

    assert!(projects.is_empty());
    assert!(closed.load(Ordering::SeqCst));
}

#[test]
fn test_source_released_when_crawl_panics() {
    let closed = Arc::new(AtomicBool::new(false));
    let source = TrackedSource {
        closed: closed.clone(),
        panic_on_fetch: true,
    };

    let result = catch_unwind(AssertUnwindSafe(|| {
        crawl_with(
            source,
            &mut NoPacing,
            &SelectorSet::freelancer(),
            settings(1),
            &[category("Python Development", "jobs/python/")],
        )
    }));

    assert!(result.is_err());
    assert!(closed.load(Ordering::SeqCst));
}
