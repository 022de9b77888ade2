use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

use crate::config::ScrapeConfig;
use crate::crawler::browser::BrowserSession;
use crate::crawler::card::RawCard;
use crate::crawler::errors::ScrapeError;
use crate::crawler::fields::{parse_bids, parse_budget};
use crate::crawler::pacing::{DelayRange, Pacer, RandomPacer};
use crate::crawler::selectors::SelectorSet;
use crate::crawler::source::ListingSource;
use crate::crawler::types::{Category, ScrapedProject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSettings {
    pub pages_per_category: u32,
    /// Between pages of the same category.
    pub page_delay: DelayRange,
    /// Between categories.
    pub category_delay: DelayRange,
}

impl From<&ScrapeConfig> for CrawlSettings {
    fn from(config: &ScrapeConfig) -> Self {
        Self {
            pages_per_category: config.pages_per_category(),
            page_delay: config.page_delay(),
            category_delay: config.category_delay(),
        }
    }
}

/// Walks categories page by page over a [`ListingSource`].
pub struct Crawler<'a, S: ListingSource, P: Pacer> {
    source: &'a mut S,
    pacer: &'a mut P,
    selectors: &'a SelectorSet,
    settings: CrawlSettings,
}

impl<'a, S: ListingSource, P: Pacer> Crawler<'a, S, P> {
    pub fn new(
        source: &'a mut S,
        pacer: &'a mut P,
        selectors: &'a SelectorSet,
        settings: CrawlSettings,
    ) -> Self {
        Self {
            source,
            pacer,
            selectors,
            settings,
        }
    }

    /// Scrape every category, then drop repeated urls (first seen wins).
    pub fn run(&mut self, categories: &[Category]) -> Vec<ScrapedProject> {
        let mut projects = Vec::new();

        for (i, category) in categories.iter().enumerate() {
            projects.extend(self.scrape_category(category));

            if i + 1 < categories.len() {
                self.pacer.pause(self.settings.category_delay);
            }
        }

        let scraped = projects.len();
        let unique = dedup_by_url(projects);
        info!(scraped, unique = unique.len(), "scrape finished");
        unique
    }

    #[instrument(skip_all, fields(category = %category.name))]
    pub fn scrape_category(&mut self, category: &Category) -> Vec<ScrapedProject> {
        let mut projects = Vec::new();
        let max_pages = self.settings.pages_per_category;

        for page in 1..=max_pages {
            match self.source.fetch_page(category, page) {
                Ok(cards) => {
                    let before = projects.len();
                    projects.extend(
                        cards
                            .iter()
                            .filter_map(|card| self.extract_project(card, &category.name)),
                    );
                    info!(
                        page,
                        cards = cards.len(),
                        projects = projects.len() - before,
                        "page scraped"
                    );
                }
                Err(e) => warn!(page, error = %e, "skipping page"),
            }

            if page < max_pages {
                self.pacer.pause(self.settings.page_delay);
            }
        }

        projects
    }

    /// Build a project from one card. Cards without a title or url are
    /// discarded; every other field is optional.
    fn extract_project(&self, card: &RawCard, category: &str) -> Option<ScrapedProject> {
        let sel = self.selectors;

        let Some(title) = self.source.extract_field(card, &sel.title) else {
            debug!("card without title");
            return None;
        };
        let Some(url) = self.source.extract_field(card, &sel.url) else {
            debug!(%title, "card without url");
            return None;
        };

        let mut project = ScrapedProject::new(category, title, url);
        project.description = self.source.extract_field(card, &sel.description);
        project.skills = self.source.extract_list(card, &sel.skills);
        project.budget = self
            .source
            .extract_field(card, &sel.budget)
            .map(|raw| parse_budget(&raw));
        project.time_left = self.source.extract_field(card, &sel.time_left);
        project.bids_count = self
            .source
            .extract_field(card, &sel.bids)
            .and_then(|raw| parse_bids(&raw));

        Some(project)
    }
}

pub fn dedup_by_url(projects: Vec<ScrapedProject>) -> Vec<ScrapedProject> {
    let mut seen = HashSet::new();
    projects
        .into_iter()
        .filter(|p| seen.insert(p.url.clone()))
        .collect()
}

/// Crawl `categories` with a source the call owns. The source is dropped
/// before this returns, or while unwinding if the crawl panics.
pub fn crawl_with<S: ListingSource, P: Pacer>(
    mut source: S,
    pacer: &mut P,
    selectors: &SelectorSet,
    settings: CrawlSettings,
    categories: &[Category],
) -> Vec<ScrapedProject> {
    Crawler::new(&mut source, pacer, selectors, settings).run(categories)
}

/// Run a full scrape in a Chrome session.
///
/// Failing to start the browser aborts the run; everything after that is
/// best effort and only ever shrinks the result.
pub fn scrape_projects(config: &ScrapeConfig) -> Result<Vec<ScrapedProject>, ScrapeError> {
    let categories = config.category_targets()?;
    let selectors = SelectorSet::freelancer();

    let session = BrowserSession::open(config, selectors.clone())?;
    let mut pacer = RandomPacer::new();

    Ok(crawl_with(session, &mut pacer, &selectors, config.into(), &categories))
}
