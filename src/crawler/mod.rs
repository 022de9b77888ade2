//! Listing scraper.
//!
//! Pages are fetched through a [`ListingSource`], cards are parsed with
//! per-field fallback selectors and paced by a [`Pacer`]. Page failures skip
//! the page; card failures skip the card; only a browser that cannot start
//! fails the run.

pub mod browser;
pub mod card;
pub mod errors;
pub mod fields;
pub mod pacing;
pub mod pipeline;
pub mod selectors;
pub mod source;
pub mod types;

#[cfg(test)]
mod tests;

pub use browser::BrowserSession;
pub use card::{RawCard, parse_cards};
pub use errors::{PageError, ScrapeError};
pub use pacing::{DelayRange, NoPacing, Pacer, RandomPacer};
pub use pipeline::{CrawlSettings, Crawler, crawl_with, dedup_by_url, scrape_projects};
pub use selectors::{FieldKind, FieldSpec, SelectorSet};
pub use source::ListingSource;
pub use types::{Category, ScrapedProject};
