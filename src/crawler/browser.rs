//! Chrome-backed listing source.
//!
//! A [`BrowserSession`] owns the browser process for the length of one scrape
//! run. Dropping it closes the tab and kills the process, so the session is
//! released on every exit path, including early returns and panics.

use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::ScrapeConfig;
use crate::crawler::card::{RawCard, parse_cards};
use crate::crawler::errors::{PageError, ScrapeError};
use crate::crawler::selectors::SelectorSet;
use crate::crawler::source::ListingSource;
use crate::crawler::types::Category;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Time given to late-rendering card content after the first card appears.
const RENDER_SETTLE: Duration = Duration::from_secs(2);

/// Second, shorter wait for bare project links when no card container shows up.
const LINK_WAIT: Duration = Duration::from_secs(10);

/// The browser must outlive the slowest page wait plus courtesy delays.
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(300);

pub struct BrowserSession {
    tab: Arc<Tab>,
    _browser: Browser,
    selectors: SelectorSet,
    wait_timeout: Duration,
}

impl BrowserSession {
    #[instrument(skip_all, fields(headless = config.headless()))]
    pub fn open(config: &ScrapeConfig, selectors: SelectorSet) -> Result<Self, ScrapeError> {
        let options = launch_options(config)?;

        let browser = Browser::new(options)
            .map_err(|e| ScrapeError::Session(format!("failed to launch browser: {e}")))?;
        let tab = browser
            .new_tab()
            .map_err(|e| ScrapeError::Session(format!("failed to open tab: {e}")))?;
        tab.set_user_agent(USER_AGENT, Some(ACCEPT_LANGUAGE), None)
            .map_err(|e| ScrapeError::Session(format!("failed to set user agent: {e}")))?;

        info!("browser session open");
        Ok(Self {
            tab,
            _browser: browser,
            selectors,
            wait_timeout: config.wait_timeout(),
        })
    }
}

pub(crate) fn launch_options(config: &ScrapeConfig) -> Result<LaunchOptions<'static>, ScrapeError> {
    let args: Vec<&'static OsStr> = vec![
        OsStr::new("--disable-dev-shm-usage"),
        OsStr::new("--disable-blink-features=AutomationControlled"),
    ];

    LaunchOptions::default_builder()
        .headless(config.headless())
        .sandbox(false)
        .window_size(Some((1366, 900)))
        .idle_browser_timeout(IDLE_BROWSER_TIMEOUT)
        .path(config.chrome_path().map(Path::to_path_buf))
        .args(args)
        .build()
        .map_err(|e| ScrapeError::Session(format!("invalid launch options: {e}")))
}

/// Selectors a loaded page is waited on, in order: card containers for the
/// full `wait_timeout`, then bare project links for a shorter grace period.
pub(crate) fn wait_plan(selectors: &SelectorSet, wait_timeout: Duration) -> [(&str, Duration); 2] {
    [
        (selectors.card.as_str(), wait_timeout),
        (selectors.card_link.as_str(), LINK_WAIT),
    ]
}

/// Run the waits in order and return the first selector that appeared.
pub(crate) fn await_listing<'s>(
    plan: &[(&'s str, Duration)],
    mut wait: impl FnMut(&str, Duration) -> bool,
) -> Result<&'s str, PageError> {
    for &(selector, timeout) in plan {
        if wait(selector, timeout) {
            return Ok(selector);
        }
        debug!(selector, ?timeout, "selector did not appear");
    }

    Err(PageError::WaitTimeout {
        selector: plan.iter().map(|(s, _)| *s).collect::<Vec<_>>().join(" | "),
        timeout: plan.iter().map(|(_, t)| *t).sum(),
    })
}

impl ListingSource for BrowserSession {
    #[instrument(skip(self, category), fields(category = %category.name))]
    fn fetch_page(&mut self, category: &Category, page: u32) -> Result<Vec<RawCard>, PageError> {
        let page_url = category.page_url(page)?;
        debug!(url = %page_url, "navigating");

        self.tab
            .navigate_to(page_url.as_str())
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| PageError::Navigation(e.to_string()))?;

        let plan = wait_plan(&self.selectors, self.wait_timeout);
        let found = await_listing(&plan, |selector, timeout| {
            self.tab
                .wait_for_element_with_custom_timeout(selector, timeout)
                .is_ok()
        })?;
        debug!(selector = found, "listing rendered");
        std::thread::sleep(RENDER_SETTLE);

        let html = self
            .tab
            .get_content()
            .map_err(|e| PageError::Content(e.to_string()))?;

        Ok(parse_cards(&html, &page_url, &self.selectors))
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Err(e) = self.tab.close(false) {
            warn!(error = %e, "failed to close tab");
        }
        info!("browser session closed");
    }
}
