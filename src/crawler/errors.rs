use std::time::Duration;
use thiserror::Error;

/// Errors that abort a whole scrape run.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("browser session error: {0}")]
    Session(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors confined to one listing page. The page is skipped, never retried.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("invalid page url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("no '{selector}' element within {timeout:?}")]
    WaitTimeout { selector: String, timeout: Duration },

    #[error("failed to read page content: {0}")]
    Content(String),
}

impl PageError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::WaitTimeout { .. })
    }
}
