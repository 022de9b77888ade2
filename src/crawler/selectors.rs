//! CSS selectors for the listing markup.
//!
//! The target site serves more than one card layout, so each field carries a
//! primary selector and an optional fallback tried only for that field.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Visible text, whitespace collapsed.
    Text,
    /// `href` attribute resolved against the page URL.
    Href,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub primary: String,
    pub fallback: Option<String>,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn text(name: &'static str, primary: &str) -> Self {
        Self {
            name,
            primary: primary.to_string(),
            fallback: None,
            kind: FieldKind::Text,
        }
    }

    pub fn href(name: &'static str, primary: &str) -> Self {
        Self {
            kind: FieldKind::Href,
            ..Self::text(name, primary)
        }
    }

    pub fn with_fallback(mut self, fallback: &str) -> Self {
        self.fallback = Some(fallback.to_string());
        self
    }

    /// Selectors in the order they are tried.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.fallback.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorSet {
    /// One element per listing card; also what page loads wait for.
    pub card: String,
    /// Project links whose parent element is used as a card when no
    /// `card` element is present.
    pub card_link: String,
    pub title: FieldSpec,
    pub url: FieldSpec,
    pub description: FieldSpec,
    pub skills: FieldSpec,
    pub budget: FieldSpec,
    pub time_left: FieldSpec,
    pub bids: FieldSpec,
}

impl SelectorSet {
    pub fn freelancer() -> Self {
        const PROJECT_LINK: &str = "a[href*='/projects/']";

        Self {
            card: "div.JobSearchCard-item".to_string(),
            card_link: PROJECT_LINK.to_string(),
            title: FieldSpec::text("title", "a.JobSearchCard-primary-heading-link")
                .with_fallback(PROJECT_LINK),
            url: FieldSpec::href("url", "a.JobSearchCard-primary-heading-link")
                .with_fallback(PROJECT_LINK),
            description: FieldSpec::text("description", "p.JobSearchCard-primary-description")
                .with_fallback(".ProjectSearchCard-secondary-heading"),
            skills: FieldSpec::text(
                "skills",
                "div.JobSearchCard-primary-tags a.JobSearchCard-primary-tagsLink",
            )
            .with_fallback("a[class*='tagsLink']"),
            budget: FieldSpec::text("budget", "div.JobSearchCard-primary-price"),
            time_left: FieldSpec::text("time_left", "span.JobSearchCard-primary-heading-days"),
            bids: FieldSpec::text("bids", "div.JobSearchCard-secondary-entry"),
        }
    }
}

impl Default for SelectorSet {
    fn default() -> Self {
        Self::freelancer()
    }
}
