use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

use crate::crawler::selectors::{FieldKind, FieldSpec, SelectorSet};
use crate::text::clean_fragment;

/// One listing card's markup, detached from the page it came from.
#[derive(Debug, Clone)]
pub struct RawCard {
    fragment: Html,
    page_url: Url,
}

impl RawCard {
    pub fn new(card_html: &str, page_url: Url) -> Self {
        Self {
            fragment: Html::parse_fragment(card_html),
            page_url,
        }
    }

    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    /// First non-empty value for `spec`, trying the fallback selector only
    /// when the primary one yields nothing.
    pub fn field(&self, spec: &FieldSpec) -> Option<String> {
        spec.selectors().find_map(|selector| {
            let value = self
                .select(spec.name, selector)
                .into_iter()
                .find_map(|el| self.value_of(el, spec.kind));
            if value.is_none() {
                debug!(field = spec.name, selector, "field absent");
            }
            value
        })
    }

    /// All non-empty values for `spec` from the first selector that has any.
    pub fn field_list(&self, spec: &FieldSpec) -> Vec<String> {
        for selector in spec.selectors() {
            let values: Vec<String> = self
                .select(spec.name, selector)
                .into_iter()
                .filter_map(|el| self.value_of(el, spec.kind))
                .collect();
            if !values.is_empty() {
                return values;
            }
        }
        Vec::new()
    }

    fn select(&self, field: &str, selector: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(selector) {
            Ok(parsed) => self.fragment.select(&parsed).collect(),
            Err(e) => {
                debug!(field, selector, error = %e, "invalid selector");
                Vec::new()
            }
        }
    }

    fn value_of(&self, element: ElementRef<'_>, kind: FieldKind) -> Option<String> {
        match kind {
            FieldKind::Text => clean_fragment(Some(element.text().collect::<String>().as_str())),
            FieldKind::Href => {
                let href = element.value().attr("href")?.trim();
                if href.is_empty() {
                    return None;
                }
                self.page_url.join(href).ok().map(String::from)
            }
        }
    }
}

/// Split a rendered results page into cards.
///
/// Uses the card selector; when nothing matches, every project link's parent
/// element becomes a card instead.
pub fn parse_cards(html: &str, page_url: &Url, selectors: &SelectorSet) -> Vec<RawCard> {
    let document = Html::parse_document(html);

    let primary: Vec<RawCard> = match Selector::parse(&selectors.card) {
        Ok(card) => document
            .select(&card)
            .map(|el| RawCard::new(&el.html(), page_url.clone()))
            .collect(),
        Err(e) => {
            debug!(selector = %selectors.card, error = %e, "invalid card selector");
            Vec::new()
        }
    };
    if !primary.is_empty() {
        return primary;
    }

    let Ok(link) = Selector::parse(&selectors.card_link) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let cards: Vec<RawCard> = document
        .select(&link)
        .filter_map(|a| a.parent().and_then(ElementRef::wrap))
        .filter(|parent| seen.insert(parent.id()))
        .map(|parent| RawCard::new(&parent.html(), page_url.clone()))
        .collect();

    debug!(cards = cards.len(), "used fallback card layout");
    cards
}
