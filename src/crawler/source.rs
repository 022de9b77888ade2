use crate::crawler::card::RawCard;
use crate::crawler::errors::PageError;
use crate::crawler::selectors::FieldSpec;
use crate::crawler::types::Category;

/// Where listing cards come from.
///
/// The browser session is the production implementation; anything that can
/// produce card markup for a category page (saved HTML, a stub in tests) can
/// stand in for it. Field extraction defaults to CSS selection over the
/// card's markup.
pub trait ListingSource {
    /// Load one results page and split it into cards.
    fn fetch_page(&mut self, category: &Category, page: u32) -> Result<Vec<RawCard>, PageError>;

    fn extract_field(&self, card: &RawCard, spec: &FieldSpec) -> Option<String> {
        card.field(spec)
    }

    fn extract_list(&self, card: &RawCard, spec: &FieldSpec) -> Vec<String> {
        card.field_list(spec)
    }
}
