use crate::matcher::MatchResult;

/// Thresholds a caller applies to ranked results. The matcher never applies
/// these itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchFilter {
    pub min_score: f64,
    /// 0 disables the bid limit.
    pub max_bids: u32,
    /// Case-insensitive substring of the category; empty disables it.
    pub category: String,
}

impl MatchFilter {
    pub fn new(min_score: f64, max_bids: u32, category: &str) -> Self {
        Self {
            min_score,
            max_bids,
            category: category.trim().to_string(),
        }
    }

    pub fn accepts(&self, result: &MatchResult) -> bool {
        if self.max_bids > 0 && result.bids_count > self.max_bids {
            return false;
        }
        if !self.category.is_empty()
            && !result
                .category
                .to_lowercase()
                .contains(&self.category.to_lowercase())
        {
            return false;
        }
        result.score >= self.min_score
    }

    pub fn apply(&self, results: Vec<MatchResult>) -> Vec<MatchResult> {
        results.into_iter().filter(|r| self.accepts(r)).collect()
    }
}
