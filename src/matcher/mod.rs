//! CV-to-project matching.
//!
//! The cleaned corpus is fitted once into a TF-IDF space; each query is
//! projected into it and projects are ranked by cosine similarity.

pub mod errors;
pub mod filter;
pub mod tokenizer;
pub mod vectorizer;

pub use errors::MatchError;
pub use filter::MatchFilter;
pub use vectorizer::{SparseVector, TfidfVectorizer};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::dataset::model::ProjectRecord;

/// One ranked project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub url: String,
    pub title: String,
    pub score: f64,
    pub category: String,
    pub budget: String,
    pub time_left: String,
    pub bids_count: u32,
}

#[derive(Debug, Clone)]
struct FittedCorpus {
    projects: Vec<ProjectRecord>,
    vectors: Vec<SparseVector>,
}

/// TF-IDF matcher with separate fit and rank steps.
#[derive(Debug, Clone, Default)]
pub struct TfidfMatcher {
    vectorizer: TfidfVectorizer,
    fitted: Option<FittedCorpus>,
}

impl TfidfMatcher {
    pub fn new(max_features: usize) -> Self {
        Self {
            vectorizer: TfidfVectorizer::new(max_features),
            fitted: None,
        }
    }

    /// Build the vector space from each project's `match_text`.
    #[instrument(skip_all, fields(projects = corpus.len()))]
    pub fn fit(&mut self, corpus: &[ProjectRecord]) {
        let texts: Vec<&str> = corpus.iter().map(|p| p.match_text.as_str()).collect();
        let vectors = self.vectorizer.fit_transform(&texts);
        self.fitted = Some(FittedCorpus {
            projects: corpus.to_vec(),
            vectors,
        });
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Projects sorted by similarity to `query`, best first, at most `top_k`.
    ///
    /// Equal scores keep corpus order, so a query sharing no vocabulary with
    /// the corpus returns the first `top_k` projects with score 0.
    pub fn rank(&self, query: &str, top_k: usize) -> Result<Vec<MatchResult>, MatchError> {
        let fitted = self.fitted.as_ref().ok_or(MatchError::NotFitted)?;
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.vectorizer.transform(query);
        if query_vector.is_zero() {
            debug!("query shares no vocabulary with the corpus");
        }

        let mut scored: Vec<(usize, f64)> = fitted
            .vectors
            .iter()
            .map(|v| query_vector.cosine(v))
            .enumerate()
            .collect();
        // stable: ties stay in corpus order
        scored.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(i, score)| {
                let p = &fitted.projects[i];
                MatchResult {
                    url: p.url.clone(),
                    title: p.title.clone(),
                    score,
                    category: p.category.clone(),
                    budget: p.budget.clone(),
                    time_left: p.time_left.clone(),
                    bids_count: p.bids_count,
                }
            })
            .collect())
    }
}

/// Fit `corpus` and rank it against `query` in one call.
pub fn match_projects(corpus: &[ProjectRecord], query: &str, top_k: usize) -> Vec<MatchResult> {
    let mut matcher = TfidfMatcher::default();
    matcher.fit(corpus);
    matcher.rank(query, top_k).unwrap_or_default()
}
