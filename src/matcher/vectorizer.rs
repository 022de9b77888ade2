//! TF-IDF vector space.
//!
//! Raw term counts weighted by smoothed inverse document frequency
//! (`ln((1 + n) / (1 + df)) + 1`), each vector L2-normalized, so cosine
//! similarity reduces to a sparse dot product.

use std::collections::HashMap;
use tracing::debug;

use crate::matcher::tokenizer::tokenize;

pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Sparse vector as `(term index, weight)` pairs sorted by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector(Vec<(usize, f64)>);

impl SparseVector {
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.0
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j, mut sum) = (0, 0, 0.0);
        while i < self.0.len() && j < other.0.len() {
            let (a, wa) = self.0[i];
            let (b, wb) = other.0[j];
            match a.cmp(&b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Cosine similarity of two normalized vectors, clamped to `[0, 1]`.
    pub fn cosine(&self, other: &SparseVector) -> f64 {
        self.dot(other).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
        }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    /// Learn vocabulary and idf from `documents`, returning their vectors.
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Vec<SparseVector> {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

        // term -> (document frequency, corpus count)
        let mut stats: HashMap<&str, (usize, usize)> = HashMap::new();
        for tokens in &tokenized {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for t in tokens {
                *counts.entry(t.as_str()).or_default() += 1;
            }
            for (term, count) in counts {
                let entry = stats.entry(term).or_default();
                entry.0 += 1;
                entry.1 += count;
            }
        }

        let mut terms: Vec<(&str, (usize, usize))> = stats.into_iter().collect();
        if terms.len() > self.max_features {
            terms.sort_by(|(ta, (dfa, tfa)), (tb, (dfb, tfb))| {
                dfb.cmp(dfa).then(tfb.cmp(tfa)).then(ta.cmp(tb))
            });
            terms.truncate(self.max_features);
        }
        terms.sort_by(|(a, _), (b, _)| a.cmp(b));

        let n_docs = documents.len() as f64;
        self.vocabulary = terms
            .iter()
            .enumerate()
            .map(|(i, (term, _))| (term.to_string(), i))
            .collect();
        self.idf = terms
            .iter()
            .map(|(_, (df, _))| ((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();

        debug!(documents = documents.len(), vocabulary = self.vocabulary.len(), "fitted tf-idf");
        tokenized.iter().map(|tokens| self.vectorize(tokens)).collect()
    }

    /// Project text into the fitted space; unknown terms are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        self.vectorize(&tokenize(text))
    }

    fn vectorize(&self, tokens: &[String]) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for t in tokens {
            if let Some(&idx) = self.vocabulary.get(t) {
                *counts.entry(idx).or_default() += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();
        entries.sort_by_key(|(idx, _)| *idx);

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }
        SparseVector(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectors_are_normalized() {
        let mut v = TfidfVectorizer::default();
        let vectors = v.fit_transform(&["python flask python", "logo design"]);
        for vec in &vectors {
            let norm: f64 = vec.entries().iter().map(|(_, w)| w * w).sum();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_smoothed_idf() {
        let mut v = TfidfVectorizer::default();
        v.fit_transform(&["python api", "python web", "logo"]);
        let python = v.vocabulary["python"];
        let logo = v.vocabulary["logo"];
        assert!((v.idf[python] - ((4.0f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
        assert!((v.idf[logo] - (2.0f64.ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_max_features_keeps_most_frequent_documents() {
        let mut v = TfidfVectorizer::new(2);
        v.fit_transform(&["rust tokio axum", "rust tokio", "rust"]);
        assert_eq!(v.vocabulary_len(), 2);
        assert!(v.contains("rust"));
        assert!(v.contains("tokio"));
        assert!(!v.contains("axum"));
    }

    #[test]
    fn test_unknown_terms_are_zero() {
        let mut v = TfidfVectorizer::default();
        v.fit_transform(&["python flask"]);
        assert!(v.transform("cobol mainframe").is_zero());
    }

    #[test]
    fn test_empty_corpus() {
        let mut v = TfidfVectorizer::default();
        assert!(v.fit_transform::<&str>(&[]).is_empty());
        assert!(v.transform("anything").is_zero());
    }

    #[test]
    fn test_dot_product() {
        let a = SparseVector(vec![(0, 0.6), (2, 0.8)]);
        let b = SparseVector(vec![(1, 1.0), (2, 1.0)]);
        assert!((a.dot(&b) - 0.8).abs() < 1e-12);
        assert_eq!(a.cosine(&SparseVector::default()), 0.0);
    }
}
