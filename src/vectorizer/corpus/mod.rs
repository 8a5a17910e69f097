use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Document count and per-term document frequencies of a training corpus
///
/// Built per worker and combined with [`Corpus::merge_corpus`], so no
/// locking is needed while training.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    /// number of documents added
    pub doc_num: u64,
    /// term -> number of documents containing it
    pub term_counts: IndexMap<String, u64>,
}

impl Corpus {
    /// Create a new instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one document's terms to the corpus
    /// `terms` must be unique within the document
    pub fn add_set<T>(&mut self, terms: &[T])
    where
        T: AsRef<str>,
    {
        self.doc_num += 1;
        for term in terms {
            *self.term_counts.entry(term.as_ref().to_string()).or_insert(0) += 1;
        }
    }

    /// Get the number of documents in the corpus
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Get the document frequency of a term
    pub fn get_term_count(&self, term: &str) -> u64 {
        self.term_counts.get(term).copied().unwrap_or(0)
    }

    /// Get the current vocabulary size (number of unique terms)
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_counts.len()
    }

    /// Get all terms in the corpus, sorted
    pub fn get_all_terms(&self) -> Vec<String> {
        let mut terms: Vec<String> = self.term_counts.keys().cloned().collect();
        terms.sort();
        terms
    }

    /// Merge another corpus into self
    pub fn merge_corpus(&mut self, other: Corpus) {
        for (term, count) in other.term_counts {
            *self.term_counts.entry(term).or_insert(0) += count;
        }
        self.doc_num += other.doc_num;
    }

    /// Drop terms whose document frequency falls outside
    /// `[min_df * N, max_df * N]`. Returns the number of dropped terms.
    pub fn prune(&mut self, min_df: f64, max_df: f64) -> usize {
        let n = self.doc_num as f64;
        let min_count = min_df * n;
        let max_count = max_df * n;
        let before = self.term_counts.len();
        self.term_counts
            .retain(|_, &mut df| (df as f64) >= min_count && (df as f64) <= max_count);
        before - self.term_counts.len()
    }
}
