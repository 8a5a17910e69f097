//! Stopword filtering
//!
//! Backed by the English list of the `stop-words` crate, extendable with
//! custom entries.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

/// A filter for recognizing stopwords. Matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    /// Set of stopwords (lowercase)
    stopwords: HashSet<String>,
}

impl Default for StopwordFilter {
    fn default() -> Self {
        Self::english()
    }
}

impl StopwordFilter {
    /// English stopwords
    pub fn english() -> Self {
        let stopwords = get(LANGUAGE::English)
            .iter()
            .map(|w| w.to_lowercase())
            .collect();
        Self { stopwords }
    }

    /// Create an empty stopword filter (no filtering)
    pub fn empty() -> Self {
        Self {
            stopwords: HashSet::new(),
        }
    }

    /// Create a stopword filter from a custom list
    pub fn from_list<T: AsRef<str>>(words: &[T]) -> Self {
        let stopwords = words.iter().map(|w| w.as_ref().to_lowercase()).collect();
        Self { stopwords }
    }

    /// Add additional stopwords to the filter
    pub fn add_stopwords<T: AsRef<str>>(&mut self, words: &[T]) {
        for word in words {
            self.stopwords.insert(word.as_ref().to_lowercase());
        }
    }

    /// Check if a word is a stopword
    #[inline]
    pub fn is_stopword(&self, word: &str) -> bool {
        if self.stopwords.contains(word) {
            return true;
        }
        // callers usually pass folded terms already; only fold when needed
        word.chars().any(char::is_uppercase) && self.stopwords.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}
