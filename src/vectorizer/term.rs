use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::text::CandidateSet;

/// TermFrequency struct
/// Counts how many times each term occurs in one document.
///
/// # Examples
/// ```
/// use keyword_vectorizer::vectorizer::term::TermFrequency;
/// let mut term_freq = TermFrequency::new();
/// term_freq.add_term("term1");
/// term_freq.add_term("term2");
/// term_freq.add_term("term1");
///
/// assert_eq!(term_freq.term_count("term1"), 2);
/// assert_eq!(term_freq.term_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TermFrequency {
    term_count: IndexMap<String, u64>,
    total_term_count: u64,
}

impl TermFrequency {
    /// Create a new TermFrequency
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a term
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        *self.term_count.entry(term.to_string()).or_insert(0) += 1;
        self.total_term_count += 1;
        self
    }

    /// Add multiple terms
    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }

    /// Set the occurrence count for a term, `0` removes it
    pub fn set_term_count(&mut self, term: &str, count: u64) -> &mut Self {
        let previous = if count == 0 {
            self.term_count.shift_remove(term).unwrap_or(0)
        } else {
            self.term_count.insert(term.to_string(), count).unwrap_or(0)
        };
        self.total_term_count = self.total_term_count - previous + count;
        self
    }
}

impl TermFrequency {
    #[inline]
    pub fn term_count(&self, term: &str) -> u64 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    /// Total occurrences over all terms
    #[inline]
    pub fn term_sum(&self) -> u64 {
        self.total_term_count
    }

    /// Terms and counts in insertion order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.term_count.iter().map(|(term, &count)| (term.as_str(), count))
    }

    pub fn len(&self) -> usize {
        self.term_count.len()
    }

    pub fn is_empty(&self) -> bool {
        self.term_count.is_empty()
    }
}

impl<T> From<&[T]> for TermFrequency
where
    T: AsRef<str>,
{
    fn from(terms: &[T]) -> Self {
        let mut tf = TermFrequency::new();
        tf.add_terms(terms);
        tf
    }
}

/// One entry per candidate key, counted once per occurrence
impl From<&CandidateSet> for TermFrequency {
    fn from(set: &CandidateSet) -> Self {
        let mut tf = TermFrequency::new();
        for candidate in set.iter() {
            tf.set_term_count(&candidate.key, candidate.count() as u64);
        }
        tf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_term_count_keeps_total_in_sync() {
        let mut tf = TermFrequency::from(&["a", "b", "a", "c"][..]);
        assert_eq!(tf.term_sum(), 4);
        tf.set_term_count("a", 5);
        assert_eq!(tf.term_sum(), 7);
        tf.set_term_count("b", 0);
        assert_eq!(tf.term_sum(), 6);
        assert_eq!(tf.term_count("b"), 0);
        assert_eq!(tf.iter().collect::<Vec<_>>(), vec![("a", 5), ("c", 1)]);
    }

    #[test]
    fn from_candidates_counts_occurrences() {
        use crate::text::{CandidateGenerator, CandidateParams, StopwordFilter, Tokenizer};
        let tokens = Tokenizer::plain().tokenize("word order. Word order matters.");
        let set = CandidateGenerator::new(CandidateParams::default(), StopwordFilter::empty())
            .generate(&tokens, true);
        let tf = TermFrequency::from(&set);
        assert_eq!(tf.term_count("word order"), 2);
        assert_eq!(tf.term_count("matters"), 1);
        assert_eq!(tf.len(), set.len());
    }
}
