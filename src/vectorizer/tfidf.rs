use num::Float;

use crate::vectorizer::{corpus::Corpus, term::TermFrequency};

/// Weighting scheme of a corpus model.
///
/// `idf` is evaluated once per vocabulary term at training time and
/// persisted; `tf` is evaluated per scored document.
pub trait TFIDFEngine<N>
where
    N: Float,
{
    /// IDF of a term that occurs in `doc_freq` of `doc_num` documents
    fn idf(doc_num: u64, doc_freq: u64) -> N;

    /// Weight of a term inside one document
    fn tf(freq: &TermFrequency, term: &str) -> N;

    /// IDF vector over `terms`, in order
    fn idf_vec(corpus: &Corpus, terms: &[String]) -> Vec<N> {
        let doc_num = corpus.get_doc_num();
        terms
            .iter()
            .map(|term| Self::idf(doc_num, corpus.get_term_count(term)))
            .collect()
    }
}

fn cast<N: Float>(value: f64) -> N {
    N::from(value).unwrap_or_else(N::zero)
}

/// Smoothed idf, raw-count tf
/// `idf = ln((1 + N) / (1 + df)) + 1`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl DefaultTFIDFEngine {
    pub fn new() -> Self {
        DefaultTFIDFEngine
    }
}

impl<N> TFIDFEngine<N> for DefaultTFIDFEngine
where
    N: Float,
{
    fn idf(doc_num: u64, doc_freq: u64) -> N {
        cast(((1.0 + doc_num as f64) / (1.0 + doc_freq as f64)).ln() + 1.0)
    }

    fn tf(freq: &TermFrequency, term: &str) -> N {
        cast(freq.term_count(term) as f64)
    }
}

/// Same idf as [`DefaultTFIDFEngine`], tf damped to `1 + ln(count)`
#[derive(Debug, Clone, Copy, Default)]
pub struct SublinearTFIDFEngine;

impl<N> TFIDFEngine<N> for SublinearTFIDFEngine
where
    N: Float,
{
    fn idf(doc_num: u64, doc_freq: u64) -> N {
        <DefaultTFIDFEngine as TFIDFEngine<N>>::idf(doc_num, doc_freq)
    }

    fn tf(freq: &TermFrequency, term: &str) -> N {
        match freq.term_count(term) {
            0 => N::zero(),
            count => cast(1.0 + (count as f64).ln()),
        }
    }
}
