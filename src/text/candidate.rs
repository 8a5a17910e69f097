//! N-gram candidate generation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::text::{stopwords::StopwordFilter, tokenizer::Token};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateParams {
    /// inclusive (min, max) n-gram length
    pub ngram_range: (usize, usize),
    /// minimum char length of every non-stopword token
    pub min_token_len: usize,
    /// allow numeric tokens inside candidates
    pub allow_numbers: bool,
}

impl Default for CandidateParams {
    fn default() -> Self {
        Self {
            ngram_range: (1, 3),
            min_token_len: 2,
            allow_numbers: false,
        }
    }
}

/// Location of one candidate occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub sentence: usize,
    /// index of the first token in the token slice
    pub start: usize,
    pub len: usize,
}

#[derive(Debug, Clone)]
pub struct Candidate {
    /// normalized form used for matching
    pub key: String,
    /// surface form of the first occurrence
    pub surface: String,
    /// normalized terms, one per token
    pub terms: Vec<String>,
    pub spans: Vec<Span>,
}

impl Candidate {
    #[inline]
    pub fn ngram(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.spans.len()
    }
}

/// Candidates of one document, unique by key, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    candidates: IndexMap<String, Candidate>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Candidate> {
        self.candidates.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.candidates.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.candidates.keys().map(|k| k.as_str())
    }

    fn record(&mut self, key: String, surface: String, terms: Vec<String>, span: Span) {
        self.candidates
            .entry(key)
            .or_insert_with_key(|key| Candidate {
                key: key.clone(),
                surface,
                terms,
                spans: Vec::new(),
            })
            .spans
            .push(span);
    }
}

#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    params: CandidateParams,
    stopwords: StopwordFilter,
}

impl CandidateGenerator {
    pub fn new(params: CandidateParams, stopwords: StopwordFilter) -> Self {
        Self { params, stopwords }
    }

    pub fn params(&self) -> &CandidateParams {
        &self.params
    }

    pub fn stopwords(&self) -> &StopwordFilter {
        &self.stopwords
    }

    /// Enumerate every n-gram inside a sentence that passes the filter.
    ///
    /// With `case_fold` the key is lowercased, otherwise it keeps the
    /// document's casing and `Syntax` and `syntax` are different keys.
    pub fn generate(&self, tokens: &[Token], case_fold: bool) -> CandidateSet {
        let mut set = CandidateSet::new();
        let (min_n, max_n) = self.params.ngram_range;
        if tokens.is_empty() || min_n == 0 || max_n < min_n {
            return set;
        }

        let mut run_start = 0;
        while run_start < tokens.len() {
            // maximal run of usable tokens inside one sentence
            let sentence = tokens[run_start].sentence;
            let mut run_end = run_start;
            while run_end < tokens.len()
                && tokens[run_end].sentence == sentence
                && self.usable(&tokens[run_end])
            {
                run_end += 1;
            }

            for start in run_start..run_end {
                for n in min_n..=max_n {
                    let end = start + n;
                    if end > run_end {
                        break;
                    }
                    let window = &tokens[start..end];
                    if !self.accepts(window) {
                        continue;
                    }
                    let terms: Vec<String> = window
                        .iter()
                        .map(|t| if case_fold { t.folded.clone() } else { t.surface.clone() })
                        .collect();
                    let surface = window
                        .iter()
                        .map(|t| t.surface.as_str())
                        .collect::<Vec<_>>()
                        .join(" ");
                    let key = terms.join(" ");
                    set.record(key, surface, terms, Span { sentence, start, len: n });
                }
            }
            run_start = run_end.max(run_start + 1);
        }
        set
    }

    #[inline]
    fn usable(&self, token: &Token) -> bool {
        token.is_word() || (self.params.allow_numbers && token.is_term())
    }

    /// no stopword at either edge, every content token long enough
    fn accepts(&self, window: &[Token]) -> bool {
        let (Some(first), Some(last)) = (window.first(), window.last()) else {
            return false;
        };
        if self.stopwords.is_stopword(&first.folded) || self.stopwords.is_stopword(&last.folded) {
            return false;
        }
        window.iter().all(|t| {
            self.stopwords.is_stopword(&t.folded)
                || t.folded.chars().count() >= self.params.min_token_len
        })
    }
}
