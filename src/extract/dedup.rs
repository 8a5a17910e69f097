//! Post-processing of the merged candidate list: shape filters and
//! fuzzy deduplication.

use serde::{Deserialize, Serialize};

use crate::ranking::RankedCandidate;
use crate::utils::similarity::SimilarityMetric;

/// Shape filters applied to surface forms before deduplication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordFilter {
    /// drop keywords with a non-alphabetic token, unless a token is hyphenated
    pub non_alphabetic: bool,
    /// drop keywords whose first token occurs more than twice
    pub repeated_tokens: bool,
    /// drop `x X` shapes: a lowercase token followed by an all-caps one
    pub mixed_case_pairs: bool,
}

impl Default for KeywordFilter {
    fn default() -> Self {
        Self {
            non_alphabetic: true,
            repeated_tokens: true,
            mixed_case_pairs: true,
        }
    }
}

fn is_alphabetic(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}

/// Has cased characters and all of them are lowercase
fn is_lower(token: &str) -> bool {
    token.chars().any(char::is_lowercase) && !token.chars().any(char::is_uppercase)
}

/// Has cased characters and all of them are uppercase
fn is_upper(token: &str) -> bool {
    token.chars().any(char::is_uppercase) && !token.chars().any(char::is_lowercase)
}

impl KeywordFilter {
    /// Every filter off
    pub fn none() -> Self {
        Self {
            non_alphabetic: false,
            repeated_tokens: false,
            mixed_case_pairs: false,
        }
    }

    pub fn accepts(&self, keyword: &str) -> bool {
        let tokens: Vec<&str> = keyword.split_whitespace().collect();
        let Some(&first) = tokens.first() else {
            return false;
        };
        if self.non_alphabetic
            && !tokens.iter().all(|t| is_alphabetic(t))
            && !tokens.iter().any(|t| t.contains('-'))
        {
            return false;
        }
        if self.repeated_tokens && tokens.iter().filter(|&&t| t == first).count() > 2 {
            return false;
        }
        if self.mixed_case_pairs {
            if let Some(&second) = tokens.get(1) {
                if is_lower(first) && is_upper(second) {
                    return false;
                }
            }
        }
        true
    }
}

/// Greedy similarity filter: a candidate is kept only while it stays
/// below `limit` against everything kept before it
#[derive(Debug, Clone, Copy)]
pub struct Deduplicator {
    pub metric: SimilarityMetric,
    pub limit: f64,
}

impl Deduplicator {
    pub fn new(metric: SimilarityMetric, limit: f64) -> Self {
        Self { metric, limit }
    }

    /// First kept keyword that `candidate` duplicates
    pub fn find_duplicate<'a, I>(&self, candidate: &str, kept: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        kept.into_iter()
            .find(|k| self.metric.similarity(k, candidate) >= self.limit)
    }

    /// Walk the candidates in order, keeping the first of every similar group
    /// until `n` are kept
    pub fn deduplicate<I>(&self, candidates: I, n: usize) -> Vec<RankedCandidate>
    where
        I: IntoIterator<Item = RankedCandidate>,
    {
        let mut kept: Vec<RankedCandidate> = Vec::new();
        for candidate in candidates {
            if kept.len() >= n {
                break;
            }
            let duplicate = self.find_duplicate(
                &candidate.surface,
                kept.iter().map(|k| k.surface.as_str()),
            );
            if duplicate.is_none() {
                kept.push(candidate);
            }
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::ExtractionStage;

    fn candidate(surface: &str, stage: ExtractionStage) -> RankedCandidate {
        RankedCandidate {
            surface: surface.to_string(),
            key: surface.to_lowercase(),
            ngram: surface.split_whitespace().count(),
            score: 0.5,
            stage,
        }
    }

    #[test]
    fn filter_rules() {
        let f = KeywordFilter::default();
        assert!(f.accepts("vowel harmony"));
        assert!(f.accepts("Universal Grammar"));
        assert!(!f.accepts("section 3"));
        assert!(!f.accepts("don't"));
        assert!(f.accepts("wh-movement"));
        assert!(f.accepts("wh-movement 2"));
        assert!(!f.accepts("person person person"));
        assert!(f.accepts("person person"));
        assert!(!f.accepts("the NP"));
        assert!(f.accepts("NP movement"));
        assert!(!f.accepts(""));
        assert!(KeywordFilter::none().accepts("section 3"));
    }

    #[test]
    fn near_duplicates_keep_first_seen() {
        let dedup = Deduplicator::new(SimilarityMetric::JaroWinkler, 0.85);
        let kept = dedup.deduplicate(
            vec![
                candidate("keyword extraction", ExtractionStage::Graph),
                candidate("keyword extractions", ExtractionStage::RawCorpus),
                candidate("Keyword Extraction", ExtractionStage::CleanCorpus),
                candidate("phonology", ExtractionStage::CleanCorpus),
            ],
            10,
        );
        let surfaces: Vec<&str> = kept.iter().map(|c| c.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["keyword extraction", "phonology"]);
        assert_eq!(kept[0].stage, ExtractionStage::Graph);
    }

    #[test]
    fn stops_at_n_and_respects_limit() {
        let dedup = Deduplicator::new(SimilarityMetric::Levenshtein, 0.5);
        let input = ["syntax", "semantics", "pragmatics", "phonetics"]
            .iter()
            .map(|s| candidate(s, ExtractionStage::Graph));
        let kept = dedup.deduplicate(input.clone(), 2);
        assert_eq!(kept.len(), 2);
        assert!(dedup.deduplicate(input, 0).is_empty());
        for (i, a) in kept.iter().enumerate() {
            for b in kept.iter().skip(i + 1) {
                assert!(dedup.metric.similarity(&a.surface, &b.surface) < 0.5);
            }
        }
    }
}
