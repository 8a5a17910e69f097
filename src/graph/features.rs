//! Per-term statistical features and their combination into one score.
//!
//! Lower combined scores mean more important terms.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::graph::cooccurrence::CooccurrenceGraph;
use crate::text::{StopwordFilter, Token};
use crate::utils::stats;

/// Exponents (relatedness, position) and multipliers (casing, frequency,
/// dispersion) applied when combining the five features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureWeights {
    pub casing: f64,
    pub position: f64,
    pub frequency: f64,
    pub relatedness: f64,
    pub dispersion: f64,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            casing: 1.0,
            position: 1.0,
            frequency: 1.0,
            relatedness: 1.0,
            dispersion: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TermFeatures {
    pub casing: f64,
    pub position: f64,
    pub frequency: f64,
    pub relatedness: f64,
    pub dispersion: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TermStats {
    pub tf: f64,
    /// capitalized occurrences that do not open a sentence
    pub tf_upper: f64,
    pub tf_acronym: f64,
    /// sentence index of every occurrence
    pub sentences: Vec<usize>,
    pub stopword: bool,
    pub features: TermFeatures,
    /// combined score, lower is better
    pub score: f64,
}

impl TermStats {
    fn distinct_sentences(&self) -> usize {
        let mut s = self.sentences.clone();
        s.dedup();
        s.len()
    }
}

/// Term statistics of one document
#[derive(Debug, Clone, Default)]
pub struct TermTable {
    terms: IndexMap<String, TermStats>,
}

impl TermTable {
    /// Collect raw counts from the token stream
    pub fn collect(tokens: &[Token], stopwords: &StopwordFilter) -> Self {
        let mut terms: IndexMap<String, TermStats> = IndexMap::new();
        let mut sentence = usize::MAX;
        let mut first_in_sentence = true;
        for token in tokens {
            if token.sentence != sentence {
                sentence = token.sentence;
                first_in_sentence = true;
            }
            if !token.is_term() {
                continue;
            }
            let stats = terms.entry(token.folded.clone()).or_insert_with(|| TermStats {
                stopword: stopwords.is_stopword(&token.folded),
                ..TermStats::default()
            });
            stats.tf += 1.0;
            if token.is_acronym() {
                stats.tf_acronym += 1.0;
            } else if token.is_capitalized() && !first_in_sentence {
                stats.tf_upper += 1.0;
            }
            // sentences arrive in order so this stays sorted
            stats.sentences.push(sentence);
            first_in_sentence = false;
        }
        Self { terms }
    }

    /// Compute the five features and the combined score of every content term
    pub fn score(&mut self, graph: &CooccurrenceGraph, sentence_count: usize, weights: &FeatureWeights) {
        let content_tf: Vec<f64> = self
            .terms
            .values()
            .filter(|s| !s.stopword)
            .map(|s| s.tf)
            .collect();
        if content_tf.is_empty() {
            return;
        }
        let mean_tf = stats::mean(&content_tf);
        let std_tf = stats::std_dev(&content_tf);
        let max_tf = content_tf.iter().copied().fold(1.0, f64::max);
        let sentence_count = sentence_count.max(1) as f64;

        for (term, s) in self.terms.iter_mut() {
            if s.stopword {
                continue;
            }
            let casing = s.tf_upper.max(s.tf_acronym) / (1.0 + s.tf.ln());

            let positions: Vec<f64> = s.sentences.iter().map(|&i| i as f64).collect();
            let position = (3.0 + stats::median(&positions)).ln().ln();

            let frequency = s.tf / (mean_tf + std_tf);

            // distinct neighbors per unit of co-occurrence weight, per side
            let in_w = graph.in_weight(term);
            let out_w = graph.out_weight(term);
            let wl = if in_w > 0.0 { graph.in_degree(term) as f64 / in_w } else { 0.0 };
            let wr = if out_w > 0.0 { graph.out_degree(term) as f64 / out_w } else { 0.0 };
            let relatedness = 1.0 + (wl + wr) * (s.tf / max_tf);

            let dispersion = s.distinct_sentences() as f64 / sentence_count;

            s.features = TermFeatures {
                casing,
                position,
                frequency,
                relatedness,
                dispersion,
            };
            s.score = combine(&s.features, weights);
        }
    }

    pub fn get(&self, term: &str) -> Option<&TermStats> {
        self.terms.get(term)
    }

    pub fn tf(&self, term: &str) -> f64 {
        self.terms.get(term).map_or(0.0, |s| s.tf)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// `(rel^w * pos^w) / (w*case + w*freq/rel + w*disp/rel)`
pub fn combine(f: &TermFeatures, w: &FeatureWeights) -> f64 {
    let numerator = f.relatedness.powf(w.relatedness) * f.position.powf(w.position);
    let denominator = w.casing * f.casing
        + w.frequency * f.frequency / f.relatedness
        + w.dispersion * f.dispersion / f.relatedness;
    if denominator > 0.0 {
        numerator / denominator
    } else {
        f64::INFINITY
    }
}
