//! Unsupervised, corpus-free keyword extraction
//!
//! Ranks candidates using only statistics internal to one document: a
//! term co-occurrence graph plus casing, position, frequency and
//! sentence-dispersion features. Scores are "lower is better".

pub mod cooccurrence;
pub mod features;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::Document;
use crate::graph::cooccurrence::CooccurrenceGraph;
use crate::graph::features::{FeatureWeights, TermTable};
use crate::ranking::{ExtractionStage, RankedList};
use crate::text::{Candidate, CandidateGenerator, CandidateParams, StopwordFilter};
use crate::utils::similarity::SimilarityMetric;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphParams {
    /// co-occurrence window, in terms
    pub window: usize,
    pub candidates: CandidateParams,
    pub weights: FeatureWeights,
    /// Levenshtein similarity above which a lower-ranked candidate is
    /// dropped inside this stage; `None` disables
    pub stage_dedup: Option<f64>,
}

impl Default for GraphParams {
    fn default() -> Self {
        Self {
            window: 1,
            candidates: CandidateParams::default(),
            weights: FeatureWeights::default(),
            stage_dedup: Some(0.75),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphExtractor {
    params: GraphParams,
    generator: CandidateGenerator,
}

impl GraphExtractor {
    pub fn new(params: GraphParams, stopwords: StopwordFilter) -> Self {
        let generator = CandidateGenerator::new(params.candidates.clone(), stopwords);
        Self { params, generator }
    }

    pub fn params(&self) -> &GraphParams {
        &self.params
    }

    /// Top `n` candidates, best (lowest score) first
    pub fn extract_keywords(&self, document: &Document, n: usize) -> RankedList {
        let mut ranked = self.rank(document);
        if let Some(limit) = self.params.stage_dedup {
            let mut kept = RankedList::new(ExtractionStage::Graph);
            for candidate in ranked.list.drain(..) {
                if kept.len() >= n {
                    break;
                }
                let similar = kept.iter().any(|k| {
                    SimilarityMetric::Levenshtein.similarity(&k.key, &candidate.key) > limit
                });
                if !similar {
                    kept.list.push(candidate);
                }
            }
            return kept;
        }
        ranked.truncate(n);
        ranked
    }

    /// Every candidate of the document, sorted, without truncation
    pub fn rank(&self, document: &Document) -> RankedList {
        let mut ranked = RankedList::new(ExtractionStage::Graph);
        let tokens = document.tokens();
        let candidates = self.generator.generate(tokens, true);
        if candidates.is_empty() {
            return ranked;
        }

        let graph = CooccurrenceGraph::from_tokens(tokens, self.params.window);
        let mut table = TermTable::collect(tokens, self.generator.stopwords());
        table.score(&graph, document.sentence_count(), &self.params.weights);
        debug!(
            terms = table.len(),
            edges = graph.edge_count(),
            candidates = candidates.len(),
            "graph stage scored terms"
        );

        for candidate in candidates.iter() {
            let score = candidate_score(candidate, &table, &graph);
            ranked.push(candidate.surface.clone(), candidate.key.clone(), candidate.ngram(), score);
        }
        ranked.sort_by_score();
        ranked
    }
}

/// `prod(H) / (tf * (1 + sum(H)))` over the candidate's terms.
///
/// An interior stopword contributes through the probability of the
/// bigrams around it: the more the candidate behaves like one unit, the
/// smaller the penalty.
pub fn candidate_score(candidate: &Candidate, table: &TermTable, graph: &CooccurrenceGraph) -> f64 {
    let mut prod_h = 1.0;
    let mut sum_h = 0.0;
    let terms = &candidate.terms;
    for (i, term) in terms.iter().enumerate() {
        let Some(stats) = table.get(term) else {
            continue;
        };
        if stats.stopword {
            let prob_prev = match i.checked_sub(1).and_then(|p| terms.get(p)) {
                Some(prev) if table.tf(prev) > 0.0 => graph.weight(prev, term) / table.tf(prev),
                _ => 0.0,
            };
            let prob_next = match terms.get(i + 1) {
                Some(next) if stats.tf > 0.0 => graph.weight(term, next) / stats.tf,
                _ => 0.0,
            };
            let prob = prob_prev * prob_next;
            prod_h *= 1.0 + (1.0 - prob);
            sum_h -= 1.0 - prob;
        } else {
            prod_h *= stats.score;
            sum_h += stats.score;
        }
    }
    let tf = candidate.count().max(1) as f64;
    prod_h / (tf * (1.0 + sum_h).max(f64::EPSILON))
}

#[cfg(test)]
mod tests {
    use super::*;

    const AMBIGUITY_DOC: &str = "Syntactic ambiguity is a core property of natural language. \
        Parsers must resolve syntactic ambiguity quickly.\n\n\
        In the second section we note that natural language shows syntactic ambiguity everywhere. \
        A giraffe appeared once.\n\n\
        The third section returns to natural language and syntactic ambiguity. \
        Speakers rarely notice it.\n\n\
        Finally, syntactic ambiguity in natural language remains a central puzzle.";

    fn extractor() -> GraphExtractor {
        GraphExtractor::new(GraphParams::default(), StopwordFilter::english())
    }

    #[test]
    fn repeated_compounds_outrank_rare_nouns() {
        let doc = Document::new(AMBIGUITY_DOC);
        let ranked = extractor().rank(&doc);
        let sa = ranked.rank_of("syntactic ambiguity").unwrap();
        let nl = ranked.rank_of("natural language").unwrap();
        let giraffe = ranked.rank_of("giraffe").unwrap();
        let puzzle = ranked.rank_of("puzzle").unwrap();
        assert!(sa < giraffe && sa < puzzle, "{ranked:#?}");
        assert!(nl < giraffe && nl < puzzle, "{ranked:#?}");
        assert!(ranked.rank_of("is").is_none());
        assert!(ranked.rank_of("a").is_none());
    }

    #[test]
    fn scores_ascend_and_ties_are_deterministic() {
        let doc = Document::new(AMBIGUITY_DOC);
        let a = extractor().rank(&doc);
        let b = extractor().rank(&doc);
        assert_eq!(a, b);
        for pair in a.list.windows(2) {
            assert!(pair[0].score <= pair[1].score);
        }
        assert!(a.iter().all(|c| c.stage == ExtractionStage::Graph));
    }

    #[test]
    fn extract_keywords_truncates_and_dedups_within_stage() {
        let doc = Document::new(AMBIGUITY_DOC);
        let top = extractor().extract_keywords(&doc, 5);
        assert!(top.len() <= 5);
        for (i, a) in top.iter().enumerate() {
            for b in top.iter().skip(i + 1) {
                assert!(SimilarityMetric::Levenshtein.similarity(&a.key, &b.key) <= 0.75);
            }
        }
        assert!(extractor().extract_keywords(&doc, 0).is_empty());
    }

    #[test]
    fn no_stage_dedup_keeps_plain_top_n() {
        let params = GraphParams {
            stage_dedup: None,
            ..GraphParams::default()
        };
        let ex = GraphExtractor::new(params, StopwordFilter::english());
        let doc = Document::new(AMBIGUITY_DOC);
        let full = ex.rank(&doc);
        let top = ex.extract_keywords(&doc, 3);
        assert_eq!(top.list, full.list[..3].to_vec());
    }

    #[test]
    fn interior_stopwords_use_bigram_probability() {
        let stop = StopwordFilter::from_list(&["of"]);
        let ex = GraphExtractor::new(GraphParams::default(), stop);
        let doc = Document::new(
            "Theory of mind develops early. Theory of mind is studied. Children acquire theory of mind.",
        );
        let ranked = ex.rank(&doc);
        let tom = ranked.iter().find(|c| c.key == "theory of mind").unwrap();
        assert!(tom.score.is_finite() && tom.score > 0.0);
        assert_eq!(tom.ngram, 3);
    }

    #[test]
    fn tiny_and_empty_documents_do_not_fail() {
        let ex = extractor();
        assert!(ex.rank(&Document::new("")).is_empty());
        let one = ex.rank(&Document::new("Morphology"));
        assert_eq!(one.keys(), vec!["morphology"]);
        assert!(one.list[0].score.is_finite());
    }
}
