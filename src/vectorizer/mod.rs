//! Corpus-trained TF-IDF keyword scoring
//!
//! A [`CorpusModel`] learns document frequencies of candidate n-grams
//! from a background corpus and scores a new document's candidates by
//! `tf * idf`, L2-normalized over the document. Higher is better.

pub mod corpus;
pub mod serde;
pub mod term;
pub mod tfidf;

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ::serde::{Deserialize, Serialize};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::document::{has_text_extension, read_corpus, Document};
use crate::error::{KweError, Result};
use crate::ranking::{ExtractionStage, RankedList};
use crate::text::{CandidateGenerator, CandidateParams, StopwordFilter};
use crate::utils::stats::l2_norm;
use crate::vectorizer::{
    corpus::Corpus,
    serde::CorpusStatistics,
    term::TermFrequency,
    tfidf::{DefaultTFIDFEngine, TFIDFEngine},
};

/// Vocabulary construction parameters.
/// `Default` is the raw-corpus setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusParams {
    /// fold case before counting
    pub lowercase: bool,
    /// minimum document proportion a term must reach
    pub min_df: f64,
    /// maximum document proportion a term may reach
    pub max_df: f64,
    pub candidates: CandidateParams,
}

impl CorpusParams {
    /// Stage 2: markup-laden corpus, case-sensitive
    pub fn raw() -> Self {
        Self {
            lowercase: false,
            min_df: 0.05,
            max_df: 0.8,
            candidates: CandidateParams {
                ngram_range: (1, 2),
                ..CandidateParams::default()
            },
        }
    }

    /// Stage 3: cleaned corpus, lowercased, looser lower bound
    pub fn clean() -> Self {
        Self {
            lowercase: true,
            min_df: 0.02,
            ..Self::raw()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.min_df) || !in_unit(self.max_df) {
            return Err(KweError::Configuration(format!(
                "min_df ({}) and max_df ({}) must lie in [0, 1]",
                self.min_df, self.max_df
            )));
        }
        if self.min_df > self.max_df {
            return Err(KweError::Configuration(format!(
                "min_df ({}) exceeds max_df ({})",
                self.min_df, self.max_df
            )));
        }
        let (lo, hi) = self.candidates.ngram_range;
        if lo == 0 || hi < lo {
            return Err(KweError::Configuration(format!("invalid ngram_range ({lo}, {hi})")));
        }
        Ok(())
    }
}

impl Default for CorpusParams {
    fn default() -> Self {
        Self::raw()
    }
}

/// Where training data comes from
#[derive(Debug, Clone)]
pub enum CorpusSource {
    /// already-loaded document texts
    Documents(Vec<String>),
    /// a snapshot file, a text file, or a directory of documents
    Path(PathBuf),
}

impl From<Vec<String>> for CorpusSource {
    fn from(documents: Vec<String>) -> Self {
        CorpusSource::Documents(documents)
    }
}

impl From<PathBuf> for CorpusSource {
    fn from(path: PathBuf) -> Self {
        CorpusSource::Path(path)
    }
}

impl From<&Path> for CorpusSource {
    fn from(path: &Path) -> Self {
        CorpusSource::Path(path.to_path_buf())
    }
}

impl From<&str> for CorpusSource {
    fn from(path: &str) -> Self {
        CorpusSource::Path(PathBuf::from(path))
    }
}

/// Try a path as a snapshot first. A file without a `.txt`/`.tex`
/// extension must decode; a text file that does not is corpus text.
fn load_snapshot(path: &Path) -> Result<Option<CorpusStatistics>> {
    if !path.is_file() {
        return Ok(None);
    }
    let bytes = fs::read(path).map_err(|e| KweError::input(path, e.to_string()))?;
    if has_text_extension(path) {
        CorpusStatistics::decode(&bytes).transpose()
    } else {
        CorpusStatistics::from_bytes(&bytes).map(Some)
    }
}

#[derive(Debug, Clone)]
pub struct CorpusModel<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine<f64>,
{
    params: CorpusParams,
    generator: CandidateGenerator,
    stats: Option<Arc<CorpusStatistics>>,
    _marker: PhantomData<E>,
}

impl<E> CorpusModel<E>
where
    E: TFIDFEngine<f64>,
{
    /// Create an untrained model
    pub fn new(params: CorpusParams, stopwords: StopwordFilter) -> Self {
        let generator = CandidateGenerator::new(params.candidates.clone(), stopwords);
        Self {
            params,
            generator,
            stats: None,
            _marker: PhantomData,
        }
    }

    /// Wrap statistics trained elsewhere; their parameters win
    pub fn from_statistics(stats: Arc<CorpusStatistics>, stopwords: StopwordFilter) -> Self {
        let mut model = Self::new(stats.params.clone(), stopwords);
        model.stats = Some(stats);
        model
    }

    pub fn params(&self) -> &CorpusParams {
        &self.params
    }

    pub fn statistics(&self) -> Option<&Arc<CorpusStatistics>> {
        self.stats.as_ref()
    }

    pub fn is_trained(&self) -> bool {
        self.stats.is_some()
    }

    /// Train from documents or a path, replacing any previous state.
    ///
    /// A path is first tried as a snapshot, which is loaded and never
    /// re-trained, then read as a text file or directory.
    pub fn train(&mut self, source: CorpusSource) -> Result<Arc<CorpusStatistics>> {
        self.params.validate()?;
        let documents = match source {
            CorpusSource::Documents(documents) => documents,
            CorpusSource::Path(path) => {
                if let Some(stats) = load_snapshot(&path)? {
                    let stats = Arc::new(stats);
                    info!(path = %path.display(), vocab = stats.vocab_size(), "loaded corpus snapshot");
                    self.adopt(stats.clone());
                    return Ok(stats);
                }
                let documents = read_corpus(&path)?;
                if documents.is_empty() {
                    return Err(KweError::Configuration(format!(
                        "corpus is empty: {}",
                        path.display()
                    )));
                }
                documents
            }
        };
        let stats = Arc::new(self.fit(&documents)?);
        self.stats = Some(stats.clone());
        Ok(stats)
    }

    fn adopt(&mut self, stats: Arc<CorpusStatistics>) {
        if stats.params != self.params {
            debug!("snapshot parameters override the configured ones");
            self.params = stats.params.clone();
            self.generator =
                CandidateGenerator::new(self.params.candidates.clone(), self.generator.stopwords().clone());
        }
        self.stats = Some(stats);
    }

    /// Count document frequencies in parallel, prune and freeze
    fn fit(&self, documents: &[String]) -> Result<CorpusStatistics> {
        let documents: Vec<&String> = documents.iter().filter(|d| !d.trim().is_empty()).collect();
        if documents.is_empty() {
            return Err(KweError::Configuration("corpus is empty".into()));
        }

        let lowercase = self.params.lowercase;
        let generator = &self.generator;
        let mut corpus = documents
            .par_iter()
            .fold(Corpus::new, |mut corpus, text| {
                let doc = Document::new(text.as_str());
                let set = generator.generate(doc.tokens(), lowercase);
                let keys: Vec<&str> = set.keys().collect();
                corpus.add_set(&keys);
                corpus
            })
            .reduce(Corpus::new, |mut a, b| {
                a.merge_corpus(b);
                a
            });

        let observed = corpus.vocab_size();
        let pruned = corpus.prune(self.params.min_df, self.params.max_df);
        info!(
            documents = corpus.get_doc_num(),
            observed,
            pruned,
            vocab = corpus.vocab_size(),
            "trained corpus model"
        );
        if corpus.vocab_size() == 0 {
            return Err(KweError::Configuration(format!(
                "vocabulary is empty after pruning {observed} terms (min_df {}, max_df {})",
                self.params.min_df, self.params.max_df
            )));
        }
        Ok(CorpusStatistics::from_corpus::<E>(&corpus, self.params.clone()))
    }

    /// Score every in-vocabulary candidate of the document, best first
    pub fn score(&self, document: &Document, stage: ExtractionStage) -> Result<RankedList> {
        let stats = self
            .stats
            .as_ref()
            .ok_or_else(|| KweError::Configuration("corpus model is not trained".into()))?;

        let mut ranked = RankedList::new(stage);
        let set = self.generator.generate(document.tokens(), self.params.lowercase);
        let freq = TermFrequency::from(&set);

        let scored: Vec<(usize, f64)> = set
            .iter()
            .enumerate()
            .filter_map(|(i, c)| stats.idf(&c.key).map(|idf| (i, E::tf(&freq, &c.key) * idf)))
            .collect();
        let weights: Vec<f64> = scored.iter().map(|&(_, w)| w).collect();
        let norm = l2_norm(&weights);
        if norm <= 0.0 {
            return Ok(ranked);
        }

        let candidates: Vec<_> = set.iter().collect();
        for (i, weight) in scored {
            let c = candidates[i];
            ranked.push(c.surface.clone(), c.key.clone(), c.ngram(), weight / norm);
        }
        ranked.sort_by_score();
        debug!(stage = %stage, scored = ranked.len(), "corpus stage scored candidates");
        Ok(ranked)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        match &self.stats {
            Some(stats) => stats.save(path),
            None => Err(KweError::Configuration("corpus model is not trained".into())),
        }
    }

    /// Load a snapshot into a new model
    pub fn load(path: impl AsRef<Path>, stopwords: StopwordFilter) -> Result<Self> {
        let stats = CorpusStatistics::load(path)?;
        Ok(Self::from_statistics(Arc::new(stats), stopwords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::vectorizer::tfidf::SublinearTFIDFEngine;

    fn corpus() -> Vec<String> {
        [
            "Phonology studies sound systems. Vowel harmony is common.",
            "Syntax studies sentence structure. Word order varies.",
            "Morphology studies word structure. Vowel harmony appears again.",
            "Semantics studies meaning. Word order matters less here.",
            "Pragmatics studies context and implicature.",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn stop() -> StopwordFilter {
        StopwordFilter::from_list(&["is", "and", "here", "again", "less"])
    }

    fn trained() -> CorpusModel {
        let mut model = CorpusModel::new(CorpusParams::clean(), stop());
        model.train(corpus().into()).unwrap();
        model
    }

    #[test]
    fn training_prunes_and_is_idempotent() {
        let model = trained();
        let stats = model.statistics().unwrap();
        assert_eq!(stats.doc_num, 5);
        // in all five documents, above max_df
        assert!(stats.idf("studies").is_none());
        assert!(stats.idf("vowel harmony").is_some());
        assert!(stats.idf("word order").is_some());

        let again = trained();
        assert_eq!(again.statistics().unwrap().as_ref(), stats.as_ref());
    }

    #[test]
    fn scores_are_normalized_and_descending() {
        let model = trained();
        let doc = Document::new("Vowel harmony and vowel harmony again. Pragmatics rarely.");
        let ranked = model.score(&doc, ExtractionStage::CleanCorpus).unwrap();
        assert!(!ranked.is_empty());
        // equal scores: shorter first, then lexicographic
        assert_eq!(ranked.keys(), vec!["harmony", "vowel", "vowel harmony", "pragmatics"]);
        let sq: f64 = ranked.iter().map(|c| c.score * c.score).sum();
        assert!((sq - 1.0).abs() < 1e-9);
        for pair in ranked.list.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert!(ranked.rank_of("rarely").is_none());
    }

    #[test]
    fn case_sensitive_model_keeps_document_casing() {
        let mut model = CorpusModel::<DefaultTFIDFEngine>::new(CorpusParams::raw(), stop());
        model.train(corpus().into()).unwrap();
        let stats = model.statistics().unwrap();
        assert!(stats.idf("Phonology").is_some());
        assert!(stats.idf("phonology").is_none());
    }

    #[test]
    fn empty_inputs_are_configuration_errors() {
        let mut model: CorpusModel = CorpusModel::new(CorpusParams::clean(), stop());
        let err = model.train(Vec::<String>::new().into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        // a single document prunes everything above max_df
        let err = model.train(vec!["only one document".to_string()].into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let untrained: CorpusModel = CorpusModel::new(CorpusParams::clean(), stop());
        let err = untrained.score(&Document::new("text"), ExtractionStage::CleanCorpus).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn invalid_params_are_rejected() {
        let params = CorpusParams {
            min_df: 0.9,
            max_df: 0.1,
            ..CorpusParams::clean()
        };
        assert!(params.validate().is_err());
        let mut model: CorpusModel = CorpusModel::new(params, stop());
        assert!(model.train(corpus().into()).is_err());
    }

    #[test]
    fn snapshot_paths_load_without_retraining() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean.cbor");
        let model = trained();
        model.save(&path).unwrap();

        let mut other: CorpusModel = CorpusModel::new(CorpusParams::raw(), stop());
        other.train(path.clone().into()).unwrap();
        assert_eq!(other.params(), &CorpusParams::clean());

        let doc = Document::new("Word order and vowel harmony. Syntax studies word order.");
        assert_eq!(
            model.score(&doc, ExtractionStage::CleanCorpus).unwrap(),
            other.score(&doc, ExtractionStage::CleanCorpus).unwrap()
        );

        let loaded: CorpusModel = CorpusModel::load(&path, stop()).unwrap();
        assert!(loaded.is_trained());
    }

    #[test]
    fn snapshot_under_text_name_is_detected_by_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw_model.txt");
        let model = trained();
        model.save(&path).unwrap();

        let mut other: CorpusModel = CorpusModel::new(CorpusParams::raw(), stop());
        let stats = other.train(path.into()).unwrap();
        assert_eq!(stats.as_ref(), model.statistics().unwrap().as_ref());
    }

    #[test]
    fn text_file_that_is_no_snapshot_is_corpus_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.txt");
        std::fs::write(&path, "Vowel harmony and word order. Vowel harmony again.").unwrap();
        let params = CorpusParams {
            min_df: 0.0,
            max_df: 1.0,
            ..CorpusParams::clean()
        };
        let mut model: CorpusModel = CorpusModel::new(params, stop());
        let stats = model.train(path.into()).unwrap();
        assert_eq!(stats.doc_num, 1);
        assert!(stats.idf("vowel harmony").is_some());
    }

    #[test]
    fn corrupt_snapshot_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.kwv");
        std::fs::write(&path, b"\x00\x01garbage").unwrap();
        let mut model: CorpusModel = CorpusModel::new(CorpusParams::clean(), stop());
        let err = model.train(path.into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn trains_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        for (i, text) in corpus().iter().enumerate() {
            std::fs::write(dir.path().join(format!("doc{i}.txt")), text).unwrap();
        }
        let mut model: CorpusModel = CorpusModel::new(CorpusParams::clean(), stop());
        let stats = model.train(dir.path().into()).unwrap();
        assert_eq!(stats.as_ref(), trained().statistics().unwrap().as_ref());
    }

    #[test]
    fn engine_is_pluggable() {
        let mut model = CorpusModel::<SublinearTFIDFEngine>::new(CorpusParams::clean(), stop());
        model.train(corpus().into()).unwrap();
        let doc = Document::new("Vowel harmony, vowel harmony, vowel harmony. Word order.");
        let ranked = model.score(&doc, ExtractionStage::RawCorpus).unwrap();
        assert_eq!(ranked.stage, ExtractionStage::RawCorpus);
        assert!(ranked.rank_of("vowel harmony").unwrap() < ranked.rank_of("word order").unwrap());
    }
}
