//! Three-stage keyword extraction
//!
//! 1. graph ranking of the document alone (always runs)
//! 2. TF-IDF against a raw, markup-laden corpus
//! 3. TF-IDF against a cleaned corpus, kept only when on the gold list
//!
//! The stage lists are concatenated in that order, filtered, fuzzily
//! deduplicated and cut to `n`, so earlier stages win every tie.

pub mod dedup;
pub mod gold;
pub mod weighted;

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{validate_dedup_lim, KweConfig};
use crate::document::Document;
use crate::error::{KweError, Result};
use crate::extract::{dedup::Deduplicator, gold::GoldKeywordSet, weighted::WeightedExtractor};
use crate::graph::GraphExtractor;
use crate::ranking::{ExtractionStage, RankedCandidate};
use crate::text::StopwordFilter;
use crate::vectorizer::{CorpusModel, CorpusSource};

/// A stage that could not contribute. Extraction still succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct DegradedExtraction {
    pub stage: ExtractionStage,
    pub reason: String,
}

impl fmt::Display for DegradedExtraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage {} skipped: {}", self.stage, self.reason)
    }
}

/// Final keywords, alphabetical, plus how they were chosen
#[derive(Debug, Clone, Default)]
pub struct FinalKeywordList {
    /// sorted alphabetically
    pub keywords: Vec<String>,
    /// accepted candidates in acceptance order
    pub retained: Vec<RankedCandidate>,
    pub warnings: Vec<DegradedExtraction>,
}

impl FinalKeywordList {
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.keywords.iter()
    }

    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Keywords contributed by one stage
    pub fn from_stage(&self, stage: ExtractionStage) -> impl Iterator<Item = &RankedCandidate> {
        self.retained.iter().filter(move |c| c.stage == stage)
    }

    /// Write one keyword per line
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut out = String::new();
        for keyword in &self.keywords {
            out.push_str(keyword);
            out.push('\n');
        }
        fs::write(path, out).map_err(|e| KweError::input(path, e.to_string()))
    }
}

impl IntoIterator for FinalKeywordList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.keywords.into_iter()
    }
}

#[derive(Debug, Clone)]
pub struct KeywordPipeline {
    config: KweConfig,
    stopwords: StopwordFilter,
    graph: GraphExtractor,
    raw: WeightedExtractor,
    clean: WeightedExtractor,
}

impl KeywordPipeline {
    /// Untrained pipeline with the embedded gold list
    pub fn new(config: KweConfig) -> Result<Self> {
        config.validate()?;
        let mut stopwords = StopwordFilter::english();
        stopwords.add_stopwords(&config.extra_stopwords);
        let gold = Arc::new(GoldKeywordSet::default_list());
        Ok(Self {
            graph: GraphExtractor::new(config.graph.clone(), stopwords.clone()),
            raw: WeightedExtractor::new(
                CorpusModel::new(config.raw_corpus.clone(), stopwords.clone()),
                ExtractionStage::RawCorpus,
            ),
            clean: WeightedExtractor::new(
                CorpusModel::new(config.clean_corpus.clone(), stopwords.clone()),
                ExtractionStage::CleanCorpus,
            )
            .with_gold(gold, config.filler_factor),
            stopwords,
            config,
        })
    }

    /// Replace the gold list used by stage 3
    pub fn with_gold(mut self, gold: GoldKeywordSet) -> Self {
        self.clean.set_gold(Arc::new(gold));
        self
    }

    pub fn config(&self) -> &KweConfig {
        &self.config
    }

    pub fn stopwords(&self) -> &StopwordFilter {
        &self.stopwords
    }

    /// Train stage 2 on `corpus1` and stage 3 on `corpus2`. An omitted
    /// corpus leaves its stage untrained; it is skipped at extraction.
    pub fn train(&mut self, corpus1: Option<CorpusSource>, corpus2: Option<CorpusSource>) -> Result<()> {
        if let Some(source) = corpus1 {
            self.raw.model_mut().train(source)?;
            info!("trained stage {}", ExtractionStage::RawCorpus);
        }
        if let Some(source) = corpus2 {
            self.clean.model_mut().train(source)?;
            info!("trained stage {}", ExtractionStage::CleanCorpus);
        }
        Ok(())
    }

    /// Stages that will run, in priority order
    pub fn trained_stages(&self) -> Vec<ExtractionStage> {
        let mut stages = vec![ExtractionStage::Graph];
        if self.raw.is_trained() {
            stages.push(ExtractionStage::RawCorpus);
        }
        if self.clean.is_trained() {
            stages.push(ExtractionStage::CleanCorpus);
        }
        stages
    }

    /// Write the trained corpus models as snapshots
    pub fn save_models(&self, raw: Option<&Path>, clean: Option<&Path>) -> Result<()> {
        if let Some(path) = raw {
            self.raw.model().save(path)?;
            info!(path = %path.display(), "saved {} snapshot", ExtractionStage::RawCorpus);
        }
        if let Some(path) = clean {
            self.clean.model().save(path)?;
            info!(path = %path.display(), "saved {} snapshot", ExtractionStage::CleanCorpus);
        }
        Ok(())
    }

    /// Drop all trained corpus state
    pub fn reset(&mut self) {
        self.raw = WeightedExtractor::new(
            CorpusModel::new(self.config.raw_corpus.clone(), self.stopwords.clone()),
            ExtractionStage::RawCorpus,
        );
        let clean = CorpusModel::new(self.config.clean_corpus.clone(), self.stopwords.clone());
        let gold = self.clean_gold();
        self.clean = WeightedExtractor::new(clean, ExtractionStage::CleanCorpus)
            .with_gold(gold, self.config.filler_factor);
    }

    fn clean_gold(&self) -> Arc<GoldKeywordSet> {
        self.clean
            .gold()
            .cloned()
            .unwrap_or_else(|| Arc::new(GoldKeywordSet::default_list()))
    }

    pub fn extract_keywords_from_path(
        &self,
        path: impl AsRef<Path>,
        n: usize,
        dedup_lim: f64,
    ) -> Result<FinalKeywordList> {
        let document = Document::from_path(path)?;
        self.extract_keywords(&document, n, dedup_lim)
    }

    /// Run every available stage, merge, filter, deduplicate and sort
    pub fn extract_keywords(&self, document: &Document, n: usize, dedup_lim: f64) -> Result<FinalKeywordList> {
        validate_dedup_lim(dedup_lim)?;
        let mut result = FinalKeywordList::default();
        for extractor in [&self.raw, &self.clean] {
            if !extractor.is_trained() {
                let degraded = DegradedExtraction {
                    stage: extractor.stage(),
                    reason: "no corpus supplied".to_string(),
                };
                warn!("{degraded}");
                result.warnings.push(degraded);
            }
        }
        if n == 0 || document.is_empty() {
            return Ok(result);
        }

        let mut merged: Vec<RankedCandidate> = self.graph.extract_keywords(document, n).into_iter().collect();
        for extractor in [&self.raw, &self.clean] {
            if extractor.is_trained() {
                merged.extend(extractor.extract_keywords(document, n)?);
            }
        }
        let merged_len = merged.len();

        let filter = self.config.keyword_filter;
        let dedup = Deduplicator::new(self.config.similarity, dedup_lim);
        result.retained = dedup.deduplicate(merged.into_iter().filter(|c| filter.accepts(&c.surface)), n);
        result.keywords = result.retained.iter().map(|c| c.surface.clone()).collect();
        result.keywords.sort();
        info!(
            stages = self.trained_stages().len(),
            merged = merged_len,
            kept = result.len(),
            "extracted keywords"
        );
        Ok(result)
    }
}
