//! Pipeline configuration, loadable from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. A corpus section fills its omitted fields from the raw-corpus
//! defaults, so a clean-corpus override should restate `lowercase`:
//!
//! ```json
//! { "n": 150, "dedup_lim": 0.9, "clean_corpus": { "lowercase": true, "min_df": 0.05 } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{KweError, Result};
use crate::extract::dedup::KeywordFilter;
use crate::graph::GraphParams;
use crate::utils::similarity::SimilarityMetric;
use crate::vectorizer::CorpusParams;

pub const DEFAULT_N: usize = 300;
pub const DEFAULT_DEDUP_LIM: f64 = 0.85;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KweConfig {
    /// number of keywords to return
    pub n: usize,
    /// similarity at or above which two keywords are duplicates
    pub dedup_lim: f64,
    pub similarity: SimilarityMetric,
    pub keyword_filter: KeywordFilter,
    pub graph: GraphParams,
    pub raw_corpus: CorpusParams,
    pub clean_corpus: CorpusParams,
    /// stage 3 scores `filler_factor * n` candidates before gold filtering
    pub filler_factor: f64,
    /// appended to the English stopword list
    pub extra_stopwords: Vec<String>,
}

impl Default for KweConfig {
    fn default() -> Self {
        Self {
            n: DEFAULT_N,
            dedup_lim: DEFAULT_DEDUP_LIM,
            similarity: SimilarityMetric::default(),
            keyword_filter: KeywordFilter::default(),
            graph: GraphParams::default(),
            raw_corpus: CorpusParams::raw(),
            clean_corpus: CorpusParams::clean(),
            filler_factor: 1.5,
            extra_stopwords: Vec::new(),
        }
    }
}

impl KweConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| KweError::input(path, e.to_string()))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        validate_dedup_lim(self.dedup_lim)?;
        if !(self.filler_factor >= 1.0) {
            return Err(KweError::Configuration(format!(
                "filler_factor must be at least 1, got {}",
                self.filler_factor
            )));
        }
        if let Some(limit) = self.graph.stage_dedup {
            if !(0.0..=1.0).contains(&limit) {
                return Err(KweError::Configuration(format!(
                    "graph.stage_dedup must lie in [0, 1], got {limit}"
                )));
            }
        }
        let (lo, hi) = self.graph.candidates.ngram_range;
        if lo == 0 || hi < lo {
            return Err(KweError::Configuration(format!("invalid graph ngram_range ({lo}, {hi})")));
        }
        self.raw_corpus.validate()?;
        self.clean_corpus.validate()
    }
}

pub fn validate_dedup_lim(dedup_lim: f64) -> Result<()> {
    if (0.0..=1.0).contains(&dedup_lim) {
        Ok(())
    } else {
        Err(KweError::Configuration(format!(
            "dedup_lim must lie in [0, 1], got {dedup_lim}"
        )))
    }
}
