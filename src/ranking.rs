use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Extraction stage, in priority order (earlier = more important)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStage {
    /// Co-occurrence graph over the input document alone
    Graph,
    /// TF-IDF against the raw (markup) corpus
    RawCorpus,
    /// TF-IDF against the cleaned corpus, gold-filtered
    CleanCorpus,
}

/// Which way a stage's raw scores point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorePolarity {
    LowerIsBetter,
    HigherIsBetter,
}

impl ExtractionStage {
    pub const ALL: [ExtractionStage; 3] = [
        ExtractionStage::Graph,
        ExtractionStage::RawCorpus,
        ExtractionStage::CleanCorpus,
    ];

    pub fn polarity(self) -> ScorePolarity {
        match self {
            ExtractionStage::Graph => ScorePolarity::LowerIsBetter,
            ExtractionStage::RawCorpus | ExtractionStage::CleanCorpus => ScorePolarity::HigherIsBetter,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ExtractionStage::Graph => "graph",
            ExtractionStage::RawCorpus => "raw-corpus",
            ExtractionStage::CleanCorpus => "clean-corpus",
        }
    }
}

impl std::fmt::Display for ExtractionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One scored candidate, tagged with the stage that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub surface: String,
    pub key: String,
    /// token count
    pub ngram: usize,
    /// raw stage score, see [`ExtractionStage::polarity`]
    pub score: f64,
    pub stage: ExtractionStage,
}

/// Best-first list of candidates from a single stage
#[derive(Clone, PartialEq)]
pub struct RankedList {
    pub stage: ExtractionStage,
    pub list: Vec<RankedCandidate>,
}

impl RankedList {
    pub fn new(stage: ExtractionStage) -> Self {
        Self {
            stage,
            list: Vec::new(),
        }
    }

    pub fn push(&mut self, surface: impl Into<String>, key: impl Into<String>, ngram: usize, score: f64) {
        self.list.push(RankedCandidate {
            surface: surface.into(),
            key: key.into(),
            ngram,
            score,
            stage: self.stage,
        });
    }

    /// Sort best-first by the stage's polarity. NaN scores are removed.
    /// Ties go to the shorter n-gram, then to the lexicographically
    /// smaller key.
    pub fn sort_by_score(&mut self) -> &mut Self {
        self.list.retain(|c| !c.score.is_nan());
        let polarity = self.stage.polarity();
        self.list.sort_by(|a, b| {
            let by_score = match polarity {
                ScorePolarity::LowerIsBetter => a.score.total_cmp(&b.score),
                ScorePolarity::HigherIsBetter => b.score.total_cmp(&a.score),
            };
            by_score
                .then_with(|| a.ngram.cmp(&b.ngram))
                .then_with(|| a.key.cmp(&b.key))
        });
        self
    }

    pub fn truncate(&mut self, n: usize) -> &mut Self {
        self.list.truncate(n);
        self
    }

    /// Keep only the candidates matching the predicate, order unchanged
    pub fn retain<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(&RankedCandidate) -> bool,
    {
        self.list.retain(f);
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedCandidate> {
        self.list.iter()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.list.iter().map(|c| c.key.as_str()).collect()
    }

    /// Position of a key in the list
    pub fn rank_of(&self, key: &str) -> Option<usize> {
        self.list.iter().position(|c| c.key == key)
    }
}

impl IntoIterator for RankedList {
    type Item = RankedCandidate;
    type IntoIter = std::vec::IntoIter<RankedCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl Debug for RankedList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            // one candidate per line
            writeln!(f, "RankedList<{}> [", self.stage)?;
            for c in &self.list {
                writeln!(f, "    {:?}: {:.6} (n={})", c.surface, c.score, c.ngram)?;
            }
            write!(f, "]")
        } else {
            f.debug_list()
                .entries(self.list.iter().map(|c| (&c.key, c.score)))
                .finish()
        }
    }
}
