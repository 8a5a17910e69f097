use std::sync::Arc;

use tracing::debug;

use crate::document::Document;
use crate::error::Result;
use crate::extract::gold::GoldKeywordSet;
use crate::ranking::{ExtractionStage, RankedList};
use crate::vectorizer::{
    tfidf::{DefaultTFIDFEngine, TFIDFEngine},
    CorpusModel,
};

/// Top-n keywords of a document according to a trained corpus model,
/// optionally restricted to a gold keyword list
#[derive(Debug, Clone)]
pub struct WeightedExtractor<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine<f64>,
{
    model: CorpusModel<E>,
    stage: ExtractionStage,
    gold: Option<Arc<GoldKeywordSet>>,
    /// candidates requested per wanted keyword before gold filtering
    filler_factor: f64,
}

impl<E> WeightedExtractor<E>
where
    E: TFIDFEngine<f64>,
{
    pub fn new(model: CorpusModel<E>, stage: ExtractionStage) -> Self {
        Self {
            model,
            stage,
            gold: None,
            filler_factor: 1.0,
        }
    }

    /// Keep only gold keywords, scoring `filler_factor * n` candidates first
    pub fn with_gold(mut self, gold: Arc<GoldKeywordSet>, filler_factor: f64) -> Self {
        self.gold = Some(gold);
        self.filler_factor = filler_factor.max(1.0);
        self
    }

    pub fn set_gold(&mut self, gold: Arc<GoldKeywordSet>) {
        self.gold = Some(gold);
    }

    pub fn gold(&self) -> Option<&Arc<GoldKeywordSet>> {
        self.gold.as_ref()
    }

    pub fn model(&self) -> &CorpusModel<E> {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut CorpusModel<E> {
        &mut self.model
    }

    pub fn stage(&self) -> ExtractionStage {
        self.stage
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_trained()
    }

    pub fn extract_keywords(&self, document: &Document, n: usize) -> Result<RankedList> {
        let mut ranked = self.model.score(document, self.stage)?;
        let Some(gold) = &self.gold else {
            ranked.truncate(n);
            return Ok(ranked);
        };

        let requested = (n as f64 * self.filler_factor).ceil() as usize;
        ranked.truncate(requested);
        let mut filtered = RankedList::new(self.stage);
        for mut candidate in ranked {
            if let Some(form) = gold.lookup(&candidate.surface, &candidate.key) {
                // report the gold list's spelling
                candidate.surface = form.to_string();
                filtered.list.push(candidate);
            }
        }
        debug!(
            stage = %self.stage,
            requested,
            kept = filtered.len(),
            "gold list filter applied"
        );
        filtered.truncate(n);
        Ok(filtered)
    }
}
