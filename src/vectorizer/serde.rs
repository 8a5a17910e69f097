//! Persistable trained state of a corpus model.
//!
//! Snapshots are CBOR. A snapshot written by a different format version
//! is rejected instead of being scored with mismatched weights.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{KweError, Result};
use crate::vectorizer::{corpus::Corpus, tfidf::TFIDFEngine, CorpusParams};

pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermWeight {
    pub doc_freq: u64,
    pub idf: f64,
}

/// Vocabulary and document frequencies learned from one corpus.
/// Immutable once built; shared behind `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusStatistics {
    pub format_version: u32,
    /// parameters the vocabulary was built with
    pub params: CorpusParams,
    pub doc_num: u64,
    /// sorted by term
    pub vocabulary: IndexMap<String, TermWeight>,
}

impl CorpusStatistics {
    /// Freeze a pruned corpus into a sorted vocabulary
    pub fn from_corpus<E>(corpus: &Corpus, params: CorpusParams) -> Self
    where
        E: TFIDFEngine<f64>,
    {
        let terms = corpus.get_all_terms();
        let idf = E::idf_vec(corpus, &terms);
        let vocabulary = terms
            .into_iter()
            .zip(idf)
            .map(|(term, idf)| {
                let doc_freq = corpus.get_term_count(&term);
                (term, TermWeight { doc_freq, idf })
            })
            .collect();
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            params,
            doc_num: corpus.get_doc_num(),
            vocabulary,
        }
    }

    #[inline]
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|w| w.idf)
    }

    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_cbor::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_cbor::from_slice::<Self>(bytes)?.checked()
    }

    /// `None` when the bytes are not a CBOR snapshot at all
    pub fn decode(bytes: &[u8]) -> Option<Result<Self>> {
        serde_cbor::from_slice::<Self>(bytes).ok().map(Self::checked)
    }

    fn checked(self) -> Result<Self> {
        if self.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(KweError::Configuration(format!(
                "snapshot format version {} is not supported (expected {})",
                self.format_version, SNAPSHOT_FORMAT_VERSION
            )));
        }
        if self.vocabulary.is_empty() {
            return Err(KweError::Configuration("snapshot has an empty vocabulary".into()));
        }
        Ok(self)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_bytes()?).map_err(|e| KweError::input(path, e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| KweError::input(path, e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}
