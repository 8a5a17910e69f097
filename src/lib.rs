/// This crate extracts keywords from long technical documents in three stages:
/// a co-occurrence graph ranking of the document itself, then TF-IDF scoring
/// against a raw and a cleaned background corpus.
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod graph;
pub mod ranking;
pub mod text;
pub mod utils;
pub mod vectorizer;

/// Keyword Pipeline
/// The top-level struct of this crate. It runs the three extraction stages
/// and merges their results into one deduplicated, alphabetical list.
///
/// Internally, it holds:
/// - The graph extractor (stage 1, always available)
/// - A corpus model trained on raw documents (stage 2)
/// - A corpus model trained on cleaned documents, filtered by a gold keyword list (stage 3)
///
/// Stages whose corpus was never supplied are skipped; the result then
/// carries a `DegradedExtraction` warning for each of them.
///
/// # Example
/// ```no_run
/// use keyword_vectorizer::{Document, KeywordPipeline, KweConfig};
///
/// let mut pipeline = KeywordPipeline::new(KweConfig::default())?;
/// pipeline.train(Some("corpora/tex".into()), Some("corpora/clean".into()))?;
/// let doc = Document::from_path("book/")?;
/// for keyword in pipeline.extract_keywords(&doc, 300, 0.85)? {
///     println!("{keyword}");
/// }
/// # Ok::<(), keyword_vectorizer::KweError>(())
/// ```
pub use extract::KeywordPipeline;

/// Result of an extraction
/// Keywords sorted alphabetically, the accepted candidates in acceptance
/// order (with stage and score) and the warnings of skipped stages.
pub use extract::{DegradedExtraction, FinalKeywordList};

/// Pipeline configuration
/// All fields have defaults; load overrides from JSON with
/// `KweConfig::from_json_file`.
pub use config::KweConfig;

/// Input document
/// Raw text with its token sequence. Built from a string or read from a
/// `.txt`/`.tex` file or a directory of chapter files.
pub use document::Document;

/// Error type and its coarse kind
pub use error::{ErrorKind, KweError, Result};

/// Graph extractor
/// Ranks candidates of a single document without any corpus. Lower
/// scores are better.
pub use graph::GraphExtractor;

/// Corpus model
/// TF-IDF statistics learned from a background corpus. Higher scores
/// are better.
///
/// # Serialization
/// The trained `CorpusStatistics` is saved and loaded as CBOR. Training
/// from a snapshot path loads it instead of re-reading text.
pub use vectorizer::{corpus::Corpus, serde::CorpusStatistics, CorpusModel, CorpusParams, CorpusSource};

/// Term Frequency structure
/// Occurrence counts of candidate terms within one document.
pub use vectorizer::term::TermFrequency;

/// Ranked candidate lists, tagged with the stage that produced them
pub use ranking::{ExtractionStage, RankedCandidate, RankedList};

/// Gold keyword list used to filter stage 3
pub use extract::gold::GoldKeywordSet;

pub use text::StopwordFilter;
pub use utils::similarity::SimilarityMetric;
