//! Tokenization, stopwords and candidate generation
//!
//! Shared by the graph extractor and the corpus model.

pub mod candidate;
pub mod stopwords;
pub mod tokenizer;

pub use candidate::{Candidate, CandidateGenerator, CandidateParams, CandidateSet, Span};
pub use stopwords::StopwordFilter;
pub use tokenizer::{Token, TokenKind, Tokenizer};
