//! Curated list of accepted keywords.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::document::read_text;
use crate::error::Result;

static DEFAULT_GOLD_KEYWORDS: &str = include_str!("../../data/gold_keywords.txt");

/// Newline-delimited keyword list, matched exactly or case-folded
#[derive(Debug, Clone, Default)]
pub struct GoldKeywordSet {
    exact: HashSet<String>,
    /// folded entry -> entry as listed
    folded: HashMap<String, String>,
}

impl GoldKeywordSet {
    /// One keyword per line; blank lines and surrounding whitespace ignored
    pub fn from_lines(text: &str) -> Self {
        let mut set = Self::default();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            set.folded
                .entry(line.to_lowercase())
                .or_insert_with(|| line.to_string());
            set.exact.insert(line.to_string());
        }
        set
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_lines(&read_text(path)?))
    }

    /// The list shipped with the crate
    pub fn default_list() -> Self {
        Self::from_lines(DEFAULT_GOLD_KEYWORDS)
    }

    /// Gold form matching a candidate: its surface as written first,
    /// then its lowercased surface or folded key, then any entry that
    /// differs only in case
    pub fn lookup(&self, surface: &str, key: &str) -> Option<&str> {
        if let Some(hit) = self.exact.get(surface) {
            return Some(hit);
        }
        let lower = surface.to_lowercase();
        self.exact
            .get(&lower)
            .or_else(|| self.exact.get(key))
            .or_else(|| self.folded.get(&lower))
            .map(String::as_str)
    }

    pub fn contains(&self, surface: &str, key: &str) -> bool {
        self.lookup(surface, key).is_some()
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_surface_then_lowercase_then_folded() {
        let gold = GoldKeywordSet::from_lines("word order\n\nUniversal Grammar\n  vowel harmony  \n");
        assert_eq!(gold.len(), 3);
        assert_eq!(gold.lookup("Word order", "word order"), Some("word order"));
        assert_eq!(gold.lookup("Universal Grammar", "universal grammar"), Some("Universal Grammar"));
        assert_eq!(gold.lookup("universal grammar", "universal grammar"), Some("Universal Grammar"));
        assert_eq!(gold.lookup("UNIVERSAL grammar", "universal grammar"), Some("Universal Grammar"));
        assert!(gold.contains("vowel harmony", "vowel harmony"));
        assert!(!gold.contains("stress", "stress"));
    }

    #[test]
    fn default_list_is_embedded() {
        let gold = GoldKeywordSet::default_list();
        assert!(gold.len() > 100);
        assert!(gold.contains("syntactic ambiguity", "syntactic ambiguity"));
        assert!(gold.contains("natural language", "natural language"));
    }

    #[test]
    fn from_path_reads_text_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gold.txt");
        std::fs::write(&path, "case marking\nevidentiality\n").unwrap();
        let gold = GoldKeywordSet::from_path(&path).unwrap();
        assert!(gold.contains("evidentiality", "evidentiality"));
        assert!(GoldKeywordSet::from_path(dir.path().join("missing.txt")).is_err());
    }
}
