//! Term co-occurrence graph
//!
//! Stored as explicit adjacency maps `term -> (neighbor -> weight)`,
//! one for the right context (term precedes neighbor) and one for the
//! left context. Weights are accumulated co-occurrence counts.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::text::Token;

pub type Adjacency = IndexMap<String, IndexMap<String, f64>>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CooccurrenceGraph {
    /// term -> terms that follow it within the window
    outgoing: Adjacency,
    /// term -> terms that precede it within the window
    incoming: Adjacency,
}

impl CooccurrenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a token stream using a sliding window.
    ///
    /// Terms are the folded forms of word and number tokens. Windows never
    /// reach across sentences or punctuation.
    pub fn from_tokens(tokens: &[Token], window: usize) -> Self {
        let mut graph = Self::new();
        let window = window.max(1);

        let mut block: Vec<&str> = Vec::new();
        let mut sentence = tokens.first().map_or(0, |t| t.sentence);
        for token in tokens {
            if token.sentence != sentence || !token.is_term() {
                graph.add_block(&block, window);
                block.clear();
                sentence = token.sentence;
            }
            if token.is_term() {
                block.push(&token.folded);
            }
        }
        graph.add_block(&block, window);
        graph
    }

    fn add_block(&mut self, block: &[&str], window: usize) {
        for (j, term) in block.iter().enumerate() {
            self.add_node(term);
            for next in block.iter().skip(j + 1).take(window) {
                self.increment_edge(term, next, 1.0);
            }
        }
    }

    pub fn add_node(&mut self, term: &str) {
        if !self.outgoing.contains_key(term) {
            self.outgoing.insert(term.to_string(), IndexMap::new());
            self.incoming.insert(term.to_string(), IndexMap::new());
        }
    }

    /// Increment the directed edge `from -> to`. Self-loops are ignored.
    pub fn increment_edge(&mut self, from: &str, to: &str, weight: f64) {
        if from == to {
            return;
        }
        self.add_node(from);
        self.add_node(to);
        if let Some(edges) = self.outgoing.get_mut(from) {
            *edges.entry(to.to_string()).or_insert(0.0) += weight;
        }
        if let Some(edges) = self.incoming.get_mut(to) {
            *edges.entry(from.to_string()).or_insert(0.0) += weight;
        }
    }

    /// Weight of `from -> to`, zero when absent
    pub fn weight(&self, from: &str, to: &str) -> f64 {
        self.outgoing
            .get(from)
            .and_then(|edges| edges.get(to))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.outgoing.contains_key(term)
    }

    /// Distinct right neighbors
    pub fn out_degree(&self, term: &str) -> usize {
        self.outgoing.get(term).map_or(0, IndexMap::len)
    }

    /// Distinct left neighbors
    pub fn in_degree(&self, term: &str) -> usize {
        self.incoming.get(term).map_or(0, IndexMap::len)
    }

    pub fn out_weight(&self, term: &str) -> f64 {
        self.outgoing.get(term).map_or(0.0, |e| e.values().sum())
    }

    pub fn in_weight(&self, term: &str) -> f64 {
        self.incoming.get(term).map_or(0.0, |e| e.values().sum())
    }

    pub fn node_count(&self) -> usize {
        self.outgoing.len()
    }

    /// Number of directed edges
    pub fn edge_count(&self) -> usize {
        self.outgoing.values().map(IndexMap::len).sum()
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.outgoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Tokenizer;

    #[test]
    fn window_one_links_neighbors_only() {
        let tokens = Tokenizer::plain().tokenize("red green blue");
        let g = CooccurrenceGraph::from_tokens(&tokens, 1);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.weight("red", "green"), 1.0);
        assert_eq!(g.weight("green", "blue"), 1.0);
        assert_eq!(g.weight("red", "blue"), 0.0);
        assert_eq!(g.weight("green", "red"), 0.0);
        assert_eq!(g.in_degree("green"), 1);
        assert_eq!(g.out_degree("green"), 1);
    }

    #[test]
    fn weights_accumulate_and_windows_widen() {
        let tokens = Tokenizer::plain().tokenize("a b c. a b c.");
        let g = CooccurrenceGraph::from_tokens(&tokens, 2);
        assert_eq!(g.weight("a", "b"), 2.0);
        assert_eq!(g.weight("a", "c"), 2.0);
        // no edge across the sentence break
        assert_eq!(g.weight("c", "a"), 0.0);
        assert_eq!(g.out_weight("a"), 4.0);
        assert_eq!(g.in_weight("c"), 4.0);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn punctuation_splits_blocks_and_self_loops_are_dropped() {
        let tokens = Tokenizer::plain().tokenize("word, word word");
        let g = CooccurrenceGraph::from_tokens(&tokens, 3);
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn short_documents_give_isolated_nodes() {
        let tokens = Tokenizer::plain().tokenize("alone");
        let g = CooccurrenceGraph::from_tokens(&tokens, 5);
        assert!(g.contains("alone"));
        assert_eq!(g.out_degree("alone"), 0);
        assert!(CooccurrenceGraph::from_tokens(&[], 2).adjacency().is_empty());
    }
}
