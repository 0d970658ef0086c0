use std::collections::HashMap;

use rand::Rng;

use crate::token::{NodeId, Token};

/// Successor (or start) tokens with integer traversal counts.
///
/// Entries keep insertion order, so a seeded generator walks the same path
/// on every run.
#[derive(Debug, Clone, Default)]
pub struct WeightedSet {
    entries: Vec<(NodeId, u32)>,
    /// Position of each node in `entries`.
    index: HashMap<NodeId, usize>,
    total: u64,
}

impl WeightedSet {
    /// Add one observation of `id`.
    pub fn reinforce(&mut self, id: NodeId) {
        match self.index.get(&id) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.index.insert(id, self.entries.len());
                self.entries.push((id, 1));
            }
        }
        self.total += 1;
    }

    pub fn weight(&self, id: NodeId) -> u32 {
        self.index.get(&id).map(|&pos| self.entries[pos].1).unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, u32)> + '_ {
        self.entries.iter().copied()
    }

    /// Pick an entry with probability proportional to its weight, using a
    /// single draw. `None` only when the set is empty.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<NodeId> {
        if self.total == 0 {
            return None;
        }
        let mut pick = rng.random_range(0..self.total);
        for &(id, weight) in &self.entries {
            let weight = u64::from(weight);
            if pick < weight {
                return Some(id);
            }
            pick -= weight;
        }
        None
    }
}

/// Weighted directed graph over one character's tokens.
///
/// Tokens live in an arena indexed by [`NodeId`]; `edges[i]` holds the
/// successors of node `i`.
#[derive(Debug, Clone)]
pub struct ChainModel {
    pub(super) character: String,
    pub(super) tokens: Vec<Token>,
    pub(super) edges: Vec<WeightedSet>,
    pub(super) starts: WeightedSet,
}

impl ChainModel {
    pub fn character(&self) -> &str {
        &self.character
    }

    pub fn token(&self, id: NodeId) -> &Token {
        &self.tokens[id.index()]
    }

    /// Look up a node by its full identity.
    pub fn find(&self, word: &str, sentence_end: bool) -> Option<NodeId> {
        self.tokens
            .iter()
            .position(|t| t.word == word && t.sentence_end == sentence_end)
            .map(|i| NodeId(i as u32))
    }

    pub fn successors(&self, id: NodeId) -> &WeightedSet {
        &self.edges[id.index()]
    }

    pub fn starts(&self) -> &WeightedSet {
        &self.starts
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.tokens.len() as u32).map(NodeId)
    }

    /// Nodes that can neither continue nor end a sentence.
    pub(super) fn dead_ends(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_ids()
            .filter(|&id| !self.token(id).sentence_end && self.successors(id).is_empty())
    }
}
