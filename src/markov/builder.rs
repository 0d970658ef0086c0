use std::collections::HashMap;

use log::debug;

use super::model::{ChainModel, WeightedSet};
use crate::corpus::{attributed_content, normalize_label, strip_comment};
use crate::error::{ComicError, Result};
use crate::markup;
use crate::token::{NodeId, Token};

/// Accumulates transcript lines into a [`ChainModel`].
///
/// ```
/// use comicgen::markov::ModelBuilder;
///
/// let model = ModelBuilder::build(
///     ["A: HELLO WORLD", "B: not mine", "A: HELLO THERE // aside"],
///     "A",
///     "//",
/// )?;
/// assert_eq!(model.len(), 3);
/// # Ok::<(), comicgen::ComicError>(())
/// ```
pub struct ModelBuilder {
    character: String,
    comment_marker: String,
    tokens: Vec<Token>,
    index: HashMap<Token, NodeId>,
    edges: Vec<WeightedSet>,
    starts: WeightedSet,
    lines_used: usize,
}

impl ModelBuilder {
    pub fn new(character: &str, comment_marker: &str) -> Self {
        Self {
            character: normalize_label(character).to_string(),
            comment_marker: comment_marker.to_string(),
            tokens: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            starts: WeightedSet::default(),
            lines_used: 0,
        }
    }

    /// Build a model from every line attributed to `character`.
    pub fn build<I, S>(lines: I, character: &str, comment_marker: &str) -> Result<ChainModel>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = Self::new(character, comment_marker);
        for line in lines {
            builder.add_line(line.as_ref());
        }
        builder.finish()
    }

    /// Feed one raw corpus line. Lines for other speakers, comments and
    /// blank lines are ignored.
    pub fn add_line(&mut self, raw: &str) {
        let Some(line) = strip_comment(raw, &self.comment_marker) else {
            return;
        };
        let Some(content) = attributed_content(line, &self.character) else {
            return;
        };

        let words = markup::parse_line(content);
        let count = words.len();
        if count == 0 {
            return;
        }

        let mut previous: Option<NodeId> = None;
        for (i, word) in words.into_iter().enumerate() {
            let id = self.intern(Token {
                word: word.text,
                style: word.style,
                sentence_end: i + 1 == count,
            });
            match previous {
                None => self.starts.reinforce(id),
                Some(prev) => self.edges[prev.index()].reinforce(id),
            }
            previous = Some(id);
        }
        self.lines_used += 1;
    }

    fn intern(&mut self, token: Token) -> NodeId {
        if let Some(&id) = self.index.get(&token) {
            return id;
        }
        let id = NodeId(self.tokens.len() as u32);
        self.tokens.push(token.clone());
        self.edges.push(WeightedSet::default());
        self.index.insert(token, id);
        id
    }

    /// Validate and freeze the model.
    pub fn finish(self) -> Result<ChainModel> {
        if self.starts.is_empty() {
            return Err(ComicError::corpus(
                &self.character,
                "no corpus line is attributed to this character",
            ));
        }

        let model = ChainModel {
            character: self.character,
            tokens: self.tokens,
            edges: self.edges,
            starts: self.starts,
        };

        if let Some(id) = model.dead_ends().next() {
            return Err(ComicError::corpus(
                model.character(),
                format!("token '{}' has no successor", model.token(id).word),
            ));
        }

        debug!(
            "built chain for {}: {} lines, {} tokens",
            model.character(),
            self.lines_used,
            model.len()
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_corpus_weights() {
        let model =
            ModelBuilder::build(["A: HELLO WORLD", "A: HELLO THERE"], "A", "//").unwrap();

        let hello = model.find("HELLO", false).unwrap();
        let world = model.find("WORLD", true).unwrap();
        let there = model.find("THERE", true).unwrap();

        assert_eq!(model.len(), 3);
        assert_eq!(model.starts().weight(hello), 2);
        assert_eq!(model.starts().total(), 2);
        assert_eq!(model.successors(hello).weight(world), 1);
        assert_eq!(model.successors(hello).weight(there), 1);
        assert!(model.token(world).sentence_end);
        assert!(model.token(there).sentence_end);
        assert!(!model.token(hello).sentence_end);
    }

    #[test]
    fn test_repeated_lines_reinforce() {
        let model = ModelBuilder::build(["A: go home", "A: go home"], "A", "//").unwrap();
        let go = model.find("go", false).unwrap();
        let home = model.find("home", true).unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(model.starts().weight(go), 2);
        assert_eq!(model.successors(go).weight(home), 2);
    }

    #[test]
    fn test_comments_and_other_speakers_skipped() {
        let model = ModelBuilder::build(
            [
                "// A: commented out",
                "B: someone else",
                "   ",
                "A: kept // trailing comment",
                "narration without speaker",
            ],
            "A:",
            "//",
        )
        .unwrap();
        assert_eq!(model.len(), 1);
        let kept = model.find("kept", true).unwrap();
        assert_eq!(model.starts().weight(kept), 1);
    }

    #[test]
    fn test_markup_is_stripped_and_styled() {
        let model = ModelBuilder::build(["A: *big* deal"], "A", "//").unwrap();
        let big = model.find("big", false).unwrap();
        assert!(model.token(big).style.bold);
        assert!(!model.token(model.find("deal", true).unwrap()).style.bold);
    }

    #[test]
    fn test_same_word_end_and_middle_are_distinct() {
        let model = ModelBuilder::build(["A: no no", "A: no"], "A", "//").unwrap();
        let mid = model.find("no", false).unwrap();
        let end = model.find("no", true).unwrap();
        assert_ne!(mid, end);
        assert_eq!(model.starts().weight(mid), 1);
        assert_eq!(model.starts().weight(end), 1);
    }

    #[test]
    fn test_unattributed_character_fails() {
        let err = ModelBuilder::build(["B: hi"], "A", "//").unwrap_err();
        assert!(matches!(err, ComicError::Corpus { ref character, .. } if character == "A"));
    }

    #[test]
    fn test_every_node_positive_weight() {
        let model = ModelBuilder::build(
            ["A: one two three", "A: two one", "A: three"],
            "A",
            "//",
        )
        .unwrap();
        assert!(model.starts().total() > 0);
        for id in model.node_ids() {
            assert!(model.token(id).sentence_end || model.successors(id).total() > 0);
        }
    }
}
