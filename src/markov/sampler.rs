use rand::Rng;

use super::model::ChainModel;
use crate::error::{ComicError, Result};
use crate::token::Word;

/// Weighted random walks over a [`ChainModel`].
///
/// The sampler holds only options; all randomness comes from the generator
/// passed to each call, so a seeded `StdRng` reproduces the same dialogue.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sampler {
    /// Flip the case of each word's first letter with probability 0.5.
    pub randomize_capitals: bool,
}

impl Sampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn randomize_capitals(mut self, enabled: bool) -> Self {
        self.randomize_capitals = enabled;
        self
    }

    /// Generate `count` independent sentences.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        model: &ChainModel,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Vec<Word>>> {
        (0..count).map(|_| self.sentence(model, rng)).collect()
    }

    /// Walk from a start token to the first sentence-ending token.
    pub fn sentence<R: Rng + ?Sized>(&self, model: &ChainModel, rng: &mut R) -> Result<Vec<Word>> {
        let mut current = model.starts().choose(rng).ok_or_else(|| {
            ComicError::corpus(model.character(), "model has no start tokens")
        })?;
        let mut words = Vec::new();

        loop {
            let token = model.token(current);
            let mut word = Word::from_token(current, token);
            if self.randomize_capitals && rng.random_bool(0.5) {
                word.text = flip_first_letter(&word.text);
            }
            words.push(word);

            if token.sentence_end {
                return Ok(words);
            }

            current = model.successors(current).choose(rng).ok_or_else(|| {
                ComicError::corpus(
                    model.character(),
                    format!("walk reached dead end at '{}'", token.word),
                )
            })?;
        }
    }
}

/// Swap the case of the first alphabetic character.
fn flip_first_letter(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut flipped = false;
    for ch in text.chars() {
        if !flipped && ch.is_alphabetic() {
            flipped = true;
            if ch.is_uppercase() {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
        } else {
            out.push(ch);
        }
    }
    out
}
