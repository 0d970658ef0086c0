//! # Styled Tokens
//!
//! Two shapes of the same idea:
//!
//! - [`Token`] is a node of a chain model. Built once by the corpus builder,
//!   stored in the model's arena and never modified afterwards.
//! - [`Word`] is what generation hands to layout and rendering. It is a fresh
//!   value that may carry a re-cased spelling, or be synthetic (a split
//!   fragment or a centering spacer) with no model token behind it.

use serde::Serialize;

/// Independent formatting flags of a word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Style {
    pub const PLAIN: Style = Style {
        bold: false,
        italic: false,
        underline: false,
    };

    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::PLAIN
        }
    }
}

/// Index of a token in a chain model's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A corpus-level token. Identity is the whole triple, so `"WORLD"` ending a
/// sentence and `"WORLD"` mid-sentence are different graph nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub word: String,
    pub style: Style,
    pub sentence_end: bool,
}

/// Role of a [`Word`] within a laid-out line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WordKind {
    /// Ordinary dialogue text.
    Text,
    /// Empty word inserted for centering; contributes only an inter-word space.
    Spacer,
    /// Leading piece of a split word. Always ends its line.
    ///
    /// `appended_hyphen` is true when the trailing `-` was added by the
    /// splitter rather than being part of the original text.
    Fragment { appended_hyphen: bool },
}

/// A rendering-time word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Word {
    pub text: String,
    pub style: Style,
    /// Model token this word was sampled from (canonical spelling).
    #[serde(skip)]
    pub origin: Option<NodeId>,
    pub kind: WordKind,
}

impl Word {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
            origin: None,
            kind: WordKind::Text,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::PLAIN)
    }

    pub fn spacer() -> Self {
        Self {
            text: String::new(),
            style: Style::PLAIN,
            origin: None,
            kind: WordKind::Spacer,
        }
    }

    /// Word sampled from a model token, keeping a link to the canonical node.
    pub fn from_token(id: NodeId, token: &Token) -> Self {
        Self {
            text: token.word.clone(),
            style: token.style,
            origin: Some(id),
            kind: WordKind::Text,
        }
    }

    pub fn is_spacer(&self) -> bool {
        self.kind == WordKind::Spacer
    }
}

/// Joins words into plain text (no markup), skipping spacers.
pub fn plain_text(words: &[Word]) -> String {
    words
        .iter()
        .filter(|w| !w.is_spacer())
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
