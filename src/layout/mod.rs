//! # Bubble Text Layout
//!
//! Fits a generated sentence into a bubble:
//!
//! ```text
//! words ──► wrap(width, size) ──► lines ──► fits? ──yes──► Fitted
//!              ▲                              │
//!              └──── size - 1, reload fonts ◄─┘ no
//! ```
//!
//! [`wrap`] is a pure function of its inputs; [`fit_to_box`] drives it with
//! faces from a [`FontLoader`](crate::font::FontLoader).

mod fit;
mod wrap;

pub use fit::{FitOptions, Fitted, fit_to_box};
pub use wrap::{is_printable, printable, wrap};

use crate::font::TextMetrics;
use crate::token::Word;

/// One visual row of a bubble.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    pub words: Vec<Word>,
}

impl Line {
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Measured width: word advances (bold words in the bold face) plus one
    /// regular space between adjacent words.
    pub fn width<N: TextMetrics, B: TextMetrics>(&self, normal: &N, bold: &B) -> u32 {
        words_width(&self.words, normal, bold)
    }

    /// Tallest word's line height. Zero for an empty line.
    pub fn height<N: TextMetrics, B: TextMetrics>(&self, normal: &N, bold: &B) -> u32 {
        self.words
            .iter()
            .map(|w| {
                if w.style.bold {
                    bold.line_height()
                } else {
                    normal.line_height()
                }
            })
            .max()
            .unwrap_or(0)
    }

    /// Text as rendered, spacers included as spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub(crate) fn word_width<N: TextMetrics, B: TextMetrics>(word: &Word, normal: &N, bold: &B) -> u32 {
    if word.style.bold {
        bold.advance(&word.text)
    } else {
        normal.advance(&word.text)
    }
}

pub(crate) fn words_width<N: TextMetrics, B: TextMetrics>(words: &[Word], normal: &N, bold: &B) -> u32 {
    if words.is_empty() {
        return 0;
    }
    let advances: u32 = words.iter().map(|w| word_width(w, normal, bold)).sum();
    advances + normal.space_width() * (words.len() as u32 - 1)
}

/// Total height of a block of lines.
pub fn block_height<N: TextMetrics, B: TextMetrics>(lines: &[Line], normal: &N, bold: &B) -> u32 {
    lines.iter().map(|l| l.height(normal, bold)).sum()
}

/// Fixed-advance metrics for layout tests.
#[cfg(test)]
pub(crate) mod testing {
    use crate::font::TextMetrics;

    /// Every character is `char_width` wide, a space is `space` wide.
    #[derive(Debug, Clone, Copy)]
    pub struct Mono {
        pub char_width: u32,
        pub space: u32,
        pub height: u32,
    }

    impl Mono {
        pub fn new(char_width: u32, space: u32, height: u32) -> Self {
            Self {
                char_width,
                space,
                height,
            }
        }

        pub fn at_size(size: u32) -> Self {
            Self::new(size, size, size)
        }
    }

    impl TextMetrics for Mono {
        fn advance(&self, text: &str) -> u32 {
            text.chars().count() as u32 * self.char_width
        }

        fn line_height(&self) -> u32 {
            self.height
        }

        fn space_width(&self) -> u32 {
            self.space
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Mono;
    use super::*;
    use crate::token::Style;

    #[test]
    fn test_line_width_mixes_faces() {
        let normal = Mono::new(1, 1, 10);
        let bold = Mono::new(2, 1, 12);
        let line = Line::new(vec![Word::plain("ab"), Word::new("cd", Style::bold())]);
        // 2 + space + 4
        assert_eq!(line.width(&normal, &bold), 7);
        assert_eq!(line.height(&normal, &bold), 12);
    }

    #[test]
    fn test_spacers_count_as_spaces() {
        let m = Mono::new(1, 1, 1);
        let line = Line::new(vec![Word::spacer(), Word::spacer(), Word::plain("abc")]);
        assert_eq!(line.width(&m, &m), 5);
        assert_eq!(line.text(), "  abc");
    }

    #[test]
    fn test_block_height() {
        let m = Mono::new(1, 1, 9);
        let lines = vec![Line::new(vec![Word::plain("a")]), Line::new(vec![Word::plain("b")])];
        assert_eq!(block_height(&lines, &m, &m), 18);
        assert_eq!(block_height(&[], &m, &m), 0);
    }
}
