//! # Inline Style Markup
//!
//! Transcripts mark styled words with plain-text delimiters:
//!
//! | Delimiter | Style |
//! |-----------|-------|
//! | `*word*` | bold |
//! | `/word/` | italic |
//! | `_word_` | underline |
//!
//! Each delimiter toggles its style. A word takes the style in effect at
//! its first literal character, so `*two words*` makes both words bold.
//! [`render`] emits the same delimiters back for transcript output.

use crate::token::{Style, Word};

pub const BOLD: char = '*';
pub const ITALIC: char = '/';
pub const UNDERLINE: char = '_';

/// A word parsed from a marked-up line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedWord {
    pub text: String,
    pub style: Style,
}

/// Split a line on whitespace, applying and stripping style toggles.
///
/// Toggle state starts plain for every call. Words made only of delimiters
/// produce nothing.
pub fn parse_line(line: &str) -> Vec<MarkedWord> {
    let mut state = Style::PLAIN;
    let mut words = Vec::new();

    for raw in line.split_whitespace() {
        let mut text = String::with_capacity(raw.len());
        let mut style = None;

        for ch in raw.chars() {
            match ch {
                BOLD => state.bold = !state.bold,
                ITALIC => state.italic = !state.italic,
                UNDERLINE => state.underline = !state.underline,
                _ => {
                    if style.is_none() {
                        style = Some(state);
                    }
                    text.push(ch);
                }
            }
        }

        if let Some(style) = style {
            words.push(MarkedWord { text, style });
        }
    }

    words
}

/// Render words back to marked-up text.
///
/// Delimiters open before the first word of a styled run and close after
/// its last word. Spacers are skipped.
pub fn render(words: &[Word]) -> String {
    let mut out = String::new();
    let mut open = Style::PLAIN;

    for word in words.iter().filter(|w| !w.is_spacer()) {
        let closing = toggles(open, word.style, false);
        out.push_str(&closing);
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&toggles(open, word.style, true));
        out.push_str(&word.text);
        open = word.style;
    }
    out.push_str(&toggles(open, Style::PLAIN, false));

    out
}

/// Delimiters needed to go from `from` to `to`, either the ones being
/// switched on (`opening`) or off.
fn toggles(from: Style, to: Style, opening: bool) -> String {
    let mut s = String::new();
    let flags = [
        (from.bold, to.bold, BOLD),
        (from.italic, to.italic, ITALIC),
        (from.underline, to.underline, UNDERLINE),
    ];
    if opening {
        for (was, now, ch) in flags {
            if !was && now {
                s.push(ch);
            }
        }
    } else {
        for (was, now, ch) in flags.into_iter().rev() {
            if was && !now {
                s.push(ch);
            }
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn styles(line: &str) -> Vec<(String, bool, bool, bool)> {
        parse_line(line)
            .into_iter()
            .map(|w| (w.text, w.style.bold, w.style.italic, w.style.underline))
            .collect()
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(
            styles("hello   there"),
            vec![
                ("hello".into(), false, false, false),
                ("there".into(), false, false, false)
            ]
        );
    }

    #[test]
    fn test_bold_run_spans_words() {
        assert_eq!(
            styles("*very big* deal"),
            vec![
                ("very".into(), true, false, false),
                ("big".into(), true, false, false),
                ("deal".into(), false, false, false),
            ]
        );
    }

    #[test]
    fn test_mixed_styles() {
        assert_eq!(
            styles("/_oh_/ no"),
            vec![("oh".into(), false, true, true), ("no".into(), false, false, false)]
        );
    }

    #[test]
    fn test_lone_delimiter_emits_nothing() {
        assert_eq!(
            styles("* loud *"),
            vec![("loud".into(), true, false, false)]
        );
    }

    #[test]
    fn test_render_round_trip() {
        let words: Vec<Word> = parse_line("say *very big* _thing_ now")
            .into_iter()
            .map(|w| Word::new(w.text, w.style))
            .collect();
        assert_eq!(render(&words), "say *very big* _thing_ now");
    }

    #[test]
    fn test_render_closes_at_end() {
        let words = vec![Word::plain("a"), Word::new("b", Style::bold())];
        assert_eq!(render(&words), "a *b*");
    }
}
