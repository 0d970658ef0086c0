//! Greedy, style-aware line wrapping.
//!
//! Words are packed left to right while the measured line still fits. A
//! word too wide for an empty line is split, at its first interior hyphen
//! if it has one, else at its middle character with a hyphen appended. The
//! head ends its line and the tail goes back into the queue, so every split
//! makes progress and the loop terminates even for `max_width == 0`.

use std::collections::VecDeque;

use super::{Line, word_width, words_width};
use crate::font::TextMetrics;
use crate::token::{Word, WordKind};

const HYPHEN: char = '-';
const SOFT_HYPHEN: char = '\u{AD}';

/// Whether `c` draws (or advances) anything.
pub fn is_printable(c: char) -> bool {
    !c.is_control()
        && !matches!(
            c,
            SOFT_HYPHEN
                | '\u{200B}'..='\u{200F}'
                | '\u{2028}'..='\u{202E}'
                | '\u{2060}'..='\u{2064}'
                | '\u{FEFF}'
        )
}

/// `text` with non-printable characters removed.
pub fn printable(text: &str) -> String {
    text.chars().filter(|&c| is_printable(c)).collect()
}

fn is_hyphen(c: char) -> bool {
    c == HYPHEN || c == SOFT_HYPHEN
}

/// Partition `words` into lines no wider than `max_width` where possible.
///
/// Bold words are measured with `bold`, everything else with `normal`.
/// Input spacers are dropped; with `center` set, fresh spacers are added
/// in front of each line instead.
pub fn wrap<N: TextMetrics, B: TextMetrics>(
    words: &[Word],
    normal: &N,
    bold: &B,
    max_width: u32,
    center: bool,
) -> Vec<Line> {
    // Soft hyphens survive until splitting is decided.
    let mut pending: VecDeque<Word> = words
        .iter()
        .filter(|w| !w.is_spacer())
        .map(|w| Word {
            text: w.text.chars().filter(|&c| is_printable(c) || c == SOFT_HYPHEN).collect(),
            ..w.clone()
        })
        .filter(|w| w.text.chars().any(is_printable))
        .collect();

    let space = normal.space_width();
    let mut lines = Vec::new();
    let mut current: Vec<Word> = Vec::new();
    let mut current_width = 0u32;

    while let Some(word) = pending.pop_front() {
        let display = Word {
            text: printable(&word.text),
            ..word.clone()
        };
        let width = word_width(&display, normal, bold);
        let candidate = if current.is_empty() {
            width
        } else {
            current_width + space + width
        };

        if candidate <= max_width {
            current.push(display);
            current_width = candidate;
            if matches!(word.kind, WordKind::Fragment { .. }) {
                lines.push(Line::new(std::mem::take(&mut current)));
            }
            continue;
        }

        if !current.is_empty() {
            lines.push(Line::new(std::mem::take(&mut current)));
            pending.push_front(word);
            continue;
        }

        match split(&word) {
            Some((head, tail)) => {
                pending.push_front(tail);
                pending.push_front(head);
            }
            None => lines.push(Line::new(vec![display])),
        }
    }
    if !current.is_empty() {
        lines.push(Line::new(current));
    }

    if center {
        for line in &mut lines {
            center_line(line, normal, bold, max_width);
        }
    }

    lines
}

/// Split an over-wide word in two. `None` when its body is a single
/// character.
///
/// A trailing hyphen (appended by an earlier split or ending a hyphen-split
/// head) is not part of the body; it stays at the end of the tail.
fn split(word: &Word) -> Option<(Word, Word)> {
    let trailing = word.text.strip_suffix(HYPHEN);
    let body = trailing.unwrap_or(&word.text);
    let chars: Vec<char> = body.chars().collect();
    let n = chars.len();
    if n < 2 {
        return None;
    }

    let (mut head, tail_start, head_kind) = match (1..n - 1).find(|&i| is_hyphen(chars[i])) {
        // Keep the hyphen on the head, made visible if it was soft.
        Some(i) => (
            chars[..i].iter().collect::<String>(),
            i + 1,
            WordKind::Fragment {
                appended_hyphen: false,
            },
        ),
        None => (
            chars[..n / 2].iter().collect::<String>(),
            n / 2,
            WordKind::Fragment {
                appended_hyphen: true,
            },
        ),
    };
    head.push(HYPHEN);

    let mut tail: String = chars[tail_start..].iter().collect();
    if trailing.is_some() {
        tail.push(HYPHEN);
    }

    Some((
        Word {
            text: head,
            style: word.style,
            origin: None,
            kind: head_kind,
        },
        Word {
            text: tail,
            style: word.style,
            origin: None,
            kind: word.kind,
        },
    ))
}

/// Prefix the line with spacers covering half of the free space.
fn center_line<N: TextMetrics, B: TextMetrics>(line: &mut Line, normal: &N, bold: &B, max_width: u32) {
    let space = normal.space_width();
    let width = words_width(&line.words, normal, bold);
    if space == 0 || width >= max_width {
        return;
    }
    let free = max_width - width;
    if free < space {
        return;
    }
    let count = (free / space / 2) as usize;
    let mut words: Vec<Word> = std::iter::repeat_with(Word::spacer).take(count).collect();
    words.append(&mut line.words);
    line.words = words;
}

#[cfg(test)]
mod tests {
    use super::super::testing::Mono;
    use super::*;
    use crate::token::Style;
    use pretty_assertions::assert_eq;

    fn words(text: &str) -> Vec<Word> {
        text.split_whitespace().map(Word::plain).collect()
    }

    fn texts(lines: &[Line]) -> Vec<String> {
        lines.iter().map(Line::text).collect()
    }

    #[test]
    fn test_greedy_packing() {
        let m = Mono::new(1, 1, 1);
        let lines = wrap(&words("the quick brown fox jumps"), &m, &m, 10, false);
        assert_eq!(texts(&lines), vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_exact_fit_is_allowed() {
        let m = Mono::new(1, 1, 1);
        let lines = wrap(&words("abcd efgh"), &m, &m, 9, false);
        assert_eq!(texts(&lines), vec!["abcd efgh"]);
    }

    #[test]
    fn test_bold_measured_with_bold_face() {
        let normal = Mono::new(1, 1, 1);
        let bold = Mono::new(3, 1, 1);
        let input = vec![Word::plain("ab"), Word::new("cd", Style::bold())];
        // 2 + 1 + 6 = 9 > 8
        let lines = wrap(&input, &normal, &bold, 8, false);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].words[0].style.bold);
    }

    #[test]
    fn test_split_at_midpoint_reconstructs() {
        let m = Mono::new(1, 1, 1);
        let lines = wrap(&words("extraordinary"), &m, &m, 8, false);
        assert_eq!(texts(&lines), vec!["extrao-", "rdinary"]);

        let joined: String = lines.iter().map(Line::text).collect();
        assert_eq!(joined.replacen('-', "", 1), "extraordinary");
    }

    #[test]
    fn test_split_prefers_existing_hyphen() {
        let m = Mono::new(1, 1, 1);
        let lines = wrap(&words("well-known"), &m, &m, 6, false);
        assert_eq!(texts(&lines), vec!["well-", "known"]);
    }

    #[test]
    fn test_soft_hyphen_becomes_visible_only_at_split() {
        let m = Mono::new(1, 1, 1);
        let input = vec![Word::plain("in\u{AD}credible")];
        let lines = wrap(&input, &m, &m, 8, false);
        assert_eq!(texts(&lines), vec!["in-", "credible"]);

        let lines = wrap(&input, &m, &m, 20, false);
        assert_eq!(texts(&lines), vec!["incredible"]);
    }

    #[test]
    fn test_hyphen_split_head_is_not_split_again() {
        let m = Mono::new(1, 1, 1);
        let lines = wrap(&words("a-bc"), &m, &m, 1, false);
        assert_eq!(texts(&lines), vec!["a-", "b-", "c"]);
        // The original hyphen survives, the inserted one after "b" is dropped.
        let text = texts(&lines).concat();
        assert_eq!(text.replacen("b-", "b", 1), "a-bc");
    }

    #[test]
    fn test_trailing_hyphen_stays_at_end() {
        let m = Mono::new(1, 1, 1);
        let lines = wrap(&words("abcd-"), &m, &m, 3, false);
        assert_eq!(texts(&lines), vec!["ab-", "cd-"]);
    }

    #[test]
    fn test_split_inherits_style_and_drops_origin() {
        let m = Mono::new(1, 1, 1);
        let mut word = Word::new("underlined", Style { underline: true, ..Style::PLAIN });
        word.origin = Some(crate::token::NodeId(4));
        let lines = wrap(&[word], &m, &m, 6, false);
        assert!(lines.len() >= 2);
        for line in &lines {
            for w in &line.words {
                assert!(w.style.underline);
                assert_eq!(w.origin, None);
            }
        }
    }

    #[test]
    fn test_recursive_split_for_very_long_word() {
        let m = Mono::new(1, 1, 1);
        let lines = wrap(&words("abcdefghijklmnop"), &m, &m, 4, false);
        for line in &lines {
            assert!(line.width(&m, &m) <= 4, "{:?}", line.text());
        }
        let letters: String = texts(&lines)
            .concat()
            .chars()
            .filter(|c| *c != '-')
            .collect();
        assert_eq!(letters, "abcdefghijklmnop");
    }

    #[test]
    fn test_oversized_word_starts_fresh_line() {
        let m = Mono::new(1, 1, 1);
        let lines = wrap(&words("hi abcdefghij yo"), &m, &m, 6, false);
        assert_eq!(lines[0].text(), "hi");
        assert!(lines.iter().all(|l| l.width(&m, &m) <= 6));
    }

    #[test]
    fn test_zero_width_terminates() {
        let m = Mono::new(1, 1, 1);
        let lines = wrap(&words("ab c"), &m, &m, 0, false);
        // Irreducible single characters each get a line.
        assert_eq!(texts(&lines), vec!["a-", "b", "c"]);
    }

    #[test]
    fn test_non_printables_stripped() {
        let m = Mono::new(1, 1, 1);
        let input = vec![Word::plain("he\u{7}llo\u{200B}"), Word::plain("\u{1}")];
        let lines = wrap(&input, &m, &m, 50, false);
        assert_eq!(texts(&lines), vec!["hello"]);
    }

    #[test]
    fn test_centering_half_width_line() {
        let m = Mono::new(1, 1, 1);
        let lines = wrap(&words("abcdefghij"), &m, &m, 20, true);
        let line = &lines[0];
        let spacers = line.words.iter().filter(|w| w.is_spacer()).count();
        assert_eq!(spacers, 5);
        assert!(line.words[..5].iter().all(Word::is_spacer));
        assert!(line.width(&m, &m) <= 20);
        assert_eq!(line.words[5].text, "abcdefghij");
    }

    #[test]
    fn test_centering_needs_room_for_a_space() {
        let m = Mono::new(1, 3, 1);
        let lines = wrap(&words("abcd"), &m, &m, 6, true);
        assert_eq!(lines[0].words.len(), 1);
    }

    #[test]
    fn test_wrap_is_idempotent() {
        let normal = Mono::new(2, 1, 3);
        let bold = Mono::new(3, 1, 4);
        let mut input = words("some words are *louder* than others, notwithstanding");
        input[3].style.bold = true;
        let a = wrap(&input, &normal, &bold, 17, true);
        let b = wrap(&input, &normal, &bold, 17, true);
        assert_eq!(a, b);
    }

    #[test]
    fn test_lines_fit_across_widths() {
        let normal = Mono::new(2, 1, 3);
        let bold = Mono::new(3, 2, 3);
        let mut input = words("a dozen or so assorted words including antidisestablishmentarianism ok");
        input[2].style.bold = true;
        input[7].style.bold = true;
        for max_width in 6..60 {
            for line in wrap(&input, &normal, &bold, max_width, true) {
                let irreducible = line.words.len() == 1
                    && line.words[0].text.trim_end_matches('-').chars().count() <= 1;
                assert!(
                    line.width(&normal, &bold) <= max_width || irreducible,
                    "width {} line {:?}",
                    max_width,
                    line.text()
                );
            }
        }
    }
}
