//! # Bubble Scripts
//!
//! A bubble script names the speakers of a page and where each line of
//! dialogue goes:
//!
//! ```text
//! // roster: every speaker, tab separated
//! Alice	Bob
//! Alice:	10	10	200	80
//! Bob	220	10	400	80
//! Bob	220	10	400	80     // same bubble again: rendered once
//! ```
//!
//! Rows are `speaker, left, top, right, bottom`; right and bottom are
//! exclusive.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::corpus::{normalize_label, strip_comment};
use crate::error::{ComicError, Result};

/// Axis-aligned rectangle in page pixels. Normalized so that
/// `left <= right` and `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Rect {
    /// Build from corner coordinates in any order.
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self {
            left: x0.min(x1),
            top: y0.min(y1),
            right: x0.max(x1),
            bottom: y0.max(y1),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Intersection with a `width × height` image.
    pub fn clamp_to(&self, width: u32, height: u32) -> Rect {
        Rect {
            left: self.left.min(width),
            top: self.top.min(height),
            right: self.right.min(width),
            bottom: self.bottom.min(height),
        }
    }
}

/// One bubble to fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub speaker: String,
    pub rect: Rect,
}

/// A parsed bubble script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BubbleScript {
    pub speakers: Vec<String>,
    pub bubbles: Vec<Bubble>,
}

impl BubbleScript {
    pub fn load(path: &Path, comment_marker: &str) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            ComicError::Input(format!("cannot read bubble script {}: {}", path.display(), e))
        })?;
        Self::parse(&text, comment_marker)
    }

    pub fn parse(text: &str, comment_marker: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter_map(|(n, line)| strip_comment(line, comment_marker).map(|l| (n + 1, l)));

        let (_, roster) = lines
            .next()
            .ok_or_else(|| ComicError::Geometry("bubble script has no speaker roster".into()))?;
        let speakers: Vec<String> = roster
            .split('\t')
            .map(normalize_label)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let mut bubbles: Vec<Bubble> = Vec::new();
        for (line_no, line) in lines {
            let bubble = parse_row(line, line_no, &speakers)?;

            if let Some(seen) = bubbles.iter().find(|b| b.rect == bubble.rect) {
                if seen.speaker == bubble.speaker {
                    continue;
                }
                return Err(ComicError::Geometry(format!(
                    "line {}: bubble {:?} is claimed by both {} and {}",
                    line_no, bubble.rect, seen.speaker, bubble.speaker
                )));
            }
            bubbles.push(bubble);
        }

        Ok(Self { speakers, bubbles })
    }
}

fn parse_row(line: &str, line_no: usize, speakers: &[String]) -> Result<Bubble> {
    let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
    if fields.len() < 5 {
        return Err(ComicError::Geometry(format!(
            "line {}: expected speaker and four coordinates, got {} fields",
            line_no,
            fields.len()
        )));
    }

    let speaker = normalize_label(fields[0]);
    if !speakers.iter().any(|s| s == speaker) {
        return Err(ComicError::Geometry(format!(
            "line {}: speaker '{}' is not in the roster {:?}",
            line_no, speaker, speakers
        )));
    }

    let mut coords = [0u32; 4];
    for (slot, field) in coords.iter_mut().zip(&fields[1..5]) {
        *slot = field.parse().map_err(|_| {
            ComicError::Geometry(format!("line {}: bad coordinate '{}'", line_no, field))
        })?;
    }

    Ok(Bubble {
        speaker: speaker.to_string(),
        rect: Rect::new(coords[0], coords[1], coords[2], coords[3]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCRIPT: &str = "\
// header comment
Alice\tBob

Alice:\t10\t10\t200\t80
Bob\t400\t80\t220\t10 // reversed corners
Bob\t220\t10\t400\t80
";

    #[test]
    fn test_parse_script() {
        let script = BubbleScript::parse(SCRIPT, "//").unwrap();
        assert_eq!(script.speakers, vec!["Alice".to_string(), "Bob".to_string()]);
        assert_eq!(
            script.bubbles,
            vec![
                Bubble {
                    speaker: "Alice".into(),
                    rect: Rect::new(10, 10, 200, 80),
                },
                Bubble {
                    speaker: "Bob".into(),
                    rect: Rect {
                        left: 220,
                        top: 10,
                        right: 400,
                        bottom: 80
                    },
                },
            ]
        );
    }

    #[test]
    fn test_shared_geometry_different_speakers_is_fatal() {
        let err = BubbleScript::parse("A\tB\nA\t0\t0\t5\t5\nB\t0\t0\t5\t5\n", "//").unwrap_err();
        assert!(matches!(err, ComicError::Geometry(_)));
    }

    #[test]
    fn test_unknown_speaker() {
        let err = BubbleScript::parse("A\nC\t0\t0\t5\t5\n", "//").unwrap_err();
        assert!(err.to_string().contains("'C'"));
    }

    #[test]
    fn test_short_and_bad_rows() {
        assert!(BubbleScript::parse("A\nA\t0\t0\t5\n", "//").is_err());
        assert!(BubbleScript::parse("A\nA\t0\tx\t5\t5\n", "//").is_err());
        assert!(BubbleScript::parse("// only comments\n", "//").is_err());
    }

    #[test]
    fn test_rect_helpers() {
        let r = Rect::new(5, 8, 1, 2);
        assert_eq!((r.width(), r.height()), (4, 6));
        assert!(Rect::new(3, 3, 3, 9).is_empty());
        assert_eq!(r.clamp_to(3, 100), Rect::new(1, 2, 3, 8));
    }
}
