//! Font-size search for a bubble.
//!
//! A plain descent: try `start_size`, then one pixel smaller, until the
//! wrapped block fits both dimensions or `min_size` is reached. Both faces
//! are reloaded at every size. At most `start_size - min_size + 1` wraps.

use log::{debug, warn};

use super::{Line, block_height, wrap};
use crate::font::{FontLoader, FontStyle};
use crate::token::Word;

/// Search bounds and wrapping options.
#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    pub start_size: u32,
    /// Lowest size tried; the layout found here is accepted even if it
    /// overflows.
    pub min_size: u32,
    pub center: bool,
}

impl FitOptions {
    pub fn new(start_size: u32, min_size: u32) -> Self {
        let min_size = min_size.max(1);
        Self {
            start_size: start_size.max(min_size),
            min_size,
            center: true,
        }
    }

    pub fn center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }
}

/// Outcome of a fit: chosen size, its lines, and the faces used.
#[derive(Debug, Clone)]
pub struct Fitted<F> {
    pub font_size: u32,
    pub lines: Vec<Line>,
    pub normal: F,
    pub bold: F,
    /// Number of sizes tried.
    pub iterations: u32,
    /// The block still doesn't fit at `min_size`.
    pub overflow: bool,
}

/// Shrink the font until `words` fit a `width × height` box.
pub fn fit_to_box<L: FontLoader>(
    words: &[Word],
    width: u32,
    height: u32,
    options: &FitOptions,
    loader: &L,
) -> Fitted<L::Face> {
    let mut size = options.start_size.max(options.min_size);
    let mut iterations = 0;

    loop {
        iterations += 1;
        let normal = load_or_fallback(loader, FontStyle::Regular, size);
        let bold = load_or_fallback(loader, FontStyle::Bold, size);
        let lines = wrap(words, &normal, &bold, width, options.center);

        let block = block_height(&lines, &normal, &bold);
        let widest = lines.iter().map(|l| l.width(&normal, &bold)).max().unwrap_or(0);
        let fits = block <= height && widest <= width;
        debug!(
            "size {}: {} lines, {}x{} in {}x{}",
            size,
            lines.len(),
            widest,
            block,
            width,
            height
        );

        if fits || size <= options.min_size {
            if !fits {
                warn!(
                    "layout overflow: text needs {}x{} at minimum size {} but bubble is {}x{}",
                    widest, block, size, width, height
                );
            }
            return Fitted {
                font_size: size,
                lines,
                normal,
                bold,
                iterations,
                overflow: !fits,
            };
        }
        size -= 1;
    }
}

fn load_or_fallback<L: FontLoader>(loader: &L, style: FontStyle, size: u32) -> L::Face {
    loader.load(style, size).unwrap_or_else(|e| {
        warn!("{}; using fallback font at size {}", e, size);
        loader.fallback(style, size)
    })
}
