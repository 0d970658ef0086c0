//! # Fonts
//!
//! Everything layout needs from a font is [`TextMetrics`]; everything the
//! fit solver needs to get a font at a size is [`FontLoader`].
//!
//! Two concrete faces back the real loader:
//!
//! | Face | Source | Used when |
//! |------|--------|-----------|
//! | [`OutlineFace`] | TTF/OTF via ab_glyph | a font file was found |
//! | [`BitmapFace`] | built-in Spleen 6x12 / 12x24 | nothing loads |

mod bitmap;
mod discover;
mod outline;

pub use bitmap::BitmapFace;
pub use discover::{FontLibrary, FontSource};
pub use outline::OutlineFace;

use crate::error::Result;
use crate::token::Style;

/// Width and height measurements for one font at one size.
pub trait TextMetrics {
    /// Horizontal advance of `text` in pixels.
    fn advance(&self, text: &str) -> u32;

    /// Height of one line of text in pixels.
    fn line_height(&self) -> u32;

    /// Advance of a single inter-word space.
    fn space_width(&self) -> u32 {
        self.advance(" ")
    }
}

impl<T: TextMetrics + ?Sized> TextMetrics for &T {
    fn advance(&self, text: &str) -> u32 {
        (**self).advance(text)
    }

    fn line_height(&self) -> u32 {
        (**self).line_height()
    }

    fn space_width(&self) -> u32 {
        (**self).space_width()
    }
}

/// Which of the two faces a word is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Regular,
    Bold,
}

impl FontStyle {
    pub fn of(style: Style) -> Self {
        if style.bold {
            FontStyle::Bold
        } else {
            FontStyle::Regular
        }
    }
}

/// Produces faces at arbitrary pixel sizes.
pub trait FontLoader {
    type Face: TextMetrics;

    /// Load `style` at `size`. Fails with `ComicError::FontUnavailable`.
    fn load(&self, style: FontStyle, size: u32) -> Result<Self::Face>;

    /// Face that always works, used after `load` fails.
    fn fallback(&self, style: FontStyle, size: u32) -> Self::Face;
}

/// A loaded face of either kind.
#[derive(Debug, Clone)]
pub enum Face {
    Outline(OutlineFace),
    Bitmap(BitmapFace),
}

impl Face {
    /// Rasterize `text` with its top-left corner at `(x, y)`.
    ///
    /// `plot(px, py, coverage)` receives coverage in `0.0..=1.0`; positions
    /// may fall outside any target and must be clipped by the caller.
    pub fn draw(&self, text: &str, x: i32, y: i32, italic: bool, plot: &mut dyn FnMut(i32, i32, f32)) {
        let height = self.line_height() as i32;
        // Shear around the bottom of the line: top rows lean right.
        let mut sheared = |px: i32, py: i32, c: f32| {
            let dx = if italic {
                ((y + height - py) as f32 * ITALIC_SHEAR) as i32
            } else {
                0
            };
            plot(px + dx, py, c);
        };
        match self {
            Face::Outline(face) => face.draw(text, x, y, &mut sheared),
            Face::Bitmap(face) => face.draw(text, x, y, &mut sheared),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Face::Bitmap(_))
    }
}

const ITALIC_SHEAR: f32 = 0.2;

impl TextMetrics for Face {
    fn advance(&self, text: &str) -> u32 {
        match self {
            Face::Outline(face) => face.advance(text),
            Face::Bitmap(face) => face.advance(text),
        }
    }

    fn line_height(&self) -> u32 {
        match self {
            Face::Outline(face) => face.line_height(),
            Face::Bitmap(face) => face.line_height(),
        }
    }
}
