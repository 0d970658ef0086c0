//! TTF/OTF faces rendered with ab_glyph.
//!
//! Produces anti-aliased coverage through a plot callback; the renderer
//! blends it into the page.

use ab_glyph::{Font, FontArc, GlyphId, ScaleFont};

use super::TextMetrics;

/// An outline font at a pixel size.
#[derive(Debug, Clone)]
pub struct OutlineFace {
    font: FontArc,
    pixel_height: f32,
    /// No bold file was found: double-strike the regular face instead.
    pub synthetic_bold: bool,
}

impl OutlineFace {
    pub fn new(font: FontArc, size: u32, synthetic_bold: bool) -> Self {
        Self {
            font,
            pixel_height: size as f32,
            synthetic_bold,
        }
    }

    /// Caret positions for each glyph of `text`, plus the total advance.
    fn layout(&self, text: &str) -> (Vec<(GlyphId, f32)>, f32) {
        let scaled = self.font.as_scaled(self.pixel_height);
        let mut glyphs = Vec::with_capacity(text.len());
        let mut caret_x = 0.0f32;
        let mut previous: Option<GlyphId> = None;

        for ch in text.chars() {
            let glyph_id = self.font.glyph_id(ch);
            if let Some(prev) = previous {
                caret_x += scaled.kern(prev, glyph_id);
            }
            glyphs.push((glyph_id, caret_x));
            caret_x += scaled.h_advance(glyph_id);
            previous = Some(glyph_id);
        }

        (glyphs, caret_x)
    }

    pub(super) fn draw(&self, text: &str, x: i32, y: i32, plot: &mut dyn FnMut(i32, i32, f32)) {
        let scaled = self.font.as_scaled(self.pixel_height);
        let baseline_y = scaled.ascent();
        let (glyphs, _) = self.layout(text);
        let strikes = if self.synthetic_bold { 2 } else { 1 };

        for (glyph_id, glyph_x) in glyphs {
            let glyph = glyph_id.with_scale_and_position(
                self.pixel_height,
                ab_glyph::point(glyph_x, baseline_y),
            );

            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|px, py, coverage| {
                    let gx = x + px as i32 + bounds.min.x as i32;
                    let gy = y + py as i32 + bounds.min.y as i32;
                    for strike in 0..strikes {
                        plot(gx + strike, gy, coverage);
                    }
                });
            }
        }
    }
}

impl TextMetrics for OutlineFace {
    fn advance(&self, text: &str) -> u32 {
        if text.is_empty() {
            return 0;
        }
        let (_, width) = self.layout(text);
        let bold_extra = if self.synthetic_bold { 1 } else { 0 };
        width.ceil().max(0.0) as u32 + bold_extra
    }

    fn line_height(&self) -> u32 {
        let scaled = self.font.as_scaled(self.pixel_height);
        (scaled.ascent() - scaled.descent()).ceil().max(1.0) as u32
    }
}
