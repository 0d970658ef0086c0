//! Built-in fallback face using the Spleen bitmap fonts.
//!
//! Picks the largest Spleen cell that fits the requested size and scales it
//! by an integer factor, so metrics stay exact and glyphs stay crisp.

use spleen_font::{FONT_6X12, FONT_12X24, PSF2Font};

use super::TextMetrics;

/// Spleen cell sizes compiled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    /// 6x12
    Small,
    /// 12x24
    Large,
}

impl Cell {
    fn width(self) -> u32 {
        match self {
            Cell::Small => 6,
            Cell::Large => 12,
        }
    }

    fn height(self) -> u32 {
        match self {
            Cell::Small => 12,
            Cell::Large => 24,
        }
    }

    fn font_data(self) -> &'static [u8] {
        match self {
            Cell::Small => FONT_6X12,
            Cell::Large => FONT_12X24,
        }
    }
}

/// Spleen glyphs at an integer scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFace {
    cell: Cell,
    scale: u32,
    /// Double-strike glyphs one pixel to the right.
    pub synthetic_bold: bool,
}

impl BitmapFace {
    /// Face whose line height is as close to `size` as integer scaling
    /// allows without exceeding it. Sizes below 12 still get 6x12.
    pub fn for_size(size: u32, synthetic_bold: bool) -> Self {
        let cell = if size >= Cell::Large.height() {
            Cell::Large
        } else {
            Cell::Small
        };
        Self {
            cell,
            scale: (size / cell.height()).max(1),
            synthetic_bold,
        }
    }

    pub fn glyph_width(&self) -> u32 {
        self.cell.width() * self.scale
    }

    pub(super) fn draw(&self, text: &str, x: i32, y: i32, plot: &mut dyn FnMut(i32, i32, f32)) {
        let scale = self.scale as i32;
        let cell_w = self.cell.width() as usize;
        let cell_h = self.cell.height() as usize;
        let mut font = PSF2Font::new(self.cell.font_data()).ok();
        let mut cursor_x = x;

        for ch in text.chars() {
            let mut bitmap = vec![false; cell_w * cell_h];
            let utf8 = ch.to_string();
            let found = match font.as_mut() {
                Some(font) => match font.glyph_for_utf8(utf8.as_bytes()) {
                    Some(glyph) => {
                        for (row_y, row) in glyph.enumerate() {
                            for (col_x, on) in row.enumerate() {
                                if row_y < cell_h && col_x < cell_w {
                                    bitmap[row_y * cell_w + col_x] = on;
                                }
                            }
                        }
                        true
                    }
                    None => false,
                },
                None => false,
            };
            if !found && !ch.is_whitespace() {
                draw_box(&mut bitmap, cell_w, cell_h);
            }

            let strikes = if self.synthetic_bold { 2 } else { 1 };
            for gy in 0..cell_h {
                for gx in 0..cell_w {
                    if !bitmap[gy * cell_w + gx] {
                        continue;
                    }
                    for strike in 0..strikes {
                        for sy in 0..scale {
                            for sx in 0..scale {
                                plot(
                                    cursor_x + gx as i32 * scale + sx + strike,
                                    y + gy as i32 * scale + sy,
                                    1.0,
                                );
                            }
                        }
                    }
                }
            }
            cursor_x += self.glyph_width() as i32;
        }
    }
}

impl TextMetrics for BitmapFace {
    fn advance(&self, text: &str) -> u32 {
        if text.is_empty() {
            return 0;
        }
        // Double strike reaches one pixel past the last cell.
        let bold_extra = if self.synthetic_bold { 1 } else { 0 };
        text.chars().count() as u32 * self.glyph_width() + bold_extra
    }

    fn line_height(&self) -> u32 {
        self.cell.height() * self.scale
    }
}

/// Outline box for characters Spleen doesn't cover.
fn draw_box(glyph: &mut [bool], width: usize, height: usize) {
    for x in 0..width {
        glyph[x] = true;
        glyph[(height - 1) * width + x] = true;
    }
    for y in 0..height {
        glyph[y * width] = true;
        glyph[y * width + width - 1] = true;
    }
}
