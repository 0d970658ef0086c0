//! # Page Rendering
//!
//! Draws fitted bubble text onto the page and writes the result as PNG.
//!
//! Lines are drawn from the bubble's top-left corner, each one as tall as
//! its tallest word. Words are separated by one regular space, exactly as
//! layout measured them, so nothing drawn can disagree with the fit.
//!
//! | Style | Rendering |
//! |-------|-----------|
//! | bold | bold face (double strike when synthesized) |
//! | italic | glyphs sheared right towards the top |
//! | underline | bar of `size / 16` pixels (at least 1) at the line bottom |
//!
//! Every plot is clipped to the bubble, never the whole page.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

use crate::bubbles::Rect;
use crate::error::{ComicError, Result};
use crate::font::{Face, TextMetrics};
use crate::layout::Fitted;

/// Step between levels of the 6x6x6 web-safe palette.
const WEB_STEP: u8 = 51;

/// Draw `fitted` into `rect` of `canvas` in `color`.
pub fn draw_fitted(canvas: &mut RgbaImage, rect: Rect, fitted: &Fitted<Face>, color: Rgba<u8>) {
    let clip = rect.clamp_to(canvas.width(), canvas.height());
    let space = fitted.normal.space_width() as i32;
    let bar = (fitted.font_size / 16).max(1) as i32;

    let mut y = rect.top as i32;
    for line in &fitted.lines {
        let mut x = rect.left as i32;
        for (i, word) in line.words.iter().enumerate() {
            if i > 0 {
                x += space;
            }
            let face = if word.style.bold {
                &fitted.bold
            } else {
                &fitted.normal
            };
            let width = face.advance(&word.text) as i32;
            face.draw(&word.text, x, y, word.style.italic, &mut |px, py, coverage| {
                blend(canvas, clip, px, py, color, coverage)
            });
            if word.style.underline && width > 0 {
                let bar_top = y + face.line_height() as i32 - bar;
                for by in bar_top..bar_top + bar {
                    for bx in x..x + width {
                        blend(canvas, clip, bx, by, color, 1.0);
                    }
                }
            }
            x += width;
        }
        y += line.height(&fitted.normal, &fitted.bold) as i32;
    }
}

/// Mix `color` into the pixel at `(x, y)` by `coverage`, if inside `clip`.
fn blend(canvas: &mut RgbaImage, clip: Rect, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    if x < clip.left as i32 || y < clip.top as i32 || x >= clip.right as i32 || y >= clip.bottom as i32 {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    if coverage == 0.0 {
        return;
    }
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for i in 0..3 {
        let mixed = pixel.0[i] as f32 * (1.0 - coverage) + color.0[i] as f32 * coverage;
        pixel.0[i] = mixed.round() as u8;
    }
    let alpha = pixel.0[3] as f32 + (255.0 - pixel.0[3] as f32) * coverage;
    pixel.0[3] = alpha.round() as u8;
}

/// Snap every color channel to the nearest web-safe level.
pub fn quantize_web(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            let level = (*channel as f32 / WEB_STEP as f32).round() as u8;
            *channel = level * WEB_STEP;
        }
        pixel.0[3] = 255;
    }
}

/// Write `image` as PNG. `for_web` quantizes first and compresses hardest.
pub fn save_png(image: &RgbaImage, path: &Path, for_web: bool) -> Result<()> {
    let cant_create = |e: &dyn std::fmt::Display| {
        ComicError::Image(format!("failed to save {}: {}", path.display(), e))
    };

    let file = File::create(path).map_err(|e| cant_create(&e))?;
    let writer = BufWriter::new(file);
    let (compression, filter) = if for_web {
        (CompressionType::Best, FilterType::Adaptive)
    } else {
        (CompressionType::Default, FilterType::Adaptive)
    };
    let encoder = PngEncoder::new_with_quality(writer, compression, filter);

    let quantized;
    let pixels = if for_web {
        let mut copy = image.clone();
        quantize_web(&mut copy);
        quantized = copy;
        &quantized
    } else {
        image
    };
    encoder
        .write_image(
            pixels.as_raw(),
            pixels.width(),
            pixels.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| cant_create(&e))
}
