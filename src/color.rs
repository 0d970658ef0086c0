//! # Text Color Selection
//!
//! Picks a text color that reads against a bubble's background, from the
//! mean color of the bubble region:
//!
//! ```text
//! channel = max(0, band_max - mean × 1.5)
//! ```
//!
//! The 1.5 factor pushes harder than a plain inversion so text stays
//! legible on busy mid-tone backgrounds. `band_max` depends on the pixel
//! format family:
//!
//! | Family | band_max | Channel kind |
//! |--------|----------|--------------|
//! | Bilevel | 1 | integer |
//! | EightBit (luma, palette, RGB, CMYK, ...) | 255 | integer |
//! | WideInteger | `i32::MAX` | integer |
//! | Float | +∞ | float |
//! | Other (e.g. 16-bit) | max sample in the whole image | integer |

use image::{DynamicImage, ImageBuffer, Pixel, Rgba};
use log::warn;

use crate::bubbles::Rect;
use crate::error::{ComicError, Result};

/// Pixel format family of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFamily {
    Bilevel,
    EightBit,
    WideInteger,
    Float,
    Other,
}

impl PixelFamily {
    /// Largest value a channel can hold. `observed_max` is only used by
    /// [`PixelFamily::Other`].
    pub fn band_max(self, observed_max: f64) -> f64 {
        match self {
            PixelFamily::Bilevel => 1.0,
            PixelFamily::EightBit => 255.0,
            PixelFamily::WideInteger => i32::MAX as f64,
            PixelFamily::Float => f64::INFINITY,
            PixelFamily::Other => observed_max,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, PixelFamily::Float)
    }
}

/// Samples of a rectangular region, interleaved per pixel.
#[derive(Debug, Clone)]
pub struct PixelRegion {
    pub family: PixelFamily,
    /// Channels per pixel, alpha included.
    pub channels: usize,
    /// The last channel is alpha.
    pub has_alpha: bool,
    pub samples: Vec<f64>,
    /// Largest sample anywhere in the source image.
    pub source_max: f64,
}

impl PixelRegion {
    pub fn new(family: PixelFamily, channels: usize, has_alpha: bool, samples: Vec<f64>) -> Self {
        let source_max = samples.iter().copied().fold(0.0, f64::max);
        Self {
            family,
            channels,
            has_alpha,
            samples,
            source_max,
        }
    }

    /// Copy the samples of `rect` (clipped to the image) out of `image`.
    pub fn from_image(image: &DynamicImage, rect: Rect) -> Self {
        let rect = rect.clamp_to(image.width(), image.height());
        match image {
            DynamicImage::ImageLuma8(buf) => collect(buf, rect, PixelFamily::EightBit, false),
            DynamicImage::ImageLumaA8(buf) => collect(buf, rect, PixelFamily::EightBit, true),
            DynamicImage::ImageRgb8(buf) => collect(buf, rect, PixelFamily::EightBit, false),
            DynamicImage::ImageRgba8(buf) => collect(buf, rect, PixelFamily::EightBit, true),
            DynamicImage::ImageLuma16(buf) => collect(buf, rect, PixelFamily::Other, false),
            DynamicImage::ImageLumaA16(buf) => collect(buf, rect, PixelFamily::Other, true),
            DynamicImage::ImageRgb16(buf) => collect(buf, rect, PixelFamily::Other, false),
            DynamicImage::ImageRgba16(buf) => collect(buf, rect, PixelFamily::Other, true),
            DynamicImage::ImageRgb32F(buf) => collect(buf, rect, PixelFamily::Float, false),
            DynamicImage::ImageRgba32F(buf) => collect(buf, rect, PixelFamily::Float, true),
            other => collect(&other.to_rgba8(), rect, PixelFamily::EightBit, true),
        }
    }

    pub fn color_channels(&self) -> usize {
        self.channels.saturating_sub(usize::from(self.has_alpha))
    }

    pub fn pixel_count(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }

    /// Arithmetic mean of every color channel (alpha excluded).
    pub fn mean_color(&self) -> Result<Vec<f64>> {
        let pixels = self.pixel_count();
        let color_channels = self.color_channels();
        if pixels == 0 || color_channels == 0 {
            return Err(ComicError::RegionMeasurement(format!(
                "region has {} pixels with {} color channels",
                pixels, color_channels
            )));
        }

        let mut sums = vec![0.0f64; color_channels];
        for pixel in self.samples.chunks_exact(self.channels) {
            for (sum, sample) in sums.iter_mut().zip(pixel) {
                *sum += sample;
            }
        }
        let means: Vec<f64> = sums.into_iter().map(|s| s / pixels as f64).collect();
        if means.iter().any(|m| !m.is_finite()) {
            return Err(ComicError::RegionMeasurement("non-finite mean color".into()));
        }
        Ok(means)
    }
}

fn collect<P>(
    buf: &ImageBuffer<P, Vec<P::Subpixel>>,
    rect: Rect,
    family: PixelFamily,
    has_alpha: bool,
) -> PixelRegion
where
    P: Pixel,
    P::Subpixel: Into<f64>,
{
    let channels = P::CHANNEL_COUNT as usize;
    let mut samples =
        Vec::with_capacity(rect.width() as usize * rect.height() as usize * channels);
    for y in rect.top..rect.bottom {
        for x in rect.left..rect.right {
            samples.extend(buf.get_pixel(x, y).channels().iter().map(|&s| s.into()));
        }
    }
    let source_max = buf.as_raw().iter().map(|&s| s.into()).fold(0.0, f64::max);

    PixelRegion {
        family,
        channels,
        has_alpha,
        samples,
        source_max,
    }
}

/// Channel values in the region's native numeric kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorValues {
    Integer(Vec<i64>),
    Float(Vec<f64>),
}

/// A text color in the source image's format.
#[derive(Debug, Clone, PartialEq)]
pub struct TextColor {
    pub family: PixelFamily,
    /// Color channels, then alpha when `has_alpha`.
    pub values: ColorValues,
    pub has_alpha: bool,
    pub band_max: f64,
}

impl TextColor {
    /// Opaque black with the region's shape.
    pub fn neutral(region: &PixelRegion) -> Self {
        let band_max = region.family.band_max(region.source_max);
        let means = vec![0.0; region.color_channels().max(1)];
        Self::from_channels(region.family, &means, region.has_alpha, band_max)
    }

    fn from_channels(family: PixelFamily, channels: &[f64], has_alpha: bool, band_max: f64) -> Self {
        let values = if family.is_float() {
            let mut v = channels.to_vec();
            if has_alpha {
                v.push(1.0);
            }
            ColorValues::Float(v)
        } else {
            let mut v: Vec<i64> = channels.iter().map(|&c| c as i64).collect();
            if has_alpha {
                v.push(band_max as i64);
            }
            ColorValues::Integer(v)
        };
        Self {
            family,
            values,
            has_alpha,
            band_max,
        }
    }

    /// Color channels scaled to 8 bits (alpha excluded).
    fn color_bytes(&self) -> Vec<u8> {
        let scaled: Vec<u8> = match &self.values {
            ColorValues::Float(v) => v
                .iter()
                .map(|&c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
                .collect(),
            ColorValues::Integer(v) => v
                .iter()
                .map(|&c| {
                    if self.band_max <= 0.0 {
                        0
                    } else {
                        (c as f64 / self.band_max * 255.0).round().clamp(0.0, 255.0) as u8
                    }
                })
                .collect(),
        };
        let color_len = scaled.len() - usize::from(self.has_alpha);
        scaled[..color_len].to_vec()
    }

    /// Opaque 8-bit RGBA for drawing.
    pub fn to_rgba8(&self) -> Rgba<u8> {
        let c = self.color_bytes();
        match c.as_slice() {
            [] => Rgba([0, 0, 0, 255]),
            [g] => Rgba([*g, *g, *g, 255]),
            [r, g] => Rgba([*r, *g, 0, 255]),
            [r, g, b] => Rgba([*r, *g, *b, 255]),
            [cy, m, y, k, ..] => {
                let ink = |v: u8| (255.0 - v as f32) / 255.0;
                let key = ink(*k);
                let channel = |v: u8| (255.0 * ink(v) * key).round() as u8;
                Rgba([channel(*cy), channel(*m), channel(*y), 255])
            }
        }
    }
}

/// Choose a legible text color for a region. Falls back to neutral black
/// when the mean color can't be computed.
pub fn pick_text_color(region: &PixelRegion) -> TextColor {
    let means = match region.mean_color() {
        Ok(means) => means,
        Err(e) => {
            warn!("{}; using neutral text color", e);
            return TextColor::neutral(region);
        }
    };
    let band_max = region.family.band_max(region.source_max);
    let channels: Vec<f64> = means
        .iter()
        .map(|m| (band_max - m * 1.5).max(0.0))
        .collect();
    TextColor::from_channels(region.family, &channels, region.has_alpha, band_max)
}
