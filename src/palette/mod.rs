//! Shared output palette.
//!
//! All frames of one strip are encoded against a single palette: either the fixed
//! [`Palette::system`] colormap, or one built by [`build_shared_palette`] from a
//! representative still per source.

mod indexer;
mod quantize;

pub use indexer::PaletteIndexer;
pub use quantize::representative_colors;

use std::time::Instant;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{StripeError, StripeResult};

/// Hard ceiling of an indexed raster.
pub const MAX_PALETTE_LEN: usize = 256;
/// Reserved entry 0 of a built palette.
pub const TRANSPARENT: Rgba8 = [0, 0, 0, 0];
/// Reserved entry 1 of a built palette.
pub const WHITE: Rgba8 = [255, 255, 255, 255];
/// Colors shared between the images of a built palette, after the reserved entries.
pub const SHARED_BUDGET: usize = MAX_PALETTE_LEN - 2;

/// Ordered color table (straight alpha), at most 256 entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba8>,
}

impl Palette {
    /// Validate and wrap a color table.
    pub fn new(colors: Vec<Rgba8>) -> StripeResult<Self> {
        if colors.is_empty() {
            return Err(StripeError::invalid_input("palette must not be empty"));
        }
        if colors.len() > MAX_PALETTE_LEN {
            return Err(StripeError::invalid_input(format!(
                "palette has {} colors, at most {MAX_PALETTE_LEN} are allowed",
                colors.len()
            )));
        }
        Ok(Self { colors })
    }

    /// The fixed 256-color Plan 9 colormap, used when quantization is off.
    ///
    /// Entry 0 is opaque black and entry 255 opaque white. Each group of 16
    /// entries shares a brightness ramp `v`, with the red/green/blue
    /// proportions walking a 4x4x4 lattice.
    pub fn system() -> Self {
        let mut colors = [[0u8, 0, 0, 255]; MAX_PALETTE_LEN];
        let mut base = 0usize;
        for r in 0i32..4 {
            for v in 0i32..4 {
                let mut j = v - r;
                for g in 0i32..4 {
                    for b in 0i32..4 {
                        let den = r.max(g).max(b);
                        let rgb = if den == 0 {
                            [0x11 * v; 3]
                        } else {
                            let num = 17 * (4 * den + v);
                            [r * num / den, g * num / den, b * num / den]
                        };
                        colors[base + (j & 0x0f) as usize] =
                            [rgb[0] as u8, rgb[1] as u8, rgb[2] as u8, 255];
                        j += 1;
                    }
                }
                base += 16;
            }
        }
        Self {
            colors: colors.to_vec(),
        }
    }

    pub fn colors(&self) -> &[Rgba8] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color every fresh canvas starts from (entry 0).
    pub fn background(&self) -> Rgba8 {
        self.colors[0]
    }

    /// First fully transparent entry, if any.
    pub fn transparent_index(&self) -> Option<u8> {
        self.colors
            .iter()
            .position(|c| c[3] == 0)
            .map(|i| i as u8)
    }

    /// Packed `RGBRGB...` table as stored in a GIF color map.
    pub fn to_rgb_table(&self) -> Vec<u8> {
        self.colors
            .iter()
            .flat_map(|c| [c[0], c[1], c[2]])
            .collect()
    }
}

/// Build one palette shared by every output frame.
///
/// With `N = images.len()` and `k = 254 / N`, the result holds exactly
/// `2 + N * k` entries: [`TRANSPARENT`], [`WHITE`], then `k` representative colors
/// per image in input order. An image with fewer than `k` distinct opaque colors
/// repeats its last color (white when it has none) to fill its block.
#[tracing::instrument(skip(images), fields(images = images.len()))]
pub fn build_shared_palette(images: &[image::RgbaImage]) -> StripeResult<Palette> {
    if images.is_empty() {
        return Err(StripeError::invalid_input(
            "palette quantization needs at least one representative image",
        ));
    }
    let started = Instant::now();
    let per_image = SHARED_BUDGET / images.len();

    let mut colors = Vec::with_capacity(2 + images.len() * per_image);
    colors.push(TRANSPARENT);
    colors.push(WHITE);
    for (i, img) in images.iter().enumerate() {
        let mut block = representative_colors(img, per_image)?;
        let filler = block.last().copied().unwrap_or(WHITE);
        block.resize(per_image, filler);
        tracing::debug!(image = i + 1, colors = block.len(), "quantized representative image");
        colors.extend(block);
    }

    tracing::info!(
        colors = colors.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "palette quantization finished"
    );
    Palette::new(colors)
}

#[cfg(test)]
#[path = "../../tests/unit/palette/palette.rs"]
mod tests;
