use std::collections::HashMap;

use quantette::{ImagePipeline, PaletteSize};

use crate::foundation::core::Rgba8;
use crate::foundation::error::{StripeError, StripeResult};

/// Reduce `img` to at most `max_colors` (capped at 255) representative opaque colors.
///
/// Fully transparent pixels are dropped. An image that already fits keeps its
/// exact colors; otherwise the pixels go through quantette's Wu box-splitting
/// quantizer in sRGB. Colors come back by descending population
/// (pixels nearest to each), ties by color value. Fewer than `max_colors` are
/// returned when the image has fewer distinct colors.
pub fn representative_colors(
    img: &image::RgbaImage,
    max_colors: usize,
) -> StripeResult<Vec<Rgba8>> {
    let max_colors = max_colors.min(usize::from(u8::MAX));
    if max_colors == 0 {
        return Ok(Vec::new());
    }

    let mut histogram: HashMap<[u8; 3], u64> = HashMap::new();
    let mut opaque = Vec::with_capacity(img.as_raw().len() / 4 * 3);
    for px in img.pixels().filter(|px| px[3] != 0) {
        let rgb = [px[0], px[1], px[2]];
        *histogram.entry(rgb).or_default() += 1;
        opaque.extend_from_slice(&rgb);
    }
    if histogram.is_empty() {
        return Ok(Vec::new());
    }

    let colors: Vec<[u8; 3]> = if histogram.len() <= max_colors {
        histogram.keys().copied().collect()
    } else {
        let width = u32::try_from(opaque.len() / 3)
            .map_err(|_| StripeError::invalid_input("image too large to quantize"))?;
        let strip = image::RgbImage::from_raw(width, 1, opaque)
            .ok_or_else(|| StripeError::invalid_input("opaque pixel buffer size mismatch"))?;
        let mut colors: Vec<[u8; 3]> = ImagePipeline::try_from(&strip)
            .map_err(|e| StripeError::invalid_input(format!("quantize image: {e:?}")))?
            .palette_size(PaletteSize::from(max_colors as u8))
            .palette()
            .into_iter()
            .map(|c| [c.red, c.green, c.blue])
            .collect();
        colors.sort_unstable();
        colors.dedup();
        colors
    };

    let mut population = vec![0u64; colors.len()];
    for (rgb, count) in &histogram {
        population[nearest(&colors, *rgb)] += count;
    }

    let mut ranked: Vec<([u8; 3], u64)> = colors.into_iter().zip(population).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    Ok(ranked
        .into_iter()
        .map(|([r, g, b], _)| [r, g, b, 255])
        .collect())
}

fn nearest(colors: &[[u8; 3]], rgb: [u8; 3]) -> usize {
    let dist = |c: &[u8; 3]| -> u32 {
        (0..3)
            .map(|k| {
                let d = i32::from(c[k]) - i32::from(rgb[k]);
                (d * d) as u32
            })
            .sum()
    };
    let mut best = 0;
    let mut best_dist = u32::MAX;
    for (i, c) in colors.iter().enumerate() {
        let d = dist(c);
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

#[cfg(test)]
#[path = "../../tests/unit/palette/quantize.rs"]
mod tests;
