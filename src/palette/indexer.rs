use std::collections::HashMap;

use crate::foundation::core::Raster;
use crate::palette::Palette;

/// Memoized colors kept per indexer before the cache is flushed.
const CACHE_LIMIT: usize = 1 << 16;

/// Nearest-color lookup from premultiplied pixels to palette indices.
///
/// Distance is the squared difference over all four premultiplied channels;
/// ties resolve to the lowest index. Results are memoized per indexer, up to
/// `CACHE_LIMIT` distinct colors.
#[derive(Debug, Clone)]
pub struct PaletteIndexer {
    premul: Vec<[u8; 4]>,
    cache: HashMap<[u8; 4], u8>,
}

impl PaletteIndexer {
    pub fn new(palette: &Palette) -> Self {
        let premul = palette
            .colors()
            .iter()
            .map(|c| {
                let mut px = *c;
                crate::foundation::math::premultiply_rgba8_in_place(&mut px);
                px
            })
            .collect();
        Self {
            premul,
            cache: HashMap::new(),
        }
    }

    pub fn index_of(&mut self, px: [u8; 4]) -> u8 {
        if let Some(&i) = self.cache.get(&px) {
            return i;
        }
        let mut best = 0usize;
        let mut best_dist = u32::MAX;
        for (i, c) in self.premul.iter().enumerate() {
            let dist: u32 = (0..4)
                .map(|k| {
                    let d = i32::from(px[k]) - i32::from(c[k]);
                    (d * d) as u32
                })
                .sum();
            if dist < best_dist {
                best = i;
                best_dist = dist;
                if dist == 0 {
                    break;
                }
            }
        }
        let best = best as u8;
        if self.cache.len() >= CACHE_LIMIT {
            self.cache.clear();
        }
        self.cache.insert(px, best);
        best
    }

    /// Map every pixel of `raster`, row-major.
    pub fn index_raster(&mut self, raster: &Raster) -> Vec<u8> {
        raster
            .data
            .chunks_exact(4)
            .map(|px| self.index_of([px[0], px[1], px[2], px[3]]))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/palette/indexer.rs"]
mod tests;
