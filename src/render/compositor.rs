use rayon::prelude::*;

use crate::assets::{MaskSet, SourceAnimation};
use crate::config::settings::Settings;
use crate::foundation::core::{
    CANVAS_HEIGHT, CANVAS_WIDTH, PANEL_HEIGHT, PANEL_WIDTH, Raster, Weekday,
};
use crate::foundation::error::{StripeError, StripeResult};
use crate::foundation::math::premultiply_rgba8_in_place;
use crate::palette::{Palette, PaletteIndexer};
use crate::render::align::aligned_frame_count;
use crate::render::composite::{draw_mask_over, draw_over};
use crate::render::layout::{MAX_OFFSET, SLOTS, out_of_range_offset};
use crate::render::resample::{Interpolation, resample};

/// Delay attached to every output frame, in hundredths of a second.
pub const FRAME_DELAY: u16 = 1;

/// How a player clears a frame's area before drawing the next one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Disposal {
    #[default]
    Keep,
    RestoreBackground,
    RestorePrevious,
}

/// Disposal attached to every output frame.
pub const FRAME_DISPOSAL: Disposal = Disposal::RestoreBackground;

/// A finished strip frame: palette indices plus playback metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFrame {
    pub width: u32,
    pub height: u32,
    /// Row-major indices into the run's shared palette.
    pub indices: Vec<u8>,
    pub delay: u16,
    pub disposal: Disposal,
}

/// Builds strip frames from seven aligned sources, fixed masks and one palette.
///
/// Frames are independent of each other, so any subset may be composed in any
/// order; [`Compositor::compose_all`] always returns them in index order.
#[derive(Debug)]
pub struct Compositor<'a> {
    sources: &'a [SourceAnimation],
    masks: &'a MaskSet,
    palette: &'a Palette,
    offsets: [i32; 7],
    interpolation: Interpolation,
    frame_count: usize,
}

impl<'a> Compositor<'a> {
    /// `sources` must hold exactly one animation per weekday, Monday first.
    pub fn new(
        sources: &'a [SourceAnimation],
        masks: &'a MaskSet,
        palette: &'a Palette,
        settings: &Settings,
    ) -> StripeResult<Self> {
        if sources.len() != Weekday::ALL.len() {
            return Err(StripeError::invalid_input(format!(
                "expected 7 weekday sources, got {}",
                sources.len()
            )));
        }
        for (src, day) in sources.iter().zip(Weekday::ALL) {
            if src.day != day {
                return Err(StripeError::invalid_input(format!(
                    "source for {} found in the {day} slot",
                    src.day
                )));
            }
        }

        if let Some(k) = out_of_range_offset(&settings.offsets) {
            return Err(StripeError::invalid_input(format!(
                "{} offset {} is outside -{MAX_OFFSET}..={MAX_OFFSET}",
                Weekday::ALL[k],
                settings.offsets[k]
            )));
        }

        let frame_count = aligned_frame_count(sources);
        tracing::info!(frame_count, "aligned weekday sources");
        Ok(Self {
            sources,
            masks,
            palette,
            offsets: settings.offsets,
            interpolation: settings.interpolation,
            frame_count,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Composite frame `index` into a premultiplied canvas, before palette mapping.
    pub fn compose_canvas(&self, index: usize) -> StripeResult<Raster> {
        if index >= self.frame_count {
            return Err(StripeError::invalid_input(format!(
                "frame {index} is outside the aligned range 0..{}",
                self.frame_count
            )));
        }

        let mut background = self.palette.background();
        premultiply_rgba8_in_place(&mut background);
        let mut canvas = Raster::filled(CANVAS_WIDTH, CANVAS_HEIGHT, background);

        for slot in &SLOTS {
            let source = &self.sources[slot.day.index()];
            let frame = source.frames.get(index).ok_or_else(|| {
                StripeError::composite(format!("{} has no frame {index}", slot.day))
            })?;
            let panel = resample(frame, PANEL_WIDTH, PANEL_HEIGHT, self.interpolation)
                .map_err(|e| StripeError::composite(format!("{} frame {index}: {e}", slot.day)))?;

            let offset = self.offsets[slot.day.index()];
            draw_mask_over(
                &mut canvas,
                slot.dest_rect(offset),
                &panel,
                (0, 0),
                Some(self.masks.panel(slot.mask)),
                slot.mask_origin(offset),
            )?;
        }

        draw_over(&mut canvas, &self.masks.separator)?;
        Ok(canvas)
    }

    /// Composite and freeze frame `index`.
    pub fn compose_frame(&self, index: usize) -> StripeResult<OutputFrame> {
        let mut indexer = PaletteIndexer::new(self.palette);
        self.compose_frame_with(index, &mut indexer)
    }

    /// Every frame `0..frame_count`, in order.
    ///
    /// With `parallel`, frames are composed on the rayon pool; the result order
    /// is unchanged.
    #[tracing::instrument(skip(self), fields(frames = self.frame_count))]
    pub fn compose_all(&self, parallel: bool) -> StripeResult<Vec<OutputFrame>> {
        if parallel {
            return (0..self.frame_count)
                .into_par_iter()
                .map_init(
                    || PaletteIndexer::new(self.palette),
                    |indexer, i| self.compose_frame_with(i, indexer),
                )
                .collect();
        }

        let mut out = Vec::with_capacity(self.frame_count);
        self.compose_each(|_, frame| {
            out.push(frame);
            Ok(())
        })?;
        Ok(out)
    }

    /// Compose frames in order, handing each to `f` before starting the next.
    pub fn compose_each(
        &self,
        mut f: impl FnMut(usize, OutputFrame) -> StripeResult<()>,
    ) -> StripeResult<()> {
        let mut indexer = PaletteIndexer::new(self.palette);
        for i in 0..self.frame_count {
            let frame = self.compose_frame_with(i, &mut indexer)?;
            f(i, frame)?;
        }
        Ok(())
    }

    fn compose_frame_with(
        &self,
        index: usize,
        indexer: &mut PaletteIndexer,
    ) -> StripeResult<OutputFrame> {
        let canvas = self.compose_canvas(index)?;
        let indices = indexer.index_raster(&canvas);
        tracing::debug!(frame = index, "composited frame");
        Ok(OutputFrame {
            width: canvas.width,
            height: canvas.height,
            indices,
            delay: FRAME_DELAY,
            disposal: FRAME_DISPOSAL,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
