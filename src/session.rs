//! End-to-end strip generation: load inputs once, then render to any sink.

use std::path::PathBuf;
use std::time::Instant;

use crate::assets::{InputPaths, MaskSet, SourceAnimation};
use crate::config::settings::Settings;
use crate::encode::gif::{GifSink, GifSinkOpts};
use crate::encode::sink::{AnimationSink, SinkConfig};
use crate::foundation::core::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::foundation::error::{StripeError, StripeResult};
use crate::palette::{Palette, build_shared_palette};
use crate::render::compositor::{Compositor, OutputFrame};

/// Threading controls for [`StripeSession::render`] and [`StripeSession::render_into`].
#[derive(Clone, Debug, Default)]
pub struct RenderOpts {
    /// Compose frames on a rayon pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count for parallel mode.
    pub threads: Option<usize>,
}

/// Finished strip: one palette shared by every frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StripeAnimation {
    pub palette: Palette,
    pub frames: Vec<OutputFrame>,
}

impl StripeAnimation {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Encode to a GIF file. Fails without touching `out_path` when there are no frames.
    pub fn write_gif(&self, out_path: impl Into<PathBuf>) -> StripeResult<()> {
        crate::encode::gif::write_gif(out_path, &self.palette, &self.frames)
    }
}

/// Decoded inputs of one run.
#[derive(Debug)]
pub struct StripeSession {
    settings: Settings,
    sources: Vec<SourceAnimation>,
    masks: MaskSet,
}

impl StripeSession {
    /// Check every input exists, then decode masks and sources.
    ///
    /// Nothing is decoded when any file is missing.
    #[tracing::instrument(skip_all)]
    pub fn load(settings: Settings, inputs: &InputPaths) -> StripeResult<Self> {
        inputs.check_exist()?;
        let masks = inputs.load_masks()?;
        let sources = inputs.load_sources()?;
        Self::from_parts(settings, sources, masks)
    }

    /// Build a session from already decoded inputs, Monday first.
    pub fn from_parts(
        settings: Settings,
        sources: Vec<SourceAnimation>,
        masks: MaskSet,
    ) -> StripeResult<Self> {
        if sources.len() != 7 {
            return Err(StripeError::invalid_input(format!(
                "expected 7 weekday sources, got {}",
                sources.len()
            )));
        }
        if settings.watermark {
            tracing::warn!("watermark is enabled in settings but is not rendered");
        }
        Ok(Self {
            settings,
            sources,
            masks,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sources(&self) -> &[SourceAnimation] {
        &self.sources
    }

    pub fn masks(&self) -> &MaskSet {
        &self.masks
    }

    /// Palette every frame of this run is mapped to.
    ///
    /// With quantization enabled it is built from the first frame of each
    /// non-empty source; otherwise it is the fixed system palette.
    pub fn palette(&self) -> StripeResult<Palette> {
        if !self.settings.quantize {
            return Ok(Palette::system());
        }
        let firsts: Vec<image::RgbaImage> = self
            .sources
            .iter()
            .filter_map(|s| s.first_frame().cloned())
            .collect();
        build_shared_palette(&firsts)
    }

    /// Compose every aligned frame into memory.
    #[tracing::instrument(skip(self))]
    pub fn render(&self, opts: &RenderOpts) -> StripeResult<StripeAnimation> {
        let palette = self.palette()?;
        let started = Instant::now();
        let frames = {
            let comp = Compositor::new(&self.sources, &self.masks, &palette, &self.settings)?;
            compose_all(&comp, opts)?
        };
        tracing::info!(
            frames = frames.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "composited strip"
        );
        Ok(StripeAnimation { palette, frames })
    }

    /// Compose frames and hand them to `sink` in order. Returns the frame count.
    ///
    /// `sink.end` is called even when there are no frames, so a sink that
    /// rejects empty output reports it there.
    #[tracing::instrument(skip(self, sink))]
    pub fn render_into(
        &self,
        opts: &RenderOpts,
        sink: &mut dyn AnimationSink,
    ) -> StripeResult<usize> {
        let palette = self.palette()?;
        let comp = Compositor::new(&self.sources, &self.masks, &palette, &self.settings)?;
        let frame_count = comp.frame_count();
        let started = Instant::now();

        sink.begin(SinkConfig {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            palette: palette.clone(),
            frame_count,
        })?;
        if opts.parallel {
            for (i, frame) in compose_all(&comp, opts)?.iter().enumerate() {
                sink.push_frame(i, frame)?;
            }
        } else {
            comp.compose_each(|i, frame| sink.push_frame(i, &frame))?;
        }
        sink.end()?;

        tracing::info!(
            frames = frame_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rendered strip"
        );
        Ok(frame_count)
    }
}

/// Load inputs, render and write a GIF to `out_path`. Returns the frame count.
///
/// On any failure an existing file at `out_path` is left as it was.
pub fn render_to_gif(
    settings: Settings,
    inputs: &InputPaths,
    out_path: impl Into<PathBuf>,
    opts: &RenderOpts,
) -> StripeResult<usize> {
    let session = StripeSession::load(settings, inputs)?;
    let mut sink = GifSink::new(GifSinkOpts::new(out_path));
    session.render_into(opts, &mut sink)
}

fn compose_all(comp: &Compositor<'_>, opts: &RenderOpts) -> StripeResult<Vec<OutputFrame>> {
    if !opts.parallel {
        return comp.compose_all(false);
    }
    let pool = build_thread_pool(opts.threads)?;
    pool.install(|| comp.compose_all(true))
}

fn build_thread_pool(threads: Option<usize>) -> StripeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(StripeError::invalid_input(
            "render threads must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| StripeError::composite(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
