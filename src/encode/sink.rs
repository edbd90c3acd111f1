use crate::foundation::error::{StripeError, StripeResult};
use crate::palette::Palette;
use crate::render::compositor::OutputFrame;

/// Configuration provided to an [`AnimationSink`] before any frame.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Palette every frame's indices refer to.
    pub palette: Palette,
    /// Number of frames that will be pushed.
    pub frame_count: usize,
}

/// Consumer of finished strip frames.
///
/// Ordering contract: `push_frame` is called with strictly increasing indices,
/// between exactly one `begin` and one `end`.
pub trait AnimationSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> StripeResult<()>;
    /// Push one frame in order.
    fn push_frame(&mut self, index: usize, frame: &OutputFrame) -> StripeResult<()>;
    /// Called once after the last frame; commits the output.
    fn end(&mut self) -> StripeResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(usize, OutputFrame)>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    pub fn frames(&self) -> &[(usize, OutputFrame)] {
        &self.frames
    }

    /// `true` once `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl AnimationSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> StripeResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, index: usize, frame: &OutputFrame) -> StripeResult<()> {
        if self.cfg.is_none() {
            return Err(StripeError::encode("in-memory sink not started"));
        }
        self.frames.push((index, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> StripeResult<()> {
        self.finished = true;
        Ok(())
    }
}
