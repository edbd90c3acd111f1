//! Weekstrip composites seven weekday animations into one animated GIF strip.
//!
//! A run is session-oriented:
//!
//! - Parse [`Settings`] and resolve [`InputPaths`]
//! - Load a [`StripeSession`] (every input is checked before anything is decoded)
//! - Render into memory or stream frames into an [`AnimationSink`] such as [`GifSink`]
#![forbid(unsafe_code)]

mod assets;
mod config;
mod foundation;

pub(crate) mod palette;
pub(crate) mod render;

/// Encoding sinks.
pub mod encode;
/// Session-oriented rendering API.
pub mod session;

pub use crate::foundation::core::{
    CANVAS_HEIGHT, CANVAS_WIDTH, PANEL_HEIGHT, PANEL_WIDTH, PixelRect, Raster, Rgba8, Weekday,
};
pub use crate::foundation::error::{StripeError, StripeResult};

pub use crate::assets::decode::{decode_animation, decode_still};
pub use crate::assets::{InputPaths, MaskPaths, MaskSet, MaskVariant, SourceAnimation};
pub use crate::config::settings::Settings;
pub use crate::encode::gif::{GifSink, GifSinkOpts, write_gif};
pub use crate::encode::sink::{AnimationSink, InMemorySink, SinkConfig};
pub use crate::palette::{Palette, PaletteIndexer, build_shared_palette, representative_colors};
pub use crate::render::align::aligned_frame_count;
pub use crate::render::composite::{draw_mask_over, draw_over};
pub use crate::render::compositor::{Compositor, Disposal, OutputFrame};
pub use crate::render::layout::{SLOTS, SlotSpec, dest_rect};
pub use crate::render::resample::{Interpolation, resample};
pub use crate::session::{RenderOpts, StripeAnimation, StripeSession, render_to_gif};
