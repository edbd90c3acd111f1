//! Input discovery and decoding: the seven weekday sources and the four masks.

pub(crate) mod decode;

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::settings::Settings;
use crate::foundation::core::{Raster, Weekday};
use crate::foundation::error::{StripeError, StripeResult};

/// File name of the left-edge panel mask (Monday).
pub const MASK_LEFT: &str = "maskL";
/// File name of the panel mask shared by Tuesday..Saturday.
pub const MASK_CENTER: &str = "maskC";
/// File name of the right-edge panel mask (Sunday).
pub const MASK_RIGHT: &str = "maskR";
/// File name of the separator overlay drawn over the finished strip.
pub const MASK_SEPARATOR: &str = "sep";

/// Which panel mask a weekday slot blends through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaskVariant {
    Left,
    Center,
    Right,
}

/// Decoded masks, immutable for the whole run.
#[derive(Clone, Debug)]
pub struct MaskSet {
    pub left: Raster,
    pub center: Raster,
    pub right: Raster,
    pub separator: Raster,
}

impl MaskSet {
    pub fn panel(&self, variant: MaskVariant) -> &Raster {
        match variant {
            MaskVariant::Left => &self.left,
            MaskVariant::Center => &self.center,
            MaskVariant::Right => &self.right,
        }
    }
}

/// One weekday's decoded animation.
#[derive(Clone, Debug)]
pub struct SourceAnimation {
    pub day: Weekday,
    /// Straight-alpha RGBA frames in playback order.
    pub frames: Vec<image::RgbaImage>,
}

impl SourceAnimation {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Representative still used for palette quantization.
    pub fn first_frame(&self) -> Option<&image::RgbaImage> {
        self.frames.first()
    }
}

/// Paths of the masks inside a masks directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskPaths {
    pub left: PathBuf,
    pub center: PathBuf,
    pub right: PathBuf,
    pub separator: PathBuf,
}

impl MaskPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            left: dir.join(MASK_LEFT),
            center: dir.join(MASK_CENTER),
            right: dir.join(MASK_RIGHT),
            separator: dir.join(MASK_SEPARATOR),
        }
    }

    fn iter(&self) -> impl Iterator<Item = &Path> {
        [&self.left, &self.center, &self.right, &self.separator]
            .into_iter()
            .map(PathBuf::as_path)
    }
}

/// Every file a run reads, fully resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputPaths {
    /// Indexed by [`Weekday::index`].
    pub sources: [PathBuf; 7],
    pub masks: MaskPaths,
}

impl InputPaths {
    /// Resolve settings-relative paths against `root`.
    ///
    /// `masks_dir` is itself resolved against `root` when relative.
    pub fn resolve(settings: &Settings, root: &Path, masks_dir: &Path) -> Self {
        let sources = Weekday::ALL.map(|day| root.join(settings.source(day)));
        Self {
            sources,
            masks: MaskPaths::in_dir(&root.join(masks_dir)),
        }
    }

    /// Fail with [`StripeError::SourceNotFound`] on the first missing file.
    ///
    /// Sources are checked first (Mon..Sun), then masks.
    pub fn check_exist(&self) -> StripeResult<()> {
        for path in self.sources.iter().map(PathBuf::as_path).chain(self.masks.iter()) {
            if !path.is_file() {
                return Err(StripeError::source_not_found(path));
            }
        }
        tracing::info!("all source images found");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub fn load_masks(&self) -> StripeResult<MaskSet> {
        Ok(MaskSet {
            left: decode::decode_still(&self.masks.left)?,
            center: decode::decode_still(&self.masks.center)?,
            right: decode::decode_still(&self.masks.right)?,
            separator: decode::decode_still(&self.masks.separator)?,
        })
    }

    #[tracing::instrument(skip(self))]
    pub fn load_sources(&self) -> StripeResult<Vec<SourceAnimation>> {
        let started = Instant::now();
        let mut out = Vec::with_capacity(Weekday::ALL.len());
        for day in Weekday::ALL {
            let path = &self.sources[day.index()];
            let frames = decode::decode_animation(path)?;
            tracing::debug!(%day, frames = frames.len(), path = %path.display(), "decoded source");
            out.push(SourceAnimation { day, frames });
        }
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "decoded weekday sources"
        );
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../tests/unit/assets/store.rs"]
mod tests;
