use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use crate::encode::sink::{AnimationSink, SinkConfig};
use crate::foundation::error::{StripeError, StripeResult};
use crate::palette::Palette;
use crate::render::compositor::{Disposal, OutputFrame};

/// Options for [`GifSink`].
#[derive(Clone, Debug)]
pub struct GifSinkOpts {
    /// Output GIF file path.
    pub out_path: PathBuf,
    /// Replace `out_path` if it already exists.
    pub overwrite: bool,
}

impl GifSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

struct Pending {
    encoder: gif::Encoder<BufWriter<File>>,
    partial_path: PathBuf,
}

/// Sink writing an animated GIF with the run palette as global color table.
///
/// Frames are written to a hidden sibling file which replaces `out_path` only
/// when [`AnimationSink::end`] succeeds; an existing output survives any
/// failure, and the partial file is removed.
pub struct GifSink {
    opts: GifSinkOpts,
    pending: Option<Pending>,
    cfg: Option<SinkConfig>,
    transparent: Option<u8>,
    last_idx: Option<usize>,
    written: usize,
}

impl GifSink {
    pub fn new(opts: GifSinkOpts) -> Self {
        Self {
            opts,
            pending: None,
            cfg: None,
            transparent: None,
            last_idx: None,
            written: 0,
        }
    }

    fn discard(&mut self) {
        if let Some(pending) = self.pending.take() {
            drop(pending.encoder);
            if let Err(e) = std::fs::remove_file(&pending.partial_path) {
                tracing::warn!(
                    path = %pending.partial_path.display(),
                    error = %e,
                    "failed to remove partial gif"
                );
            }
        }
    }
}

impl AnimationSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> StripeResult<()> {
        self.discard();
        let width = gif_dimension(cfg.width, "width")?;
        let height = gif_dimension(cfg.height, "height")?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(StripeError::encode(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        let partial_path = partial_path_for(&self.opts.out_path)?;
        let file = File::create(&partial_path).map_err(|e| {
            StripeError::encode(format!("create '{}': {e}", partial_path.display()))
        })?;

        let encoder = match open_encoder(file, width, height, &cfg) {
            Ok(enc) => enc,
            Err(e) => {
                let _ = std::fs::remove_file(&partial_path);
                return Err(e);
            }
        };

        self.transparent = cfg.palette.transparent_index();
        self.pending = Some(Pending {
            encoder,
            partial_path,
        });
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, index: usize, frame: &OutputFrame) -> StripeResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| StripeError::encode("gif sink not started"))?;
        if let Some(last) = self.last_idx
            && index <= last
        {
            return Err(StripeError::encode(
                "gif sink received out-of-order frame index",
            ));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(StripeError::encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.indices.len() != (cfg.width as usize) * (cfg.height as usize) {
            return Err(StripeError::encode(
                "frame.indices size mismatch with width*height",
            ));
        }
        let palette_len = cfg.palette.len();
        if frame.indices.iter().any(|&i| usize::from(i) >= palette_len) {
            return Err(StripeError::encode(
                "frame references a color outside the palette",
            ));
        }

        let gif_frame = gif::Frame {
            width: cfg.width as u16,
            height: cfg.height as u16,
            delay: frame.delay,
            dispose: disposal_method(frame.disposal),
            transparent: self.transparent,
            buffer: Cow::Borrowed(frame.indices.as_slice()),
            ..gif::Frame::default()
        };

        let Some(pending) = self.pending.as_mut() else {
            return Err(StripeError::encode("gif sink is already finalized"));
        };
        pending
            .encoder
            .write_frame(&gif_frame)
            .map_err(|e| StripeError::encode(format!("write gif frame {index}: {e}")))?;
        self.last_idx = Some(index);
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> StripeResult<()> {
        if self.pending.is_none() {
            return Err(StripeError::encode("gif sink not started"));
        }
        if self.written == 0 {
            self.discard();
            return Err(StripeError::encode("animation has no frames"));
        }
        let Some(pending) = self.pending.take() else {
            return Err(StripeError::encode("gif sink not started"));
        };
        let partial_path = pending.partial_path;

        let committed = finish_file(pending.encoder)
            .and_then(|()| {
                std::fs::rename(&partial_path, &self.opts.out_path).map_err(|e| {
                    StripeError::encode(format!(
                        "replace '{}': {e}",
                        self.opts.out_path.display()
                    ))
                })
            });
        if committed.is_err() {
            let _ = std::fs::remove_file(&partial_path);
        }
        committed?;

        tracing::info!(
            path = %self.opts.out_path.display(),
            frames = self.written,
            "gif written"
        );
        self.cfg = None;
        Ok(())
    }
}

impl Drop for GifSink {
    fn drop(&mut self) {
        self.discard();
    }
}

/// Encode a finished frame list in one call.
pub fn write_gif(
    out_path: impl Into<PathBuf>,
    palette: &Palette,
    frames: &[OutputFrame],
) -> StripeResult<()> {
    let first = frames
        .first()
        .ok_or_else(|| StripeError::encode("animation has no frames"))?;
    let mut sink = GifSink::new(GifSinkOpts::new(out_path));
    sink.begin(SinkConfig {
        width: first.width,
        height: first.height,
        palette: palette.clone(),
        frame_count: frames.len(),
    })?;
    for (i, frame) in frames.iter().enumerate() {
        sink.push_frame(i, frame)?;
    }
    sink.end()
}

fn open_encoder(
    file: File,
    width: u16,
    height: u16,
    cfg: &SinkConfig,
) -> StripeResult<gif::Encoder<BufWriter<File>>> {
    let mut encoder = gif::Encoder::new(
        BufWriter::new(file),
        width,
        height,
        &cfg.palette.to_rgb_table(),
    )
    .map_err(|e| StripeError::encode(format!("write gif header: {e}")))?;
    // Single-frame strips are written as still images.
    if cfg.frame_count > 1 {
        encoder
            .set_repeat(gif::Repeat::Infinite)
            .map_err(|e| StripeError::encode(format!("write gif loop extension: {e}")))?;
    }
    Ok(encoder)
}

fn finish_file(encoder: gif::Encoder<BufWriter<File>>) -> StripeResult<()> {
    let writer = encoder
        .into_inner()
        .map_err(|e| StripeError::encode(format!("write gif trailer: {e}")))?;
    let mut file = writer
        .into_inner()
        .map_err(|e| StripeError::encode(format!("flush gif: {}", e.error())))?;
    file.flush()
        .and_then(|()| file.sync_all())
        .map_err(|e| StripeError::encode(format!("sync gif: {e}")))
}

fn disposal_method(d: Disposal) -> gif::DisposalMethod {
    match d {
        Disposal::Keep => gif::DisposalMethod::Keep,
        Disposal::RestoreBackground => gif::DisposalMethod::Background,
        Disposal::RestorePrevious => gif::DisposalMethod::Previous,
    }
}

fn gif_dimension(v: u32, what: &str) -> StripeResult<u16> {
    match u16::try_from(v) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(StripeError::encode(format!(
            "gif {what} must be in 1..=65535, got {v}"
        ))),
    }
}

fn partial_path_for(out_path: &Path) -> StripeResult<PathBuf> {
    let name = out_path.file_name().ok_or_else(|| {
        StripeError::encode(format!(
            "output path '{}' has no file name",
            out_path.display()
        ))
    })?;
    Ok(out_path.with_file_name(format!(".{}.partial", name.to_string_lossy())))
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> StripeResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            StripeError::encode(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
