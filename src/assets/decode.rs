use std::io::Cursor;
use std::path::Path;

use image::AnimationDecoder as _;
use image::codecs::gif::GifDecoder;

use crate::foundation::core::Raster;
use crate::foundation::error::{StripeError, StripeResult};

/// Decode every frame of an animation held in memory.
///
/// GIF input yields fully composited frames (the decoder applies each frame's
/// disposal, so every frame covers the logical screen). Any other still format
/// the `image` crate recognizes decodes to a single frame.
pub fn decode_animation_bytes(bytes: &[u8]) -> StripeResult<Vec<image::RgbaImage>> {
    let format = image::guess_format(bytes)
        .map_err(|e| StripeError::decode(format!("unrecognized image format: {e}")))?;

    if format != image::ImageFormat::Gif {
        let still = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| StripeError::decode(format!("decode {format:?} still: {e}")))?;
        return Ok(vec![still.to_rgba8()]);
    }

    let decoder = GifDecoder::new(Cursor::new(bytes))
        .map_err(|e| StripeError::decode(format!("read gif header: {e}")))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| StripeError::decode(format!("decode gif frames: {e}")))?;
    Ok(frames.into_iter().map(|f| f.into_buffer()).collect())
}

/// Read and decode an animation file.
pub fn decode_animation(path: &Path) -> StripeResult<Vec<image::RgbaImage>> {
    let bytes = read_input(path)?;
    decode_animation_bytes(&bytes).map_err(|e| with_path(path, e))
}

/// Decode a still image (mask or separator) into a premultiplied raster.
///
/// The format is sniffed from content; mask files conventionally have no
/// extension.
pub fn decode_still_bytes(bytes: &[u8]) -> StripeResult<Raster> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| StripeError::decode(format!("decode still image: {e}")))?;
    Ok(Raster::from_straight(img.to_rgba8()))
}

/// Read and decode a still image file.
pub fn decode_still(path: &Path) -> StripeResult<Raster> {
    let bytes = read_input(path)?;
    decode_still_bytes(&bytes).map_err(|e| with_path(path, e))
}

fn read_input(path: &Path) -> StripeResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => StripeError::source_not_found(path),
        _ => StripeError::decode(format!("read '{}': {e}", path.display())),
    })
}

fn with_path(path: &Path, err: StripeError) -> StripeError {
    match err {
        StripeError::Decode(msg) => StripeError::decode(format!("'{}': {msg}", path.display())),
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
