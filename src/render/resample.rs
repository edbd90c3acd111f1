use image::imageops::{self, FilterType};

use crate::foundation::core::Raster;
use crate::foundation::error::{StripeError, StripeResult};

/// Resampling filter applied when scaling a weekday frame to panel size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Interpolation {
    #[default]
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos,
}

impl Interpolation {
    /// Map the integer selector used in settings files.
    ///
    /// `0..=3` select Nearest, Bilinear, Bicubic and Lanczos. Anything else
    /// selects Nearest; this is not an error.
    pub fn from_selector(selector: i64) -> Self {
        match selector {
            1 => Self::Bilinear,
            2 => Self::Bicubic,
            3 => Self::Lanczos,
            _ => Self::Nearest,
        }
    }

    fn filter(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Bilinear => FilterType::Triangle,
            Self::Bicubic => FilterType::CatmullRom,
            Self::Lanczos => FilterType::Lanczos3,
        }
    }
}

/// Scale `frame` to exactly `width`x`height` and premultiply the result.
pub fn resample(
    frame: &image::RgbaImage,
    width: u32,
    height: u32,
    mode: Interpolation,
) -> StripeResult<Raster> {
    if width == 0 || height == 0 {
        return Err(StripeError::composite(format!(
            "resample target must be non-empty, got {width}x{height}"
        )));
    }
    let (src_w, src_h) = frame.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(StripeError::composite("cannot resample an empty frame"));
    }

    let scaled = if (src_w, src_h) == (width, height) {
        frame.clone()
    } else {
        imageops::resize(frame, width, height, mode.filter())
    };
    Ok(Raster::from_straight(scaled))
}

#[cfg(test)]
#[path = "../../tests/unit/render/resample.rs"]
mod tests;
