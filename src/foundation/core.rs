use std::fmt;

use crate::foundation::math::premultiply_rgba8_in_place;

/// Output strip width in pixels.
pub const CANVAS_WIDTH: u32 = 1750;
/// Output strip height in pixels.
pub const CANVAS_HEIGHT: u32 = 244;
/// Every weekday frame is resampled to this width before blending.
pub const PANEL_WIDTH: u32 = 280;
/// Every weekday frame is resampled to this height before blending.
pub const PANEL_HEIGHT: u32 = 264;

/// RGBA8 color, straight alpha.
pub type Rgba8 = [u8; 4];

/// One of the seven weekday slots, in strip order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays, Monday first. Slot `k` of the strip hosts `ALL[k]`.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// 0-based slot position (Monday = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name as used in the settings document.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Half-open integer rectangle `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelRect {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Rectangle anchored at the origin.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    pub fn width(self) -> i32 {
        (self.x1 - self.x0).max(0)
    }

    pub fn height(self) -> i32 {
        (self.y1 - self.y0).max(0)
    }

    pub fn is_empty(self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Largest rectangle contained by both; empty rectangles may have any origin.
    pub fn intersect(self, other: Self) -> Self {
        Self {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }

    /// Shift by `(dx, dy)`, saturating at the `i32` range.
    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x0: self.x0.saturating_add(dx),
            y0: self.y0.saturating_add(dy),
            x1: self.x1.saturating_add(dx),
            y1: self.y1.saturating_add(dy),
        }
    }
}

/// Premultiplied RGBA8 raster, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Raster {
    /// Raster with every pixel set to `px` (premultiplied).
    pub fn filled(width: u32, height: u32, px: [u8; 4]) -> Self {
        Self {
            width,
            height,
            data: px.repeat(width as usize * height as usize),
        }
    }

    /// Take ownership of a straight-alpha image and premultiply it.
    pub fn from_straight(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut data = img.into_raw();
        premultiply_rgba8_in_place(&mut data);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn bounds(&self) -> PixelRect {
        PixelRect::from_size(self.width, self.height)
    }

    /// Premultiplied pixel at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
