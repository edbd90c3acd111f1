use crate::assets::MaskVariant;
use crate::foundation::core::{CANVAS_HEIGHT, PANEL_WIDTH, PixelRect, Weekday};

/// Left edge of Monday's panel before offsets; panels bleed past the canvas.
pub const SLOT_ORIGIN_X: i32 = -15;
/// Horizontal distance between consecutive panels. Panels overlap by
/// `PANEL_WIDTH - SLOT_PITCH` pixels, which the masks feather.
pub const SLOT_PITCH: i32 = 250;
/// Vertical bleed above and below the canvas.
pub const SLOT_BLEED_Y: i32 = 10;
/// Horizontal position in the mask that lines up with a panel's left edge.
pub const MASK_INSET_X: i32 = 10;
/// Largest accepted `|offset|`. Far beyond the strip, so any panel shifted
/// this much is already off the canvas.
pub const MAX_OFFSET: i32 = 1 << 20;

/// Fixed geometry of one weekday slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotSpec {
    pub day: Weekday,
    pub base_left: i32,
    pub base_right: i32,
    pub mask: MaskVariant,
    pub mask_inset_x: i32,
}

const fn slot_spec(k: usize) -> SlotSpec {
    let base_left = SLOT_ORIGIN_X + SLOT_PITCH * k as i32;
    SlotSpec {
        day: Weekday::ALL[k],
        base_left,
        base_right: base_left + PANEL_WIDTH as i32,
        mask: match k {
            0 => MaskVariant::Left,
            6 => MaskVariant::Right,
            _ => MaskVariant::Center,
        },
        mask_inset_x: MASK_INSET_X,
    }
}

/// Slot table, Monday first. Iterated in order by the compositor.
pub const SLOTS: [SlotSpec; 7] = [
    slot_spec(0),
    slot_spec(1),
    slot_spec(2),
    slot_spec(3),
    slot_spec(4),
    slot_spec(5),
    slot_spec(6),
];

impl SlotSpec {
    /// Destination rectangle with `offset` applied to both x-bounds.
    pub fn dest_rect(&self, offset: i32) -> PixelRect {
        PixelRect::new(
            self.base_left.saturating_add(offset),
            -SLOT_BLEED_Y,
            self.base_right.saturating_add(offset),
            CANVAS_HEIGHT as i32 + SLOT_BLEED_Y,
        )
    }

    /// Mask point aligned with the top-left of [`SlotSpec::dest_rect`].
    pub fn mask_origin(&self, offset: i32) -> (i32, i32) {
        (self.mask_inset_x.saturating_add(offset), 0)
    }
}

pub fn slot(day: Weekday) -> &'static SlotSpec {
    &SLOTS[day.index()]
}

/// Index of the first offset outside `-MAX_OFFSET..=MAX_OFFSET`, if any.
pub fn out_of_range_offset(offsets: &[i32; 7]) -> Option<usize> {
    offsets.iter().position(|o| o.unsigned_abs() > MAX_OFFSET as u32)
}

/// Where `day`'s panel lands for the given offsets.
pub fn dest_rect(day: Weekday, offsets: &[i32; 7]) -> PixelRect {
    slot(day).dest_rect(offsets[day.index()])
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
