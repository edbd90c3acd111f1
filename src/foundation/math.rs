pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Source-over of two premultiplied pixels, `src` scaled by a mask `weight`.
///
/// `weight` 255 is a plain alpha-over; 0 leaves `dst` unchanged.
pub(crate) fn src_over(dst: [u8; 4], src: [u8; 4], weight: u8) -> [u8; 4] {
    let w = u16::from(weight);
    let sa = mul_div255_u8(u16::from(src[3]), w);
    if sa == 0 {
        return dst;
    }
    let keep = 255 - u16::from(sa);
    std::array::from_fn(|c| {
        let s = if c == 3 {
            sa
        } else {
            mul_div255_u8(u16::from(src[c]), w)
        };
        s.saturating_add(mul_div255_u8(u16::from(dst[c]), keep))
    })
}

/// Straight-alpha RGBA8 to premultiplied RGBA8, in place.
pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255_u8(u16::from(px[0]), a);
        px[1] = mul_div255_u8(u16::from(px[1]), a);
        px[2] = mul_div255_u8(u16::from(px[2]), a);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
