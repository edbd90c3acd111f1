use crate::foundation::core::{PixelRect, Raster};
use crate::foundation::error::{StripeError, StripeResult};
use crate::foundation::math::src_over;

/// Blend `src` over `dst` inside `rect`, weighted by the alpha of `mask`.
///
/// Destination point `p` in `rect` reads `src` at `src_origin + (p - rect.min)` and
/// `mask` at `mask_origin + (p - rect.min)`. The drawn area is `rect` clipped to
/// the destination, to the source and to the mask bounds; nothing outside that
/// intersection is touched. `mask = None` blends at full weight.
///
/// Returns the clipped rectangle that was actually drawn.
pub fn draw_mask_over(
    dst: &mut Raster,
    rect: PixelRect,
    src: &Raster,
    src_origin: (i32, i32),
    mask: Option<&Raster>,
    mask_origin: (i32, i32),
) -> StripeResult<PixelRect> {
    check_raster("destination", dst)?;
    check_raster("source", src)?;
    if let Some(mask) = mask {
        check_raster("mask", mask)?;
    }

    let (ox, oy) = (rect.x0, rect.y0);
    let mut clip = rect.intersect(dst.bounds()).intersect(
        src.bounds()
            .translate(ox.saturating_sub(src_origin.0), oy.saturating_sub(src_origin.1)),
    );
    if let Some(mask) = mask {
        clip = clip.intersect(
            mask.bounds()
                .translate(ox.saturating_sub(mask_origin.0), oy.saturating_sub(mask_origin.1)),
        );
    }
    if clip.is_empty() {
        return Ok(clip);
    }

    // Inside `clip` every sampled coordinate is in bounds; i64 keeps the
    // intermediate sums from overflowing for far-off rects.
    let sample =
        |origin: i32, p: i32, o: i32| (i64::from(origin) + i64::from(p) - i64::from(o)) as u32;
    for y in clip.y0..clip.y1 {
        let sy = sample(src_origin.1, y, oy);
        let my = sample(mask_origin.1, y, oy);
        for x in clip.x0..clip.x1 {
            let weight = match mask {
                Some(mask) => mask.pixel(sample(mask_origin.0, x, ox), my)[3],
                None => 255,
            };
            if weight == 0 {
                continue;
            }
            let sx = sample(src_origin.0, x, ox);
            let (dx, dy) = (x as u32, y as u32);
            let out = src_over(dst.pixel(dx, dy), src.pixel(sx, sy), weight);
            dst.put_pixel(dx, dy, out);
        }
    }
    Ok(clip)
}

/// Blend `src` over the whole of `dst`, anchored at the origin.
pub fn draw_over(dst: &mut Raster, src: &Raster) -> StripeResult<PixelRect> {
    let rect = dst.bounds();
    draw_mask_over(dst, rect, src, (0, 0), None, (0, 0))
}

fn check_raster(role: &str, r: &Raster) -> StripeResult<()> {
    let expected = (r.width as usize) * (r.height as usize) * 4;
    if r.data.len() != expected {
        return Err(StripeError::composite(format!(
            "{role} raster is {} bytes, expected {expected} for {}x{}",
            r.data.len(),
            r.width,
            r.height
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
