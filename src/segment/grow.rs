use crate::assets::SourceImage;
use crate::segment::mask::Mask;

/// Expand `mask` into visually similar pixels around its border.
///
/// Every opaque-enough border pixel compares its source color against each pixel of the
/// `(2 * radius + 1)²` window centered on it. Non-transparent pixels closer than `tolerance`
/// (Euclidean RGB distance) join the mask. This is a single pass over the original border, not a
/// flood fill, so growth never extends more than `radius` pixels past the drawn outline.
pub fn grow_by_color(mask: &Mask, image: &SourceImage, radius: u32, tolerance: f64) -> Mask {
    let mut out = mask.clone();
    if radius == 0 || tolerance <= 0.0 {
        return out;
    }
    let canvas = mask.canvas();
    let r = i64::from(radius);

    for (bx, by) in mask.border_pixels() {
        let Some(seed) = image.color_at(bx, by) else {
            continue;
        };
        if seed.a == 0 {
            continue;
        }
        for dy in -r..=r {
            for dx in -r..=r {
                let nx = i64::from(bx) + dx;
                let ny = i64::from(by) + dy;
                if !canvas.contains(nx, ny) {
                    continue;
                }
                let (nx, ny) = (nx as u32, ny as u32);
                if out.get(nx, ny) {
                    continue;
                }
                let Some(c) = image.color_at(nx, ny) else {
                    continue;
                };
                if c.a > 0 && seed.rgb_distance(c) < tolerance {
                    out.set(nx, ny, true);
                }
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/segment/grow.rs"]
mod tests;
