use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{SpritecutError, SpritecutResult};
use crate::foundation::math::{mul_div255_u8, mul_div255_u16, unit_to_u8};

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-atop of a solid color over one pixel, with a global opacity.
///
/// Alpha of `dst` is preserved; color moves toward `color` in proportion to its effective alpha.
pub fn source_atop(dst: PremulRgba8, color: Rgba8Premul, opacity: f32) -> PremulRgba8 {
    let op = unit_to_u8(f64::from(opacity));
    if op == 0 || dst[3] == 0 || color.a == 0 {
        return dst;
    }
    let src = [
        mul_div255_u16(u16::from(color.r), u16::from(op)),
        mul_div255_u16(u16::from(color.g), u16::from(op)),
        mul_div255_u16(u16::from(color.b), u16::from(op)),
        mul_div255_u16(u16::from(color.a), u16::from(op)),
    ];
    let da = u16::from(dst[3]);
    let inv = 255u16 - src[3];

    let mut out = [0u8; 4];
    for i in 0..3 {
        let sc = mul_div255_u16(src[i], da);
        let dc = mul_div255_u16(u16::from(dst[i]), inv);
        out[i] = (sc + dc).min(da) as u8;
    }
    out[3] = dst[3];
    out
}

pub fn source_atop_in_place(
    dst: &mut [u8],
    color: Rgba8Premul,
    opacity: f32,
) -> SpritecutResult<()> {
    if !dst.len().is_multiple_of(4) {
        return Err(SpritecutError::render(
            "source_atop_in_place expects an rgba8 buffer",
        ));
    }
    for d in dst.chunks_exact_mut(4) {
        let out = source_atop([d[0], d[1], d[2], d[3]], color, opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Destination-in: scale every pixel by the matching mask alpha.
pub fn destination_in_in_place(dst: &mut [u8], mask_alpha: &[u8]) -> SpritecutResult<()> {
    if dst.len() != mask_alpha.len().saturating_mul(4) {
        return Err(SpritecutError::render(
            "destination_in_in_place expects one mask byte per rgba8 pixel",
        ));
    }
    for (d, &m) in dst.chunks_exact_mut(4).zip(mask_alpha) {
        match m {
            255 => {}
            0 => d.fill(0),
            _ => {
                for c in d.iter_mut() {
                    *c = mul_div255_u8(u16::from(*c), u16::from(m));
                }
            }
        }
    }
    Ok(())
}

/// Destination-out: scale every pixel by the inverse of the matching mask alpha.
pub fn destination_out_in_place(dst: &mut [u8], mask_alpha: &[u8]) -> SpritecutResult<()> {
    if dst.len() != mask_alpha.len().saturating_mul(4) {
        return Err(SpritecutError::render(
            "destination_out_in_place expects one mask byte per rgba8 pixel",
        ));
    }
    for (d, &m) in dst.chunks_exact_mut(4).zip(mask_alpha) {
        match m {
            0 => {}
            255 => d.fill(0),
            _ => {
                let inv = 255u16 - u16::from(m);
                for c in d.iter_mut() {
                    *c = mul_div255_u8(u16::from(*c), inv);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
