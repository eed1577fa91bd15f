use xxhash_rust::xxh3::Xxh3;

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Quantize a unit-interval factor to an 8-bit coverage value.
pub(crate) fn unit_to_u8(v: f64) -> u8 {
    if !v.is_finite() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Stable 64-bit fingerprint of a pixel buffer and its dimensions.
pub(crate) fn fingerprint_pixels(width: u32, height: u32, data: &[u8]) -> u64 {
    let mut h = Xxh3::new();
    h.update(&width.to_le_bytes());
    h.update(&height.to_le_bytes());
    h.update(data);
    h.digest()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
