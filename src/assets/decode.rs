use anyhow::Context;
use base64::Engine;

use crate::assets::SourceImage;
use crate::foundation::error::{SpritecutError, SpritecutResult};

/// Decode any raster format the `image` crate understands into a [`SourceImage`].
pub fn decode_image(bytes: &[u8]) -> SpritecutResult<SourceImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    SourceImage::from_straight(width, height, rgba.into_raw())
}

/// Decode a base64 image payload, either a `data:<mime>;base64,` URL or bare base64 text.
pub fn decode_data_url(payload: &str) -> SpritecutResult<SourceImage> {
    let payload = payload.trim();
    let b64 = match payload.strip_prefix("data:") {
        Some(rest) => {
            let (meta, data) = rest
                .split_once(',')
                .ok_or_else(|| SpritecutError::asset("data URL has no payload"))?;
            if !meta.ends_with(";base64") {
                return Err(SpritecutError::asset(format!(
                    "unsupported data URL encoding \"{meta}\""
                )));
            }
            data
        }
        None => payload,
    };
    let compact: String = b64.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| SpritecutError::asset(format!("invalid base64 image payload: {e}")))?;
    decode_image(&bytes)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
