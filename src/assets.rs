pub mod decode;

use crate::foundation::color::Rgba8;
use crate::foundation::core::{Canvas, Rgba8Premul};
use crate::foundation::error::{SpritecutError, SpritecutResult};
use std::sync::Arc;

/// Decoded source raster. Immutable once built; replaced wholesale on upload.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceImage {
    canvas: Canvas,
    /// Premultiplied RGBA8, row-major, tightly packed.
    rgba8_premul: Arc<Vec<u8>>,
}

impl SourceImage {
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> SpritecutResult<Self> {
        let canvas = Canvas::new(width, height);
        if canvas.is_empty() {
            return Err(SpritecutError::asset("image has zero width or height"));
        }
        if rgba8_premul.len() != canvas.rgba_len() {
            return Err(SpritecutError::asset(format!(
                "image buffer is {} bytes, expected {}",
                rgba8_premul.len(),
                canvas.rgba_len()
            )));
        }
        Ok(Self {
            canvas,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    pub fn from_straight(width: u32, height: u32, mut rgba8: Vec<u8>) -> SpritecutResult<Self> {
        decode::premultiply_rgba8_in_place(&mut rgba8);
        Self::from_premul(width, height, rgba8)
    }

    /// Build an image by evaluating `f(x, y)` for every pixel (straight alpha).
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> Rgba8) -> SpritecutResult<Self> {
        let mut data = Vec::with_capacity(Canvas::new(width, height).rgba_len());
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y).to_premul().to_array());
            }
        }
        Self::from_premul(width, height, data)
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    pub fn data(&self) -> &[u8] {
        &self.rgba8_premul
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let i = (y as usize * self.canvas.width as usize + x as usize) * 4;
        Some(Rgba8Premul::from_slice(&self.rgba8_premul[i..i + 4]))
    }

    /// Unpremultiplied color at `(x, y)`.
    pub fn color_at(&self, x: u32, y: u32) -> Option<Rgba8> {
        let [r, g, b, a] = self.pixel(x, y)?.to_straight_rgba();
        Some(Rgba8::rgba(r, g, b, a))
    }
}

#[cfg(test)]
#[path = "../tests/unit/assets/source.rs"]
mod tests;
