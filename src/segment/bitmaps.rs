use crate::foundation::color::Rgba8;
use crate::foundation::core::{Canvas, Point, Rgba8Premul};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Key under which the static body layer is exposed by name-based lookups.
pub const STATIC_BODY_KEY: &str = "staticBody";

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(1);

/// One extracted, alpha-masked raster layer at full source-image size.
///
/// Layers are immutable after construction. `id` is unique per process and lets renderers cache
/// derived paints without hashing pixels.
#[derive(Debug)]
pub struct Layer {
    id: u64,
    canvas: Canvas,
    rgba8_premul: Vec<u8>,
}

impl Layer {
    pub(crate) fn new(canvas: Canvas, rgba8_premul: Vec<u8>) -> Self {
        debug_assert_eq!(rgba8_premul.len(), canvas.rgba_len());
        Self {
            id: NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed),
            canvas,
            rgba8_premul,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
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

    /// Straight color under a (possibly fractional) point, sampled at the containing pixel.
    pub fn sample(&self, p: Point) -> Option<Rgba8> {
        if !p.x.is_finite() || !p.y.is_finite() || p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let [r, g, b, a] = self
            .pixel(p.x.floor() as u32, p.y.floor() as u32)?
            .to_straight_rgba();
        Some(Rgba8::rgba(r, g, b, a))
    }

    pub fn opaque_pixel_count(&self) -> usize {
        self.rgba8_premul
            .chunks_exact(4)
            .filter(|px| px[3] != 0)
            .count()
    }
}

/// Output of segmentation: one layer per drawable part plus the static body.
///
/// Readers hold `Arc`s and never mutate a layer; a recompute produces a new `Bitmaps`.
#[derive(Clone, Debug, Default)]
pub struct Bitmaps {
    pub(crate) canvas: Canvas,
    pub(crate) parts: BTreeMap<String, Arc<Layer>>,
    pub(crate) static_body: Option<Arc<Layer>>,
    /// Cache generation; increases with every recompute.
    pub(crate) version: u64,
}

impl Bitmaps {
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn part(&self, name: &str) -> Option<&Arc<Layer>> {
        self.parts.get(name)
    }

    pub fn parts(&self) -> &BTreeMap<String, Arc<Layer>> {
        &self.parts
    }

    pub fn static_body(&self) -> Option<&Arc<Layer>> {
        self.static_body.as_ref()
    }

    /// Name-based lookup that also answers [`STATIC_BODY_KEY`].
    pub fn get(&self, key: &str) -> Option<&Arc<Layer>> {
        if key == STATIC_BODY_KEY {
            self.static_body.as_ref()
        } else {
            self.parts.get(key)
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_empty(&self) -> bool {
        self.static_body.is_none() && self.parts.is_empty()
    }
}
