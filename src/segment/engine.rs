use crate::assets::SourceImage;
use crate::effects::composite::{destination_in_in_place, destination_out_in_place};
use crate::foundation::error::SpritecutResult;
use crate::model::Part;
use crate::render::cpu::CpuRaster;
use crate::segment::bitmaps::{Bitmaps, Layer};
use crate::segment::grow::grow_by_color;
use crate::segment::mask::{Mask, rasterize_paths};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// How a part's drawn outline becomes its final mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentMode {
    /// `add` outlines minus `subtract` outlines.
    #[default]
    Direct,
    /// Like `Direct`, after first growing the `add` mask into similarly colored pixels.
    ColorGrowth,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentOpts {
    pub mode: SegmentMode,
    /// Half-size of the square neighborhood searched around each border pixel.
    pub grow_radius: u32,
    /// Maximum Euclidean RGB distance for a neighbor to join the mask.
    pub grow_tolerance: f64,
}

impl Default for SegmentOpts {
    fn default() -> Self {
        Self {
            mode: SegmentMode::Direct,
            grow_radius: 8,
            grow_tolerance: 45.0,
        }
    }
}

/// Reusable segmentation state (rasterizer context).
#[derive(Default)]
pub struct Segmenter {
    raster: CpuRaster,
}

impl Segmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the final mask of one part. Parts without `add` outlines yield `None`.
    pub fn part_mask(
        &mut self,
        image: &SourceImage,
        part: &Part,
        opts: &SegmentOpts,
    ) -> SpritecutResult<Option<Mask>> {
        if !part.paths.has_area() {
            return Ok(None);
        }
        let canvas = image.canvas();
        let mut mask = rasterize_paths(&mut self.raster, canvas, &part.paths.add)?;
        if opts.mode == SegmentMode::ColorGrowth {
            mask = grow_by_color(&mask, image, opts.grow_radius, opts.grow_tolerance);
        }
        if !part.paths.subtract.is_empty() {
            let cut = rasterize_paths(&mut self.raster, canvas, &part.paths.subtract)?;
            mask.subtract(&cut);
        }
        Ok(Some(mask))
    }

    /// Extract one layer per drawable part plus the static body remainder.
    ///
    /// `version` is recorded on the result so callers can tell which document state it reflects.
    #[tracing::instrument(skip(self, image, parts, opts), fields(parts = parts.len()))]
    pub fn segment(
        &mut self,
        image: &SourceImage,
        parts: &BTreeMap<String, Part>,
        opts: &SegmentOpts,
        version: u64,
    ) -> SpritecutResult<Bitmaps> {
        let canvas = image.canvas();
        let mut master = Mask::empty(canvas);
        let mut layers = BTreeMap::new();

        for (name, part) in parts {
            let Some(mask) = self.part_mask(image, part, opts)? else {
                continue;
            };
            let mut rgba = image.data().to_vec();
            destination_in_in_place(&mut rgba, mask.alpha())?;
            layers.insert(name.clone(), Arc::new(Layer::new(canvas, rgba)));
            master.union_with(&mask);
        }

        let mut body = image.data().to_vec();
        destination_out_in_place(&mut body, master.alpha())?;

        tracing::debug!(
            layers = layers.len(),
            claimed_px = master.count(),
            version,
            "segmentation complete"
        );
        Ok(Bitmaps {
            canvas,
            parts: layers,
            static_body: Some(Arc::new(Layer::new(canvas, body))),
            version,
        })
    }
}

/// One-shot convenience over [`Segmenter::segment`].
pub fn segment(
    image: &SourceImage,
    parts: &BTreeMap<String, Part>,
    opts: &SegmentOpts,
) -> SpritecutResult<Bitmaps> {
    Segmenter::new().segment(image, parts, opts, 0)
}

#[cfg(test)]
#[path = "../../tests/unit/segment/engine.rs"]
mod tests;
