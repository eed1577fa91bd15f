use crate::foundation::core::{Point, Vec2};
use crate::geometry::DEFAULT_VERTEX_SPACING;
use crate::model::{Part, PathKind, VertexRef};
use crate::segment::Bitmaps;
use std::collections::BTreeMap;

/// Maximum distance (exclusive) between a click and the vertex it picks.
pub const VERTEX_PICK_RADIUS: f64 = 10.0;
/// Per-part stagger of the exploded layout.
pub const EXPLODED_STEP_PX: f64 = 50.0;

/// Hit-testing of resampled path vertices for the seam editor.
///
/// Parts may be displayed shifted by a per-part offset (an "exploded" view that pulls parts
/// apart so shared boundaries can be told apart); clicks are matched against shifted vertices.
#[derive(Clone, Debug)]
pub struct VertexPicker {
    offsets: BTreeMap<String, Vec2>,
    radius: f64,
    spacing: f64,
}

impl Default for VertexPicker {
    fn default() -> Self {
        Self {
            offsets: BTreeMap::new(),
            radius: VERTEX_PICK_RADIUS,
            spacing: DEFAULT_VERTEX_SPACING,
        }
    }
}

impl VertexPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stagger parts diagonally by [`EXPLODED_STEP_PX`] in `order`.
    pub fn exploded<'a>(order: impl IntoIterator<Item = &'a String>) -> Self {
        let mut out = Self::default();
        for (i, name) in order.into_iter().enumerate() {
            let d = EXPLODED_STEP_PX * i as f64;
            out.offsets.insert(name.clone(), Vec2::new(d, d));
        }
        out
    }

    pub fn offset(&self, part_id: &str) -> Vec2 {
        self.offsets.get(part_id).copied().unwrap_or(Vec2::ZERO)
    }

    pub fn set_offset(&mut self, part_id: &str, offset: Vec2) {
        self.offsets.insert(part_id.to_owned(), offset);
    }

    /// Forget offsets of parts that no longer exist.
    pub fn retain_parts(&mut self, parts: &BTreeMap<String, Part>) {
        self.offsets.retain(|k, _| parts.contains_key(k));
    }

    /// Nearest vertex strictly within the pick radius. Ties keep the first candidate in part
    /// name order, add paths before subtract paths.
    pub fn pick(&self, parts: &BTreeMap<String, Part>, pos: Point) -> Option<VertexRef> {
        let mut best: Option<(f64, VertexRef)> = None;
        for (part_id, part) in parts {
            let shift = self.offset(part_id);
            for kind in [PathKind::Add, PathKind::Subtract] {
                for path_index in 0..part.paths.get(kind).len() {
                    let Some(verts) = part.uniform_vertices(kind, path_index, self.spacing) else {
                        continue;
                    };
                    for (vertex_index, v) in verts.iter().enumerate() {
                        let d = ((*v + shift) - pos).hypot();
                        if d < self.radius && best.as_ref().is_none_or(|(bd, _)| d < *bd) {
                            best = Some((
                                d,
                                VertexRef::new(part_id.as_str(), kind, path_index, vertex_index),
                            ));
                        }
                    }
                }
            }
        }
        best.map(|(_, v)| v)
    }

    /// Topmost part with an opaque layer pixel under `pos`, for dragging in the exploded view.
    /// `order` is front to back.
    pub fn part_at(&self, bitmaps: &Bitmaps, order: &[String], pos: Point) -> Option<String> {
        order.iter().find_map(|name| {
            let layer = bitmaps.part(name)?;
            let local = pos - self.offset(name);
            let c = layer.sample(local)?;
            (c.a > 0).then(|| name.clone())
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/vertex_picker.rs"]
mod tests;
