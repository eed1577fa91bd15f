use crate::foundation::color::Rgba8;
use crate::foundation::core::Point;
use crate::geometry::{convex_hull, scale_about_centroid};
use crate::model::{AnimationParams, Part, VertexGroup, VertexRef};
use crate::render::motion::PartMotion;
use crate::segment::Bitmaps;
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Growth applied to each seam hull about its centroid so it overlaps both neighbors.
pub const SEAM_HULL_SCALE: f64 = 1.2;

/// A filled polygon drawn under the parts to hide the gap between them.
#[derive(Clone, Debug, PartialEq)]
pub struct SeamPatch {
    pub polygon: Vec<Point>,
    pub color: Rgba8,
}

/// Read-only view of everything seam planning looks at.
#[derive(Clone, Copy)]
pub struct SeamContext<'a> {
    pub parts: &'a BTreeMap<String, Part>,
    pub animation_params: &'a BTreeMap<String, AnimationParams>,
    pub bitmaps: &'a Bitmaps,
    pub vertex_spacing: f64,
}

impl SeamContext<'_> {
    fn motion_of(&self, part_id: &str, time_ms: f64) -> PartMotion {
        self.animation_params
            .get(part_id)
            .map(|p| PartMotion::at(p, time_ms))
            .unwrap_or(PartMotion::REST)
    }

    /// Live position of a vertex: its rest position moved by its part's transform at `time_ms`.
    /// Parts without an anchor or parameters contribute their rest position.
    fn live_position(&self, v: &VertexRef, time_ms: f64) -> Option<(Point, Point)> {
        let rest = v.rest_position(self.parts, self.vertex_spacing)?;
        let live = match self.parts.get(&v.part_id).and_then(|p| p.anchor) {
            Some(anchor) => self.motion_of(&v.part_id, time_ms).affine(anchor) * rest,
            None => rest,
        };
        Some((rest, live))
    }

    /// Average straight RGB of the non-transparent samples, one per vertex, taken from each
    /// vertex's own untransformed part layer.
    fn sampled_color(&self, samples: &[(String, Point)]) -> Option<Rgba8> {
        let (mut r, mut g, mut b, mut n) = (0u32, 0u32, 0u32, 0u32);
        for (part_id, rest) in samples {
            let Some(c) = self.bitmaps.part(part_id).and_then(|l| l.sample(*rest)) else {
                continue;
            };
            if c.a == 0 {
                continue;
            }
            r += u32::from(c.r);
            g += u32::from(c.g);
            b += u32::from(c.b);
            n += 1;
        }
        (n > 0).then(|| Rgba8::rgb((r / n) as u8, (g / n) as u8, (b / n) as u8))
    }
}

/// Plan every seam patch for one instant.
///
/// Pure: reads its inputs, returns an immutable list, and is consumed by a separate draw pass.
/// Groups with fewer than three resolvable vertices, a degenerate hull, or no explicit color and
/// nothing opaque to sample are skipped.
pub fn plan_seams(ctx: &SeamContext<'_>, groups: &[VertexGroup], time_ms: f64) -> Vec<SeamPatch> {
    let mut out = Vec::new();
    for (gi, group) in groups.iter().enumerate() {
        let mut live: SmallVec<[Point; 16]> = SmallVec::new();
        let mut samples: SmallVec<[(String, Point); 16]> = SmallVec::new();
        for v in &group.vertices {
            match ctx.live_position(v, time_ms) {
                Some((rest, pos)) => {
                    live.push(pos);
                    samples.push((v.part_id.clone(), rest));
                }
                None => tracing::debug!(group = gi, vertex = ?v, "vertex reference does not resolve"),
            }
        }
        if live.len() < 3 {
            continue;
        }

        let hull = convex_hull(&live);
        if hull.len() < 3 {
            continue;
        }
        let color = match group.color {
            Some(c) => c,
            None => match ctx.sampled_color(&samples) {
                Some(c) => c,
                None => continue,
            },
        };
        out.push(SeamPatch {
            polygon: scale_about_centroid(&hull, SEAM_HULL_SCALE),
            color,
        });
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/seam.rs"]
mod tests;
