use crate::foundation::core::Point;
use serde::{Deserialize, Serialize};

/// Arclength spacing between pickable vertices on a resampled path.
pub const DEFAULT_VERTEX_SPACING: f64 = 20.0;
/// Every resampled path exposes at least this many vertices.
pub const MIN_VERTICES_PER_PATH: usize = 4;

/// Axis-aligned box in image pixel space, serialized as `{x, y, width, height}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

pub fn distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Total length of the open polyline `path`.
pub fn path_length(path: &[Point]) -> f64 {
    path.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Resample `path` into evenly spaced vertices along its arclength.
///
/// The vertex count is `max(MIN_VERTICES_PER_PATH, ceil(length / spacing))`; the first and last
/// output vertices are exactly the first and last input points. Paths with fewer than two
/// points, or with zero length, are returned unchanged.
pub fn create_uniform_vertices(path: &[Point], spacing: f64) -> Vec<Point> {
    if path.len() < 2 {
        return path.to_vec();
    }
    let spacing = if spacing.is_finite() && spacing > 0.0 {
        spacing
    } else {
        DEFAULT_VERTEX_SPACING
    };

    let total = path_length(path);
    if !total.is_finite() || total <= 0.0 {
        return path.to_vec();
    }

    let count = MIN_VERTICES_PER_PATH.max((total / spacing).ceil() as usize);
    let step = total / (count - 1) as f64;

    let mut out = Vec::with_capacity(count);
    out.push(path[0]);

    // `walked` is the arclength at the start of segment `seg`.
    let mut seg = 0usize;
    let mut walked = 0.0f64;
    for k in 1..count - 1 {
        let target = step * k as f64;
        while seg < path.len() - 2 && walked + distance(path[seg], path[seg + 1]) < target {
            walked += distance(path[seg], path[seg + 1]);
            seg += 1;
        }
        let a = path[seg];
        let b = path[seg + 1];
        let len = distance(a, b);
        let t = if len > 0.0 {
            ((target - walked) / len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        out.push(a.lerp(b, t));
    }

    out.push(path[path.len() - 1]);
    out
}

/// Axis-aligned bounds of every finite point in `paths`, or `None` when there are none.
pub fn bounding_box<'a>(paths: impl IntoIterator<Item = &'a [Point]>) -> Option<BoundingBox> {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in paths.into_iter().flatten() {
        if !p.x.is_finite() || !p.y.is_finite() {
            continue;
        }
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    if !min.x.is_finite() {
        return None;
    }
    Some(BoundingBox {
        x: min.x,
        y: min.y,
        width: max.x - min.x,
        height: max.y - min.y,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/path.rs"]
mod tests;
