use crate::foundation::core::Point;

fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Convex hull by Andrew's monotone chain.
///
/// Points are sorted lexicographically by `(x, y)`; collinear and interior points are dropped.
/// The hull is returned counter-clockwise in a y-up frame (clockwise on screen), starting at
/// the lexicographically smallest point. Inputs with fewer than three distinct points come
/// back sorted and deduplicated. Non-finite points are ignored.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts: Vec<Point> = points
        .iter()
        .copied()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Unweighted mean of `points`.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Scale `points` uniformly by `factor` about their centroid.
pub fn scale_about_centroid(points: &[Point], factor: f64) -> Vec<Point> {
    let Some(c) = centroid(points) else {
        return Vec::new();
    };
    points.iter().map(|&p| c + (p - c) * factor).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/hull.rs"]
mod tests;
