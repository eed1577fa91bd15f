use crate::foundation::core::Point;
use crate::geometry::{BoundingBox, bounding_box, create_uniform_vertices};
use serde::{Deserialize, Serialize};

/// A freehand outline in image pixel space, implicitly closed when filled.
pub type LassoPath = Vec<Point>;

/// Which list of a part's paths a path lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    Add,
    Subtract,
}

/// Union-filled `add` outlines minus `subtract` outlines.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PartPaths {
    #[serde(default)]
    pub add: Vec<LassoPath>,
    #[serde(default)]
    pub subtract: Vec<LassoPath>,
}

impl PartPaths {
    pub fn get(&self, kind: PathKind) -> &[LassoPath] {
        match kind {
            PathKind::Add => &self.add,
            PathKind::Subtract => &self.subtract,
        }
    }

    pub fn path(&self, kind: PathKind, index: usize) -> Option<&[Point]> {
        self.get(kind).get(index).map(Vec::as_slice)
    }

    /// A part without `add` outlines has no pixels and is skipped by segmentation.
    pub fn has_area(&self) -> bool {
        !self.add.is_empty()
    }
}

/// A named, independently animatable region of the source image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default)]
    pub paths: PartPaths,
    /// Pivot for rotation, scale and translation. Parts without one never animate.
    #[serde(default)]
    pub anchor: Option<Point>,
    /// Derived from `paths.add`; `None` when those carry no finite coordinate.
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seam_pixels: Vec<Point>,
}

impl Part {
    /// Replace the part's outline with a freshly drawn lasso.
    ///
    /// The anchor survives if one was already set; otherwise it becomes the bounding box center,
    /// or the origin when the outline has no finite coordinates.
    pub fn set_outline(&mut self, path: LassoPath) {
        self.paths = PartPaths {
            add: vec![path],
            subtract: Vec::new(),
        };
        self.bounding_box = bounding_box(self.paths.add.iter().map(Vec::as_slice));
        if self.anchor.is_none() {
            self.anchor = Some(
                self.bounding_box
                    .map(|bb| bb.center())
                    .unwrap_or(Point::ORIGIN),
            );
        }
    }

    /// Recompute the derived bounding box from the current `add` outlines.
    pub fn refresh_bounding_box(&mut self) {
        self.bounding_box = bounding_box(self.paths.add.iter().map(Vec::as_slice));
    }

    /// Pickable vertices of one path, resampled at `spacing`.
    pub fn uniform_vertices(&self, kind: PathKind, index: usize, spacing: f64) -> Option<Vec<Point>> {
        self.paths
            .path(kind, index)
            .map(|p| create_uniform_vertices(p, spacing))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/part.rs"]
mod tests;
