use crate::foundation::color::Rgba8;
use crate::foundation::core::Point;
use crate::model::part::{Part, PathKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structural reference to one resampled vertex of one path of one part.
///
/// The position is looked up at use time, so a reference keeps meaning across path edits as long
/// as the indices stay in range.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexRef {
    pub part_id: String,
    pub path_type: PathKind,
    pub path_index: usize,
    pub vertex_index: usize,
}

impl VertexRef {
    pub fn new(
        part_id: impl Into<String>,
        path_type: PathKind,
        path_index: usize,
        vertex_index: usize,
    ) -> Self {
        Self {
            part_id: part_id.into(),
            path_type,
            path_index,
            vertex_index,
        }
    }

    /// Untransformed position of the vertex, or `None` when the reference no longer resolves.
    pub fn rest_position(&self, parts: &BTreeMap<String, Part>, spacing: f64) -> Option<Point> {
        parts
            .get(&self.part_id)?
            .uniform_vertices(self.path_type, self.path_index, spacing)?
            .get(self.vertex_index)
            .copied()
    }
}

/// A user-curated set of vertices whose live positions form a seam patch polygon.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexGroup {
    #[serde(default)]
    pub vertices: Vec<VertexRef>,
    /// Explicit fill color; when `None` the fill is sampled from the member parts.
    #[serde(default)]
    pub color: Option<Rgba8>,
}

impl VertexGroup {
    pub fn contains(&self, v: &VertexRef) -> bool {
        self.vertices.contains(v)
    }

    /// Add `v` if absent, remove it if present. Returns whether it is now a member.
    pub fn toggle(&mut self, v: VertexRef) -> bool {
        if let Some(pos) = self.vertices.iter().position(|x| *x == v) {
            self.vertices.remove(pos);
            false
        } else {
            self.vertices.push(v);
            true
        }
    }

    pub fn purge_part(&mut self, part_id: &str) {
        self.vertices.retain(|v| v.part_id != part_id);
    }
}
