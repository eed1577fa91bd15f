use crate::foundation::color::Rgba8;
use crate::foundation::core::Point;
use crate::foundation::error::{SpritecutError, SpritecutResult};
use crate::model::params::AnimationParams;
use crate::model::part::{LassoPath, Part};
use crate::model::vertex_group::{VertexGroup, VertexRef};
use crate::segment::STATIC_BODY_KEY;
use std::collections::BTreeMap;

/// Part name reserved for the derived whole-image remainder layer.
pub const RESERVED_PART_NAME: &str = "body";

/// Names a user part may not take: the remainder layer and its bitmap key, in any case.
pub fn is_reserved_part_name(name: &str) -> bool {
    name.eq_ignore_ascii_case(RESERVED_PART_NAME) || name.eq_ignore_ascii_case(STATIC_BODY_KEY)
}

/// A part with this name acts as the catch-all: lassos committed to any other part are
/// subtracted from it.
pub const WHOLE_PART_NAME: &str = "whole";

/// Direction for [`Document::move_part`]. `Up` moves toward index 0, the front of the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Editable source of truth: parts, their animation parameters, stacking order and vertex groups.
///
/// Every committed edit bumps `revision`. Edits that change what segmentation would produce also
/// bump `paths_version`, which the session compares against the version its bitmap cache was
/// built from.
#[derive(Clone, Debug, Default)]
pub struct Document {
    parts: BTreeMap<String, Part>,
    animation_params: BTreeMap<String, AnimationParams>,
    part_order: Vec<String>,
    vertex_groups: Vec<VertexGroup>,
    active_group: Option<usize>,
    active_part: Option<String>,
    paths_version: u64,
    revision: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a document from already-validated pieces (config import).
    pub(crate) fn from_parts(
        parts: BTreeMap<String, Part>,
        animation_params: BTreeMap<String, AnimationParams>,
        part_order: Vec<String>,
        vertex_groups: Vec<VertexGroup>,
    ) -> Self {
        let active_part = part_order.first().cloned();
        let active_group = if vertex_groups.is_empty() { None } else { Some(0) };
        Self {
            parts,
            animation_params,
            part_order,
            vertex_groups,
            active_group,
            active_part,
            paths_version: 0,
            revision: 0,
        }
    }

    pub fn parts(&self) -> &BTreeMap<String, Part> {
        &self.parts
    }

    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.get(name)
    }

    pub fn animation_params(&self) -> &BTreeMap<String, AnimationParams> {
        &self.animation_params
    }

    pub fn params(&self, name: &str) -> Option<&AnimationParams> {
        self.animation_params.get(name)
    }

    pub fn part_order(&self) -> &[String] {
        &self.part_order
    }

    pub fn vertex_groups(&self) -> &[VertexGroup] {
        &self.vertex_groups
    }

    pub fn active_part(&self) -> Option<&str> {
        self.active_part.as_deref()
    }

    pub fn active_vertex_group(&self) -> Option<usize> {
        self.active_group
    }

    pub fn paths_version(&self) -> u64 {
        self.paths_version
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the whole document, keeping version counters monotonic.
    pub(crate) fn replace_with(&mut self, mut other: Document) {
        other.paths_version = self.paths_version + 1;
        other.revision = self.revision + 1;
        *self = other;
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn touch_paths(&mut self) {
        self.paths_version += 1;
        self.revision += 1;
    }

    fn require_part(&self, name: &str) -> SpritecutResult<()> {
        if self.parts.contains_key(name) {
            Ok(())
        } else {
            Err(SpritecutError::validation(format!(
                "no part named \"{name}\""
            )))
        }
    }

    pub fn set_active_part(&mut self, name: Option<&str>) -> SpritecutResult<()> {
        if let Some(n) = name {
            self.require_part(n)?;
        }
        self.active_part = name.map(str::to_owned);
        Ok(())
    }

    /// Create an empty part with default parameters at the back of the stack and select it.
    ///
    /// Returns the trimmed name actually used.
    pub fn add_part(&mut self, name: &str) -> SpritecutResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SpritecutError::validation("please enter a part name"));
        }
        if is_reserved_part_name(name) {
            return Err(SpritecutError::validation(format!(
                "the name '{name}' is reserved, please choose a different name"
            )));
        }
        if self.parts.contains_key(name) {
            return Err(SpritecutError::validation(format!(
                "a part named \"{name}\" already exists"
            )));
        }

        self.parts.insert(name.to_owned(), Part::default());
        self.animation_params
            .insert(name.to_owned(), AnimationParams::default());
        self.part_order.push(name.to_owned());
        self.active_part = Some(name.to_owned());
        self.touch_paths();
        Ok(name.to_owned())
    }

    /// Remove a part everywhere, including every vertex group reference to it.
    pub fn delete_part(&mut self, name: &str) -> SpritecutResult<()> {
        self.require_part(name)?;
        self.parts.remove(name);
        self.animation_params.remove(name);
        self.part_order.retain(|p| p != name);
        for group in &mut self.vertex_groups {
            group.purge_part(name);
        }
        if self.active_part.as_deref() == Some(name) {
            self.active_part = self.part_order.first().cloned();
        }
        self.touch_paths();
        Ok(())
    }

    /// Deep-copy a part and its parameters under `{name}_copy` (or `{name}_copy_N` on collision),
    /// placed right behind the source in the stack. Returns the new name.
    pub fn duplicate_part(&mut self, name: &str) -> SpritecutResult<String> {
        self.require_part(name)?;
        let mut new_name = format!("{name}_copy");
        let mut counter = 1u32;
        while self.parts.contains_key(&new_name) {
            new_name = format!("{name}_copy_{counter}");
            counter += 1;
        }

        let part = self.parts[name].clone();
        let params = self
            .animation_params
            .get(name)
            .copied()
            .unwrap_or_default();
        self.parts.insert(new_name.clone(), part);
        self.animation_params.insert(new_name.clone(), params);

        let at = self
            .part_order
            .iter()
            .position(|p| p == name)
            .map(|i| i + 1)
            .unwrap_or(self.part_order.len());
        self.part_order.insert(at, new_name.clone());
        self.active_part = Some(new_name.clone());
        self.touch_paths();
        Ok(new_name)
    }

    /// Swap the entry at `index` with its neighbor. Returns `false` at either boundary.
    pub fn move_part(&mut self, index: usize, direction: MoveDirection) -> bool {
        let len = self.part_order.len();
        let target = match direction {
            MoveDirection::Up if index > 0 && index < len => index - 1,
            MoveDirection::Down if index + 1 < len => index + 1,
            _ => return false,
        };
        self.part_order.swap(index, target);
        self.touch();
        true
    }

    /// Commit a completed lasso as the part's outline.
    ///
    /// Lassos with fewer than three points are discarded and `Ok(false)` is returned. When a part
    /// named [`WHOLE_PART_NAME`] exists, every other part's lasso is also cut out of it.
    pub fn finalize_path(&mut self, name: &str, path: LassoPath) -> SpritecutResult<bool> {
        self.require_part(name)?;
        if path.len() < 3 {
            return Ok(false);
        }
        if name != WHOLE_PART_NAME {
            if let Some(whole) = self.parts.get_mut(WHOLE_PART_NAME) {
                whole.paths.subtract.push(path.clone());
            }
        }
        if let Some(part) = self.parts.get_mut(name) {
            part.set_outline(path);
        }
        self.touch_paths();
        Ok(true)
    }

    pub fn set_anchor(&mut self, name: &str, anchor: Point) -> SpritecutResult<()> {
        self.require_part(name)?;
        if let Some(part) = self.parts.get_mut(name) {
            part.anchor = Some(anchor);
        }
        self.touch();
        Ok(())
    }

    pub fn set_params(&mut self, name: &str, params: AnimationParams) -> SpritecutResult<()> {
        self.require_part(name)?;
        self.animation_params.insert(name.to_owned(), params);
        self.touch();
        Ok(())
    }

    /// Start a new, empty vertex group and make it the active one.
    pub fn add_vertex_group(&mut self) -> usize {
        self.vertex_groups.push(VertexGroup::default());
        let idx = self.vertex_groups.len() - 1;
        self.active_group = Some(idx);
        self.touch();
        idx
    }

    pub fn set_active_vertex_group(&mut self, index: usize) -> SpritecutResult<()> {
        if index >= self.vertex_groups.len() {
            return Err(SpritecutError::validation(format!(
                "vertex group {index} does not exist"
            )));
        }
        self.active_group = Some(index);
        Ok(())
    }

    pub fn remove_vertex_group(&mut self, index: usize) -> SpritecutResult<()> {
        if index >= self.vertex_groups.len() {
            return Err(SpritecutError::validation(format!(
                "vertex group {index} does not exist"
            )));
        }
        self.vertex_groups.remove(index);
        self.active_group = match self.active_group {
            _ if self.vertex_groups.is_empty() => None,
            Some(a) if a > index => Some(a - 1),
            Some(a) if a == index => Some(index.min(self.vertex_groups.len() - 1)),
            other => other,
        };
        self.touch();
        Ok(())
    }

    pub fn set_vertex_group_color(
        &mut self,
        index: usize,
        color: Option<Rgba8>,
    ) -> SpritecutResult<()> {
        let group = self.vertex_groups.get_mut(index).ok_or_else(|| {
            SpritecutError::validation(format!("vertex group {index} does not exist"))
        })?;
        group.color = color;
        self.touch();
        Ok(())
    }

    /// Apply a vertex pick to the active group, creating one if needed.
    ///
    /// With `extend` a hit toggles membership; without it a hit on a member clears the selection
    /// and a hit on a non-member replaces it. A miss (`None`) clears the selection. Returns whether
    /// the group changed.
    pub fn select_vertex(&mut self, hit: Option<VertexRef>, extend: bool) -> SpritecutResult<bool> {
        if let Some(v) = &hit {
            self.require_part(&v.part_id)?;
        }
        let idx = match self.active_group {
            Some(i) => i,
            None if hit.is_none() => return Ok(false),
            None => {
                self.vertex_groups.push(VertexGroup::default());
                let i = self.vertex_groups.len() - 1;
                self.active_group = Some(i);
                i
            }
        };
        let group = &mut self.vertex_groups[idx];

        let changed = match hit {
            Some(v) if extend => {
                group.toggle(v);
                true
            }
            Some(v) if group.contains(&v) => {
                group.vertices.clear();
                true
            }
            Some(v) => {
                group.vertices = vec![v];
                true
            }
            None => {
                let had = !group.vertices.is_empty();
                group.vertices.clear();
                had
            }
        };
        if changed {
            self.touch();
        }
        Ok(changed)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/document.rs"]
mod tests;
