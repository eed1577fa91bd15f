use crate::foundation::error::{SpritecutError, SpritecutResult};
use crate::model::{AnimationParams, Document, Part, VertexGroup, is_reserved_part_name};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Raw JSON shape. The three required keys are `Option` so that an explicit `null` and a missing
/// key are reported the same way.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfigDef {
    pub(crate) parts: Option<BTreeMap<String, Part>>,
    pub(crate) animation_params: Option<BTreeMap<String, AnimationParams>>,
    pub(crate) part_order: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) vertex_groups: Vec<VertexGroup>,
}

/// Project configuration as exchanged with the outside world (copy/paste or fetched JSON).
///
/// Parsing only checks JSON syntax and field types; [`ProjectConfig::into_document`] performs the
/// shape checks and is the only way to turn a config into editable state.
#[derive(Clone, Debug)]
pub struct ProjectConfig {
    def: ConfigDef,
}

impl ProjectConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> SpritecutResult<Self> {
        let def: ConfigDef = serde_json::from_reader(r)
            .map_err(|e| SpritecutError::config(format!("invalid JSON format: {e}")))?;
        Ok(Self { def })
    }

    pub fn from_json(json: &str) -> SpritecutResult<Self> {
        Self::from_reader(json.as_bytes())
    }

    pub fn from_path(path: impl AsRef<Path>) -> SpritecutResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SpritecutError::config(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Snapshot the persistent parts of a document.
    pub fn from_document(doc: &Document) -> Self {
        Self {
            def: ConfigDef {
                parts: Some(doc.parts().clone()),
                animation_params: Some(doc.animation_params().clone()),
                part_order: Some(doc.part_order().to_vec()),
                vertex_groups: doc.vertex_groups().to_vec(),
            },
        }
    }

    pub fn to_json_pretty(&self) -> SpritecutResult<String> {
        serde_json::to_string_pretty(&self.def)
            .map_err(|e| SpritecutError::config(format!("serialize config: {e}")))
    }

    /// Validate and convert into a fresh [`Document`].
    ///
    /// Rejects missing or null top-level keys, reserved part names and a `partOrder` that is
    /// not a duplicate-free list of known parts. Parts absent from `partOrder` are appended in
    /// name order, missing parameters fall back to defaults and vertex references to unknown parts
    /// are dropped. Bounding boxes are recomputed from the `add` outlines.
    #[tracing::instrument(skip(self))]
    pub fn into_document(self) -> SpritecutResult<Document> {
        let ConfigDef {
            parts,
            animation_params,
            part_order,
            vertex_groups,
        } = self.def;

        let (Some(mut parts), Some(mut animation_params), Some(mut part_order)) =
            (parts, animation_params, part_order)
        else {
            return Err(SpritecutError::config(
                "missing required fields (parts, animationParams, partOrder)",
            ));
        };

        if let Some(bad) = parts
            .keys()
            .find(|k| k.trim().is_empty() || is_reserved_part_name(k))
        {
            return Err(SpritecutError::config(format!(
                "invalid part name \"{bad}\""
            )));
        }

        let mut seen = BTreeSet::new();
        for name in &part_order {
            if !parts.contains_key(name) {
                return Err(SpritecutError::config(format!(
                    "partOrder references unknown part \"{name}\""
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(SpritecutError::config(format!(
                    "partOrder lists \"{name}\" more than once"
                )));
            }
        }
        let unlisted: Vec<String> = parts
            .keys()
            .filter(|k| !seen.contains(k.as_str()))
            .cloned()
            .collect();
        if !unlisted.is_empty() {
            tracing::warn!(parts = ?unlisted, "appending parts missing from partOrder");
            part_order.extend(unlisted);
        }

        // stored boxes are derived data; trust the outlines
        for part in parts.values_mut() {
            part.refresh_bounding_box();
        }

        animation_params.retain(|k, _| parts.contains_key(k));
        for name in parts.keys() {
            animation_params.entry(name.clone()).or_default();
        }

        let vertex_groups = vertex_groups
            .into_iter()
            .map(|mut g| {
                let before = g.vertices.len();
                g.vertices.retain(|v| parts.contains_key(&v.part_id));
                if g.vertices.len() != before {
                    tracing::warn!(
                        dropped = before - g.vertices.len(),
                        "dropping vertex references to unknown parts"
                    );
                }
                g
            })
            .collect();

        tracing::debug!(parts = parts.len(), "config accepted");
        Ok(Document::from_parts(
            parts,
            animation_params,
            part_order,
            vertex_groups,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
