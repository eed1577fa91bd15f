use serde::{Deserialize, Serialize};
use std::path::Path;

/// Small UI preferences persisted next to the user's work.
///
/// Persistence is best effort: failures are logged and never surface to the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub has_seen_help: bool,
}

impl Preferences {
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read preferences");
                return Self::default();
            }
        };
        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed preferences");
            Self::default()
        })
    }

    /// Returns whether the preferences reached disk.
    pub fn save(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let json = match serde_json::to_vec_pretty(self) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!(error = %e, "could not serialize preferences");
                return false;
            }
        };
        match std::fs::write(path, json) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not save preferences");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/prefs.rs"]
mod tests;
