//! Per-build module-id manifest files.
//!
//! One manifest is written per committed build, named by its decimal build
//! id and stored in the ids directory. The format is a UTF-8 JSON array of
//! `{"path": ..., "id": ...}` objects, written and read as a whole file.
//! Manifests are immutable once written.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::IdsError;

/// Width of the id block reserved for each build's newly minted ids.
pub const ID_BLOCK_WIDTH: u64 = 1000;

/// Hard cap on the number of modules recorded in one manifest.
///
/// Equal to [`ID_BLOCK_WIDTH`]: the cap is what guarantees that one
/// build's new ids fit inside its block, so exceeding it is treated as
/// corruption rather than clamped.
pub const MAX_MANIFEST_MODULES: usize = ID_BLOCK_WIDTH as usize;

/// One `(path, id)` assignment recorded in a manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Canonical resolved path of the module.
    pub path: String,
    /// The module id assigned to that path.
    pub id: u64,
}

/// An ordered set of module-id assignments for one build.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleManifest {
    /// The recorded assignments, in emission order.
    pub entries: Vec<ManifestEntry>,
}

impl ModuleManifest {
    /// Loads a manifest file, returning `None` if it is missing or corrupt.
    ///
    /// Fail-safe by design: a manifest that cannot be read contributes no
    /// history, it does not fail the build.
    pub fn load(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        let entries: Vec<ManifestEntry> = serde_json::from_str(&content).ok()?;
        Some(Self { entries })
    }

    /// Saves the manifest as a single whole-file write.
    pub fn save(&self, path: &Path) -> Result<(), IdsError> {
        let json = serde_json::to_string(&self.entries).map_err(|e| IdsError::Serialization {
            reason: e.to_string(),
        })?;
        std::fs::write(path, json).map_err(|e| IdsError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Returns `true` if this manifest exceeds the per-build module cap.
    pub fn is_oversized(&self) -> bool {
        self.entries.len() > MAX_MANIFEST_MODULES
    }
}
