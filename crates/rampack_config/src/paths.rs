//! Directory conventions derived from the configured bundle output path.
//!
//! The persisted id state for an output target lives in an `ids/` directory
//! adjacent to the bundle artifact: the build counter in a file named
//! `index`, and one manifest file per build named by its decimal build id.
//! Every derivation returns `None` when no output path is configured, so
//! incremental bookkeeping degrades to a no-op instead of failing.

use crate::types::BundleConfig;
use std::path::PathBuf;

/// Name of the id-state directory placed next to the bundle output.
pub const IDS_DIR_NAME: &str = "ids";

/// Name of the build counter file inside the ids directory.
///
/// The manifest scan excludes this file by name, so it must never parse
/// as a decimal build id.
pub const COUNTER_FILE_NAME: &str = "index";

impl BundleConfig {
    /// Returns the ids directory for this output target, or `None` when no
    /// output path is configured.
    pub fn ids_dir(&self) -> Option<PathBuf> {
        let output = self.bundle_output.as_ref()?;
        let parent = output.parent().unwrap_or_else(|| std::path::Path::new(""));
        Some(parent.join(IDS_DIR_NAME))
    }

    /// Returns the build counter file path, or `None` when no output path
    /// is configured.
    pub fn counter_file(&self) -> Option<PathBuf> {
        Some(self.ids_dir()?.join(COUNTER_FILE_NAME))
    }
}
