//! Delta filtering: dropping modules already shipped in prior builds.
//!
//! Applies only in split mode. The filter holds the set of paths present
//! in any persisted manifest within the scan window, plus an optional
//! entry-point path whose module is removed from delta artifacts meant to
//! be overlaid onto a base bundle that already contains the entry wiring.

use std::collections::HashSet;

use crate::identity::IdentitySpace;

/// Decides which modules must be emitted in the current delta artifact.
pub struct DeltaFilter {
    /// Paths already present in a prior build's manifest.
    shipped: HashSet<String>,

    /// Entry-point path to exclude, matched as a substring.
    exclude_entry: Option<String>,
}

impl DeltaFilter {
    /// Creates a filter from an explicit shipped-path set.
    pub fn new(shipped: HashSet<String>, exclude_entry: Option<String>) -> Self {
        Self {
            shipped,
            exclude_entry,
        }
    }

    /// Creates a filter from the identity history of the current build.
    pub fn from_space(space: &IdentitySpace, exclude_entry: Option<String>) -> Self {
        Self::new(
            space.shipped_paths().map(String::from).collect(),
            exclude_entry,
        )
    }

    /// Returns `true` if the module at `path` belongs in this build's
    /// artifact.
    ///
    /// Shipped paths are dropped; when an entry-point exclusion is set,
    /// any path containing it as a substring is dropped as well.
    pub fn should_emit(&self, path: &str) -> bool {
        if self.shipped.contains(path) {
            return false;
        }
        if let Some(entry) = &self.exclude_entry {
            if path.contains(entry.as_str()) {
                return false;
            }
        }
        true
    }
}
