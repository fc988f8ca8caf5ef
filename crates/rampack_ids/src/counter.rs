//! The persisted build counter.
//!
//! One decimal integer in a file named `index` inside the ids directory,
//! counting how many incremental builds have been committed for an output
//! target. Reads never fail: an absent, unreadable, or unparseable file
//! reads as 0, which downstream components treat as "no history".
//!
//! There is no cross-process locking around the counter. Two builds for
//! the same output target running concurrently can race on read/advance;
//! single-writer discipline is assumed at the orchestration layer.

use std::path::{Path, PathBuf};

use rampack_config::COUNTER_FILE_NAME;

use crate::error::IdsError;

/// Handle to the build counter of one output target's ids directory.
pub struct BuildCounter {
    /// The ids directory holding the counter file and manifests.
    ids_dir: PathBuf,
}

impl BuildCounter {
    /// Creates a counter handle for the given ids directory.
    pub fn new(ids_dir: &Path) -> Self {
        Self {
            ids_dir: ids_dir.to_path_buf(),
        }
    }

    /// Returns the ids directory this counter lives in.
    pub fn ids_dir(&self) -> &Path {
        &self.ids_dir
    }

    /// Returns the path of the counter file.
    pub fn counter_path(&self) -> PathBuf {
        self.ids_dir.join(COUNTER_FILE_NAME)
    }

    /// Reads the last committed build id.
    ///
    /// Creates the ids directory if it is missing (best-effort). Parses a
    /// leading decimal integer, ignoring trailing content. Any failure
    /// reads as 0 so corruption degrades to "no history" instead of
    /// breaking the build.
    pub fn read(&self) -> u64 {
        let _ = std::fs::create_dir_all(&self.ids_dir);
        match std::fs::read_to_string(self.counter_path()) {
            Ok(content) => parse_leading_u64(&content).unwrap_or_else(|| {
                log::debug!(
                    "counter file {} is unparseable, treating as 0",
                    self.counter_path().display()
                );
                0
            }),
            Err(_) => 0,
        }
    }

    /// Advances the counter by one and returns the new build id.
    ///
    /// Unlike reads, a failed write is surfaced: losing a build id would
    /// break the stability guarantees of every future build.
    pub fn advance(&self) -> Result<u64, IdsError> {
        let next = self.read() + 1;
        self.set(next)?;
        Ok(next)
    }

    /// Writes a specific counter value.
    pub(crate) fn set(&self, value: u64) -> Result<(), IdsError> {
        std::fs::create_dir_all(&self.ids_dir).map_err(|e| IdsError::Io {
            path: self.ids_dir.clone(),
            source: e,
        })?;
        let path = self.counter_path();
        std::fs::write(&path, value.to_string()).map_err(|e| IdsError::Io { path, source: e })
    }

    /// Deletes the counter file, returning future reads to 0.
    ///
    /// Idempotent: absence (or any other failure to remove) is ignored.
    pub fn reset(&self) {
        let _ = std::fs::remove_file(self.counter_path());
    }
}

/// Parses the leading decimal digits of a string as a `u64`.
///
/// Leading whitespace is skipped and trailing garbage is ignored; a
/// string with no leading digits yields `None`.
fn parse_leading_u64(s: &str) -> Option<u64> {
    let s = s.trim_start();
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}
