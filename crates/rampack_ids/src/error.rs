//! Error types for id-state operations.

use std::path::PathBuf;

/// Errors that can occur while reading or writing persisted id state.
///
/// Reads of existing state are fail-safe and degrade to "no history"
/// rather than returning these errors; the variants below cover the
/// failures that must halt the build (structural invariant violations
/// and write failures).
#[derive(Debug, thiserror::Error)]
pub enum IdsError {
    /// An I/O error occurred while writing the counter or a manifest.
    #[error("id state I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A manifest holds more modules than one build is allowed to emit.
    ///
    /// The cap keeps the per-build id block a fixed width, so exceeding
    /// it is unrecoverable corruption, not a soft limit.
    #[error("too many modules for building {target}: {count} entries exceeds the cap of {cap}")]
    BuildTooLarge {
        /// The ids directory of the affected output target.
        target: PathBuf,
        /// Number of entries found.
        count: usize,
        /// The per-build entry cap.
        cap: usize,
    },

    /// The current build tried to mint more new ids than fit in its block.
    #[error("module id block exhausted for {target}: more than {width} new modules in one build")]
    BlockExhausted {
        /// The ids directory of the affected output target.
        target: PathBuf,
        /// The id block width.
        width: u64,
    },

    /// A manifest could not be serialized.
    #[error("manifest serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}
