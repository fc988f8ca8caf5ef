//! Error types for bundle serialization.

use std::path::PathBuf;

/// Errors that can occur while producing or inspecting a bundle artifact.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// An I/O error occurred while reading or writing a file.
    #[error("bundle I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A bundle plan file could not be parsed.
    #[error("failed to parse bundle plan {path}: {reason}")]
    PlanParse {
        /// The plan file path.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// Artifact bytes do not form a valid indexed bundle.
    #[error("malformed indexed bundle: {reason}")]
    Malformed {
        /// Description of the problem.
        reason: String,
    },
}
