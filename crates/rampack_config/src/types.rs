//! Configuration types deserialized from `rampack.toml`.

use serde::Deserialize;
use std::path::PathBuf;

/// The top-level configuration parsed from `rampack.toml`.
///
/// Currently a single `[bundle]` table; kept as a struct so later
/// sections (e.g. per-platform overrides) slot in without breaking
/// existing files.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectConfig {
    /// Bundle output settings.
    #[serde(default)]
    pub bundle: BundleSection,
}

/// The `[bundle]` table of `rampack.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct BundleSection {
    /// Path of the bundle artifact to produce. When absent, incremental
    /// bookkeeping is disabled and every build is a full build.
    #[serde(default)]
    pub output: Option<String>,

    /// Whether to produce cumulative delta bundles instead of full bundles.
    #[serde(default)]
    pub split: bool,

    /// Text encoding for module code in the artifact.
    #[serde(default)]
    pub encoding: EncodingName,

    /// Whether to drop the entry-point module from delta artifacts.
    #[serde(default)]
    pub remove_entry: bool,

    /// Entry-point path used by `remove_entry` filtering.
    #[serde(default)]
    pub entry_point: Option<String>,
}

/// Named text encoding for bundle code sections.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EncodingName {
    /// UTF-8 (default).
    #[default]
    Utf8,
    /// UTF-16, little-endian code units.
    Utf16le,
    /// 7-bit ASCII; non-ASCII characters are replaced.
    Ascii,
}

/// Resolved bundle settings for one build invocation.
///
/// Built from a [`ProjectConfig`] (or directly from CLI flags) and passed
/// to every component that needs the output target. All incremental
/// behavior keys off `bundle_output`: when it is `None`, the derived
/// paths in [`crate::paths`] are `None` and counter/manifest operations
/// degrade to no-ops.
#[derive(Clone, Debug, Default)]
pub struct BundleConfig {
    /// Path of the bundle artifact, if configured.
    pub bundle_output: Option<PathBuf>,

    /// Whether this build produces a cumulative delta bundle.
    pub split_ram_bundle: bool,

    /// Text encoding for code sections.
    pub encoding: EncodingName,

    /// Whether to drop the entry-point module from delta artifacts.
    pub remove_entry: bool,

    /// Whether to discard all persisted module ids before this build.
    pub reset_module_ids: bool,

    /// Entry-point path used by `remove_entry` filtering.
    pub entry_point: Option<String>,
}

impl BundleConfig {
    /// Builds a `BundleConfig` from a parsed `rampack.toml`.
    pub fn from_project(config: &ProjectConfig) -> Self {
        Self {
            bundle_output: config.bundle.output.as_ref().map(PathBuf::from),
            split_ram_bundle: config.bundle.split,
            encoding: config.bundle.encoding,
            remove_entry: config.bundle.remove_entry,
            reset_module_ids: false,
            entry_point: config.bundle.entry_point.clone(),
        }
    }
}
