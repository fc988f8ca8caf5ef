//! Module records and bundle inputs.
//!
//! A [`BundlePlan`] is what the upstream resolver/transformer hands over:
//! startup and lazy module lists (code, path, name) plus path-keyed group
//! roots, without ids. A [`RamBundleInfo`] is the same bundle after id
//! assignment, with groups resolved to id sets; it is what the encoder
//! consumes.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::BundleError;

/// Kind of a module, deciding its default placement in the bundle.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModuleType {
    /// Executed unconditionally at bundle load (prelude, polyfills).
    Script,
    /// Loaded on demand by numeric id (default).
    #[default]
    Module,
}

/// A resolved module as supplied by the upstream pipeline, before id
/// assignment.
#[derive(Clone, Debug, Deserialize)]
pub struct PlanModule {
    /// Transformed source code of the module.
    pub code: String,

    /// Canonical resolved path; the module's identity across builds.
    pub source_path: String,

    /// Display name (usually the file basename).
    #[serde(default)]
    pub name: String,

    /// Module kind.
    #[serde(default)]
    pub module_type: ModuleType,

    /// Pre-computed source map, carried through untouched.
    #[serde(default)]
    pub map: Option<serde_json::Value>,
}

/// The bundle plan handed over by the upstream resolver.
#[derive(Debug, Default, Deserialize)]
pub struct BundlePlan {
    /// Modules whose code runs unconditionally at load.
    #[serde(default)]
    pub startup_modules: Vec<PlanModule>,

    /// Modules loaded on demand by id.
    #[serde(default)]
    pub lazy_modules: Vec<PlanModule>,

    /// Group roots: path of the root module mapped to the paths of the
    /// modules co-located with it.
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
}

impl BundlePlan {
    /// Loads a bundle plan from a JSON file.
    ///
    /// Unlike persisted id state, the plan is a required input: failures
    /// are surfaced, not degraded.
    pub fn load(path: &Path) -> Result<Self, BundleError> {
        let content = std::fs::read_to_string(path).map_err(|e| BundleError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| BundleError::PlanParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// A module with its assigned id, ready for encoding.
#[derive(Clone, Debug)]
pub struct ModuleRecord {
    /// Build-wide unique module id.
    pub id: u64,

    /// Transformed source code.
    pub code: String,

    /// Canonical resolved path.
    pub source_path: String,

    /// Display name.
    pub name: String,

    /// Module kind.
    pub module_type: ModuleType,

    /// Pre-computed source map, carried through untouched.
    pub map: Option<serde_json::Value>,
}

impl ModuleRecord {
    /// Builds a record from a plan module and its assigned id.
    pub fn from_plan(module: PlanModule, id: u64) -> Self {
        Self {
            id,
            code: module.code,
            source_path: module.source_path,
            name: module.name,
            module_type: module.module_type,
            map: module.map,
        }
    }
}

/// A fully id-assigned bundle, the encoder's input.
#[derive(Debug, Default)]
pub struct RamBundleInfo {
    /// Modules whose code forms the startup section.
    pub startup_modules: Vec<ModuleRecord>,

    /// Modules addressable by id at runtime.
    pub lazy_modules: Vec<ModuleRecord>,

    /// Co-location groups: root module id mapped to member ids.
    pub groups: BTreeMap<u64, BTreeSet<u64>>,
}

/// Joins module code sections into a single startup blob, newline-separated.
pub fn join_modules(modules: &[ModuleRecord]) -> String {
    modules
        .iter()
        .map(|m| m.code.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
