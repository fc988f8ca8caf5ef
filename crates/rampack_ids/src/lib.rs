//! Persistent module-id state for incremental bundle builds.
//!
//! This crate owns everything that survives between builds of one output
//! target: the build counter, the per-build module-id manifests, the
//! identity space that hands out stable ids, and the delta filter that
//! drops modules already shipped in earlier builds. All state is loaded
//! fresh from the ids directory at the start of every build; nothing is
//! cached across process runs.

#![warn(missing_docs)]

pub mod commit;
pub mod counter;
pub mod error;
pub mod filter;
pub mod identity;
pub mod manifest;

pub use commit::commit_build;
pub use counter::BuildCounter;
pub use error::IdsError;
pub use filter::DeltaFilter;
pub use identity::IdentitySpace;
pub use manifest::{ManifestEntry, ModuleManifest, ID_BLOCK_WIDTH, MAX_MANIFEST_MODULES};
