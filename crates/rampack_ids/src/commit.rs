//! Committing a build: manifest write plus counter advance.
//!
//! The two writes form one logical step. The manifest is written first,
//! named by the prospective build id; only then is the counter advanced.
//! If the counter write fails, the manifest is removed best-effort and the
//! error is surfaced. Either failure mode leaves the scan window (build
//! ids at or below the counter) exactly as it was before the build: a
//! stray manifest above the counter is never read.

use crate::counter::BuildCounter;
use crate::error::IdsError;
use crate::manifest::{ManifestEntry, ModuleManifest, MAX_MANIFEST_MODULES};

/// Persists this build's module-id assignments and advances the counter.
///
/// `entries` must list every module actually included in the artifact
/// (post-filter startup and lazy modules, grouped members under their own
/// path and id). Returns the new build id on success. The artifact itself
/// remains valid standalone output when this fails; the build is simply
/// not recorded for future delta filtering, and the caller must report
/// the failure.
pub fn commit_build(counter: &BuildCounter, entries: Vec<ManifestEntry>) -> Result<u64, IdsError> {
    if entries.len() > MAX_MANIFEST_MODULES {
        return Err(IdsError::BuildTooLarge {
            target: counter.ids_dir().to_path_buf(),
            count: entries.len(),
            cap: MAX_MANIFEST_MODULES,
        });
    }

    let next = counter.read() + 1;
    let manifest_path = counter.ids_dir().join(next.to_string());
    ModuleManifest { entries }.save(&manifest_path)?;

    match counter.set(next) {
        Ok(()) => {
            log::info!(
                "committed build {next}: manifest {}",
                manifest_path.display()
            );
            Ok(next)
        }
        Err(e) => {
            let _ = std::fs::remove_file(&manifest_path);
            Err(e)
        }
    }
}
