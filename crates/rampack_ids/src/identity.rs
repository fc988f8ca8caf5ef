//! The module identity space: stable path-to-id assignment across builds.
//!
//! Every build constructs one [`IdentitySpace`] from the manifests already
//! persisted for its output target. Paths seen in any prior build keep
//! their recorded id; never-seen paths are minted ids from the current
//! build's reserved block of [`ID_BLOCK_WIDTH`] ids, starting right after
//! `last_build_id * ID_BLOCK_WIDTH`. Keeping new ids compact and monotonic
//! bounds the runtime loader's flat table size, while reused ids keep
//! already-deployed delta packages valid.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rampack_config::COUNTER_FILE_NAME;

use crate::error::IdsError;
use crate::manifest::{ModuleManifest, ID_BLOCK_WIDTH, MAX_MANIFEST_MODULES};

/// Stable module-id assignment for one build invocation.
///
/// Owns all of its caches; nothing is shared across builds or targets, so
/// concurrent builds of different targets are independent by construction.
#[derive(Debug)]
pub struct IdentitySpace {
    /// The ids directory this space was loaded from.
    ids_dir: PathBuf,

    /// Historical assignments merged from persisted manifests.
    reused: HashMap<String, u64>,

    /// Assignments made during this build (reused or minted).
    assigned: HashMap<String, u64>,

    /// The most recently minted id; pre-incremented on each mint.
    next_id: u64,

    /// Number of ids minted by this build.
    minted: usize,
}

impl IdentitySpace {
    /// Loads the identity history for an output target.
    ///
    /// Scans the ids directory for files whose name parses as a decimal
    /// build id no greater than `last_build_id` (the counter file is
    /// excluded by name) and merges their manifests in ascending build-id
    /// order, keeping the earliest assignment when manifests disagree on a
    /// path. Unreadable manifests are skipped silently; a manifest over
    /// the per-build cap aborts with [`IdsError::BuildTooLarge`].
    pub fn load(ids_dir: &Path, last_build_id: u64) -> Result<Self, IdsError> {
        let mut reused = HashMap::new();

        for build_id in scan_build_ids(ids_dir, last_build_id) {
            let path = ids_dir.join(build_id.to_string());
            let Some(manifest) = ModuleManifest::load(&path) else {
                // Corrupt history contributes nothing; intentional.
                log::debug!("skipping unreadable manifest {}", path.display());
                continue;
            };
            if manifest.is_oversized() {
                return Err(IdsError::BuildTooLarge {
                    target: ids_dir.to_path_buf(),
                    count: manifest.entries.len(),
                    cap: MAX_MANIFEST_MODULES,
                });
            }
            for entry in manifest.entries {
                reused.entry(entry.path).or_insert(entry.id);
            }
        }

        log::debug!(
            "loaded {} historical id assignments for {} (last build {last_build_id})",
            reused.len(),
            ids_dir.display()
        );

        Ok(Self {
            ids_dir: ids_dir.to_path_buf(),
            reused,
            assigned: HashMap::new(),
            next_id: last_build_id * ID_BLOCK_WIDTH,
            minted: 0,
        })
    }

    /// Returns the stable id for a module path, minting one if the path
    /// has never been seen.
    ///
    /// Deterministic within a build: asking twice for the same path always
    /// returns the same id. Minting more than [`ID_BLOCK_WIDTH`] new ids
    /// in one build would spill into the next build's block and is
    /// rejected with [`IdsError::BlockExhausted`].
    pub fn id_for(&mut self, path: &str) -> Result<u64, IdsError> {
        if let Some(&id) = self.assigned.get(path) {
            return Ok(id);
        }
        if let Some(&id) = self.reused.get(path) {
            self.assigned.insert(path.to_string(), id);
            return Ok(id);
        }

        if self.minted >= MAX_MANIFEST_MODULES {
            return Err(IdsError::BlockExhausted {
                target: self.ids_dir.clone(),
                width: ID_BLOCK_WIDTH,
            });
        }
        self.next_id += 1;
        self.minted += 1;
        self.assigned.insert(path.to_string(), self.next_id);
        Ok(self.next_id)
    }

    /// Returns `true` if the path was already shipped in a prior build.
    pub fn is_shipped(&self, path: &str) -> bool {
        self.reused.contains_key(path)
    }

    /// Iterates over every path present in the persisted history.
    pub fn shipped_paths(&self) -> impl Iterator<Item = &str> {
        self.reused.keys().map(String::as_str)
    }

    /// Number of ids minted (not reused) so far in this build.
    pub fn minted_count(&self) -> usize {
        self.minted
    }
}

/// Collects build ids from the manifest filenames in an ids directory.
///
/// A missing or unreadable directory yields no history. Results are
/// sorted ascending so the merge order is deterministic regardless of
/// filesystem iteration order.
fn scan_build_ids(ids_dir: &Path, last_build_id: u64) -> Vec<u64> {
    let Ok(entries) = std::fs::read_dir(ids_dir) else {
        return Vec::new();
    };

    let mut build_ids: Vec<u64> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| name != COUNTER_FILE_NAME)
        .filter_map(|name| name.parse::<u64>().ok())
        .filter(|&id| id <= last_build_id)
        .collect();
    build_ids.sort_unstable();
    build_ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestEntry;

    fn write_manifest(ids_dir: &Path, build_id: u64, entries: &[(&str, u64)]) {
        std::fs::create_dir_all(ids_dir).unwrap();
        let manifest = ModuleManifest {
            entries: entries
                .iter()
                .map(|&(path, id)| ManifestEntry {
                    path: path.to_string(),
                    id,
                })
                .collect(),
        };
        manifest.save(&ids_dir.join(build_id.to_string())).unwrap();
    }

    #[test]
    fn fresh_target_mints_from_one() {
        let dir = tempfile::tempdir().unwrap();
        let mut space = IdentitySpace::load(dir.path(), 0).unwrap();
        assert_eq!(space.id_for("/app/a.js").unwrap(), 1);
        assert_eq!(space.id_for("/app/b.js").unwrap(), 2);
    }

    #[test]
    fn same_path_same_id_within_build() {
        let dir = tempfile::tempdir().unwrap();
        let mut space = IdentitySpace::load(dir.path(), 0).unwrap();
        let first = space.id_for("/app/a.js").unwrap();
        let second = space.id_for("/app/a.js").unwrap();
        assert_eq!(first, second);
        assert_eq!(space.minted_count(), 1);
    }

    #[test]
    fn historical_path_keeps_its_id() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), 1, &[("/app/a.js", 1), ("/app/b.js", 2)]);

        let mut space = IdentitySpace::load(dir.path(), 1).unwrap();
        assert_eq!(space.id_for("/app/b.js").unwrap(), 2);
        assert_eq!(space.id_for("/app/a.js").unwrap(), 1);
        assert_eq!(space.minted_count(), 0);
    }

    #[test]
    fn new_paths_mint_in_later_block() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), 1, &[("/app/a.js", 1)]);

        let mut space = IdentitySpace::load(dir.path(), 1).unwrap();
        assert_eq!(space.id_for("/app/a.js").unwrap(), 1);
        // First new module of build 2 lands past the first block.
        assert_eq!(space.id_for("/app/new.js").unwrap(), 1001);
    }

    #[test]
    fn blocks_are_disjoint_across_builds() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = IdentitySpace::load(dir.path(), 0).unwrap();
        let a = first.id_for("/a.js").unwrap();
        write_manifest(dir.path(), 1, &[("/a.js", a)]);

        let mut second = IdentitySpace::load(dir.path(), 1).unwrap();
        let b = second.id_for("/b.js").unwrap();
        assert_ne!(a, b);
        assert!(b >= ID_BLOCK_WIDTH, "new id {b} must lie in the next block");
        assert_eq!(second.id_for("/a.js").unwrap(), a);
    }

    #[test]
    fn stability_across_many_builds() {
        let dir = tempfile::tempdir().unwrap();

        let mut space = IdentitySpace::load(dir.path(), 0).unwrap();
        let original = space.id_for("/stable.js").unwrap();
        write_manifest(dir.path(), 1, &[("/stable.js", original)]);

        for last in 1..5u64 {
            let mut space = IdentitySpace::load(dir.path(), last).unwrap();
            assert_eq!(space.id_for("/stable.js").unwrap(), original);
            let minted = space.id_for(&format!("/other{last}.js")).unwrap();
            write_manifest(
                dir.path(),
                last + 1,
                &[("/stable.js", original), (&format!("/other{last}.js"), minted)],
            );
        }
    }

    #[test]
    fn counter_file_excluded_from_scan() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), 1, &[("/app/a.js", 1)]);
        std::fs::write(dir.path().join(COUNTER_FILE_NAME), "1").unwrap();

        let space = IdentitySpace::load(dir.path(), 1).unwrap();
        assert!(space.is_shipped("/app/a.js"));
    }

    #[test]
    fn manifests_above_counter_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), 1, &[("/app/a.js", 1)]);
        write_manifest(dir.path(), 2, &[("/app/future.js", 1001)]);

        let space = IdentitySpace::load(dir.path(), 1).unwrap();
        assert!(space.is_shipped("/app/a.js"));
        assert!(!space.is_shipped("/app/future.js"));
    }

    #[test]
    fn corrupt_manifest_skipped_silently() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), 1, &[("/app/a.js", 1)]);
        std::fs::write(dir.path().join("2"), "garbage {{{").unwrap();

        let space = IdentitySpace::load(dir.path(), 2).unwrap();
        assert!(space.is_shipped("/app/a.js"));
        assert_eq!(space.shipped_paths().count(), 1);
    }

    #[test]
    fn missing_ids_dir_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let space = IdentitySpace::load(&dir.path().join("nonexistent"), 3).unwrap();
        assert_eq!(space.shipped_paths().count(), 0);
    }

    #[test]
    fn oversized_manifest_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let entries: Vec<(String, u64)> =
            (0..1001u64).map(|i| (format!("/m{i}.js"), i + 1)).collect();
        let borrowed: Vec<(&str, u64)> = entries.iter().map(|(p, i)| (p.as_str(), *i)).collect();
        write_manifest(dir.path(), 1, &borrowed);

        let err = IdentitySpace::load(dir.path(), 1).unwrap_err();
        assert!(matches!(err, IdsError::BuildTooLarge { count: 1001, .. }));
    }

    #[test]
    fn manifest_at_cap_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let entries: Vec<(String, u64)> =
            (0..1000u64).map(|i| (format!("/m{i}.js"), i + 1)).collect();
        let borrowed: Vec<(&str, u64)> = entries.iter().map(|(p, i)| (p.as_str(), *i)).collect();
        write_manifest(dir.path(), 1, &borrowed);

        let space = IdentitySpace::load(dir.path(), 1).unwrap();
        assert_eq!(space.shipped_paths().count(), 1000);
    }

    #[test]
    fn conflicting_manifests_earliest_wins() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), 1, &[("/app/a.js", 1)]);
        write_manifest(dir.path(), 2, &[("/app/a.js", 1001)]);

        let mut space = IdentitySpace::load(dir.path(), 2).unwrap();
        assert_eq!(space.id_for("/app/a.js").unwrap(), 1);
    }

    #[test]
    fn block_exhaustion_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut space = IdentitySpace::load(dir.path(), 0).unwrap();
        for i in 0..1000 {
            space.id_for(&format!("/m{i}.js")).unwrap();
        }
        let err = space.id_for("/one-too-many.js").unwrap_err();
        assert!(matches!(err, IdsError::BlockExhausted { .. }));
    }
}
