//! Writing the artifact to disk.

use std::path::Path;

use crate::encoding::BundleEncoding;
use crate::error::BundleError;
use crate::indexed::build_bundle;
use crate::module::{join_modules, RamBundleInfo};

/// Serializes a bundle and writes it to `output`.
///
/// The startup section is the newline-joined code of the startup modules.
/// A failed write is fatal: the build must not be reported successful when
/// the artifact did not persist.
pub fn write_bundle(
    output: &Path,
    info: &RamBundleInfo,
    encoding: BundleEncoding,
) -> Result<(), BundleError> {
    let startup_code = join_modules(&info.startup_modules);
    let bytes = build_bundle(&startup_code, &info.lazy_modules, &info.groups, encoding);

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).map_err(|e| BundleError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(output, &bytes).map_err(|e| BundleError::Io {
        path: output.to_path_buf(),
        source: e,
    })?;

    log::info!(
        "wrote indexed bundle to {} ({} bytes, {} lazy modules)",
        output.display(),
        bytes.len(),
        info.lazy_modules.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{ModuleRecord, ModuleType};
    use crate::reader::read_table;

    fn record(id: u64, code: &str) -> ModuleRecord {
        ModuleRecord {
            id,
            code: code.to_string(),
            source_path: format!("/app/{id}.js"),
            name: format!("{id}.js"),
            module_type: ModuleType::Module,
            map: None,
        }
    }

    #[test]
    fn writes_readable_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("app.bundle");

        let info = RamBundleInfo {
            startup_modules: vec![record(0, "pre"), record(1, "main")],
            lazy_modules: vec![record(5, "lazy")],
            groups: Default::default(),
        };
        write_bundle(&output, &info, BundleEncoding::Utf8).unwrap();

        let bytes = std::fs::read(&output).unwrap();
        let table = read_table(&bytes).unwrap();
        assert_eq!(table.startup_code(&bytes).unwrap(), b"pre\nmain\0");
        assert_eq!(table.module_code(&bytes, 5).unwrap(), b"lazy\0");
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("deep/nested/app.bundle");
        write_bundle(&output, &RamBundleInfo::default(), BundleEncoding::Utf8).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn unwritable_output_errors() {
        let dir = tempfile::tempdir().unwrap();
        // The output path is an existing directory, so the write must fail.
        let err = write_bundle(dir.path(), &RamBundleInfo::default(), BundleEncoding::Utf8)
            .unwrap_err();
        assert!(matches!(err, BundleError::Io { .. }));
    }
}
