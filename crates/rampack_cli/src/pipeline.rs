//! Shared configuration resolution for the subcommands.

use std::error::Error;
use std::path::Path;

use rampack_bundle::BundleEncoding;
use rampack_config::{
    load_config, load_config_from_str, BundleConfig, EncodingName, ProjectConfig,
};

use crate::{CliEncoding, GlobalArgs};

/// Resolves the bundle configuration for this invocation.
///
/// `--config` may name either a `rampack.toml` file or the directory
/// containing one. Without the flag, `rampack.toml` in the current
/// directory is used when present; otherwise defaults apply and the
/// subcommand's own flags must supply everything.
pub fn resolve_config(global: &GlobalArgs) -> Result<BundleConfig, Box<dyn Error>> {
    let project = match &global.config {
        Some(path) => {
            let path = Path::new(path);
            if path.is_dir() {
                load_config(path)?
            } else {
                let content = std::fs::read_to_string(path)?;
                load_config_from_str(&content)?
            }
        }
        None if Path::new("rampack.toml").is_file() => load_config(Path::new("."))?,
        None => ProjectConfig::default(),
    };
    Ok(BundleConfig::from_project(&project))
}

/// Maps a configured encoding name onto the encoder's encoding.
pub fn bundle_encoding(name: EncodingName) -> BundleEncoding {
    match name {
        EncodingName::Utf8 => BundleEncoding::Utf8,
        EncodingName::Utf16le => BundleEncoding::Utf16Le,
        EncodingName::Ascii => BundleEncoding::Ascii,
    }
}

/// Maps an `--encoding` flag value onto the configured encoding name.
pub fn encoding_name(value: CliEncoding) -> EncodingName {
    match value {
        CliEncoding::Utf8 => EncodingName::Utf8,
        CliEncoding::Utf16le => EncodingName::Utf16le,
        CliEncoding::Ascii => EncodingName::Ascii,
    }
}
