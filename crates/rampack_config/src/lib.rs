//! Parsing and validation of `rampack.toml` bundle configuration files.
//!
//! This crate reads the bundle configuration file and produces a strongly-typed
//! [`BundleConfig`] with the directory conventions derived from the configured
//! output path (the `ids/` directory and the build counter file).

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod paths;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use paths::{COUNTER_FILE_NAME, IDS_DIR_NAME};
pub use types::*;
