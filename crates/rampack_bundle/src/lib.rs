//! Serialization of indexed RAM bundles.
//!
//! An indexed RAM bundle stores all modules of an application in a single
//! file: a magic number, a fixed-size offset table addressed by module id,
//! the startup code, and one null-terminated code blob per lazy module
//! (or per module group). A runtime loader random-accesses lazy modules
//! by id without parsing the rest of the file. This crate implements the
//! producer side of the format plus a table reader for inspection.

#![warn(missing_docs)]

pub mod encoding;
pub mod error;
pub mod groups;
pub mod indexed;
pub mod module;
pub mod reader;
pub mod writer;

pub use encoding::BundleEncoding;
pub use error::BundleError;
pub use groups::ModuleGroups;
pub use indexed::{build_bundle, MAGIC_NUMBER};
pub use module::{join_modules, BundlePlan, ModuleRecord, ModuleType, PlanModule, RamBundleInfo};
pub use reader::{read_table, BundleTable, TableEntry};
pub use writer::write_bundle;
