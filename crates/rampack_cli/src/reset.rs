//! The `reset` subcommand: discard the persisted build counter.

use std::error::Error;

use rampack_ids::BuildCounter;

use crate::pipeline::resolve_config;
use crate::GlobalArgs;

/// Deletes the build counter for the configured output target.
///
/// Manifests are left in place; with the counter gone they sit above the
/// scan window and the next build starts from an empty history.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let config = resolve_config(global)?;
    let Some(ids_dir) = config.ids_dir() else {
        if !global.quiet {
            println!("no bundle output configured; nothing to reset");
        }
        return Ok(0);
    };

    BuildCounter::new(&ids_dir).reset();
    log::info!("deleted build counter in {}", ids_dir.display());
    if !global.quiet {
        println!("reset build counter in {}", ids_dir.display());
    }
    Ok(0)
}
