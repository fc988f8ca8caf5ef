//! The `inspect` subcommand: offset-table summary of an artifact.

use std::error::Error;
use std::path::Path;

use rampack_bundle::read_table;

use crate::{GlobalArgs, InspectArgs};

/// Prints the offset table of an existing bundle artifact.
pub fn run(args: &InspectArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let path = Path::new(&args.bundle);
    let bytes =
        std::fs::read(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let table = read_table(&bytes)?;

    if !global.quiet {
        let populated = table.entries.iter().filter(|e| e.length > 0).count();
        println!("{}", path.display());
        println!("  min id           {}", table.min_id);
        println!("  table entries    {}", table.num_entries);
        println!("  populated        {populated}");
        println!("  startup bytes    {}", table.startup_code_len);
        if args.entries {
            for (n, entry) in table.entries.iter().enumerate() {
                if entry.length == 0 {
                    continue;
                }
                println!(
                    "  id {:>8}  offset {:>10}  length {:>10}",
                    table.min_id as u64 + n as u64,
                    entry.offset,
                    entry.length
                );
            }
        }
    }
    Ok(0)
}
