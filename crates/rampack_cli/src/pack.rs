//! The `pack` subcommand: bundle plan in, indexed artifact out.

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::path::{Path, PathBuf};

use rampack_bundle::{write_bundle, BundlePlan, ModuleRecord, RamBundleInfo};
use rampack_config::BundleConfig;
use rampack_ids::{commit_build, BuildCounter, DeltaFilter, IdentitySpace, ManifestEntry};

use crate::pipeline::{bundle_encoding, encoding_name, resolve_config};
use crate::{GlobalArgs, PackArgs};

/// Runs one bundle build from a plan file.
///
/// Ids are assigned to every module in the plan before any filtering, so
/// a module dropped from this delta still resolves to its stable id the
/// next time it changes. The manifest records only the modules actually
/// emitted, and is committed after the artifact is on disk.
pub fn run(args: &PackArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let config = effective_config(args, global)?;
    let plan = BundlePlan::load(Path::new(&args.plan))?;

    let (output, ids_dir) = match (config.bundle_output.clone(), config.ids_dir()) {
        (Some(output), Some(ids_dir)) => (output, ids_dir),
        _ => {
            return Err(
                "no bundle output configured; set bundle.output in rampack.toml or pass --output"
                    .into(),
            )
        }
    };

    let counter = BuildCounter::new(&ids_dir);
    if config.reset_module_ids {
        counter.reset();
    }
    let last_build_id = counter.read();
    let mut space = IdentitySpace::load(&ids_dir, last_build_id)?;

    let BundlePlan {
        startup_modules,
        lazy_modules,
        groups,
    } = plan;

    let mut startup = Vec::with_capacity(startup_modules.len());
    for module in startup_modules {
        let id = space.id_for(&module.source_path)?;
        startup.push(ModuleRecord::from_plan(module, id));
    }
    let mut lazy = Vec::with_capacity(lazy_modules.len());
    for module in lazy_modules {
        let id = space.id_for(&module.source_path)?;
        lazy.push(ModuleRecord::from_plan(module, id));
    }

    let mut id_groups: BTreeMap<u64, BTreeSet<u64>> = BTreeMap::new();
    for (root, members) in groups {
        let root_id = space.id_for(&root)?;
        let mut member_ids = BTreeSet::new();
        for member in &members {
            member_ids.insert(space.id_for(member)?);
        }
        id_groups.insert(root_id, member_ids);
    }

    if config.split_ram_bundle {
        let exclude = config
            .remove_entry
            .then(|| config.entry_point.clone())
            .flatten();
        let filter = DeltaFilter::from_space(&space, exclude);
        let before = startup.len() + lazy.len();
        startup.retain(|m| filter.should_emit(&m.source_path));
        lazy.retain(|m| filter.should_emit(&m.source_path));
        log::debug!(
            "delta filter kept {} of {before} modules",
            startup.len() + lazy.len()
        );
    }

    let entries: Vec<ManifestEntry> = startup
        .iter()
        .chain(lazy.iter())
        .map(|m| ManifestEntry {
            path: m.source_path.clone(),
            id: m.id,
        })
        .collect();

    let info = RamBundleInfo {
        startup_modules: startup,
        lazy_modules: lazy,
        groups: id_groups,
    };
    write_bundle(&output, &info, bundle_encoding(config.encoding))?;

    if config.split_ram_bundle {
        let build_id = commit_build(&counter, entries)?;
        if !global.quiet {
            println!(
                "build {build_id}: {} ({} modules, {} newly assigned ids)",
                output.display(),
                info.startup_modules.len() + info.lazy_modules.len(),
                space.minted_count()
            );
        }
    } else if !global.quiet {
        println!("wrote {}", output.display());
    }
    Ok(0)
}

/// Folds CLI flag overrides into the loaded configuration.
fn effective_config(args: &PackArgs, global: &GlobalArgs) -> Result<BundleConfig, Box<dyn Error>> {
    let mut config = resolve_config(global)?;
    if let Some(output) = &args.output {
        config.bundle_output = Some(PathBuf::from(output));
    }
    config.split_ram_bundle |= args.split;
    config.remove_entry |= args.remove_entry;
    config.reset_module_ids = args.reset_ids;
    if let Some(entry) = &args.entry_point {
        config.entry_point = Some(entry.clone());
    }
    if let Some(encoding) = args.encoding {
        config.encoding = encoding_name(encoding);
    }

    // Flags bypass the loader, so its consistency checks repeat here.
    if config.remove_entry && config.entry_point.is_none() {
        return Err("--remove-entry requires --entry-point (or bundle.entry_point)".into());
    }
    Ok(config)
}
