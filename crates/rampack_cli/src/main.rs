//! rampack CLI — produces indexed RAM bundles from resolved bundle plans.
//!
//! Provides `rampack pack` for serializing a bundle plan into the indexed
//! binary artifact (optionally as an incremental delta), `rampack reset`
//! for discarding the persisted build counter, and `rampack inspect` for
//! dumping the offset table of an existing artifact.

#![warn(missing_docs)]

mod inspect;
mod pack;
mod pipeline;
mod reset;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// rampack — incremental indexed RAM-bundle producer.
#[derive(Parser, Debug)]
#[command(name = "rampack", version, about = "Indexed RAM bundle producer")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `rampack.toml` configuration file or its directory.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serialize a bundle plan into an indexed bundle artifact.
    Pack(PackArgs),
    /// Delete the persisted build counter for the configured output target.
    Reset,
    /// Print the offset table of an existing bundle artifact.
    Inspect(InspectArgs),
}

/// Arguments for the `rampack pack` subcommand.
#[derive(Parser, Debug)]
pub struct PackArgs {
    /// Path to the bundle plan JSON produced by the upstream resolver.
    pub plan: String,

    /// Bundle output path (overrides `bundle.output` from the config).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Produce a cumulative delta bundle and record its manifest.
    #[arg(long)]
    pub split: bool,

    /// Discard all persisted module ids before assigning.
    #[arg(long)]
    pub reset_ids: bool,

    /// Drop the entry-point module from the delta artifact.
    #[arg(long)]
    pub remove_entry: bool,

    /// Entry-point path used by `--remove-entry`.
    #[arg(long)]
    pub entry_point: Option<String>,

    /// Text encoding for code sections.
    #[arg(long, value_enum)]
    pub encoding: Option<CliEncoding>,
}

/// Arguments for the `rampack inspect` subcommand.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Path of the bundle artifact to inspect.
    pub bundle: String,

    /// Also list every non-empty table entry.
    #[arg(long)]
    pub entries: bool,
}

/// Text encoding selection for the `pack` subcommand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliEncoding {
    /// UTF-8.
    Utf8,
    /// UTF-16, little-endian.
    Utf16le,
    /// 7-bit ASCII.
    Ascii,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Optional path to a custom config file or directory.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let global = GlobalArgs {
        quiet: cli.quiet,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Pack(ref args) => pack::run(args, &global),
        Command::Reset => reset::run(&global),
        Command::Inspect(ref args) => inspect::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
