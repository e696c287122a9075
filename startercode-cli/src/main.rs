//! startercode — starter-code generator for open data shop datasets.
//!
//! # Usage
//!
//! ```text
//! startercode generate [--config <file>] [--output <dir>] [--format python|rmarkdown]... [--dry-run] [--prune] [--strict]
//! startercode catalog  [--config <file>] [--json]
//! startercode diff     [--config <file>] [--output <dir>]
//! ```
//!
//! Logs go to stderr; `RUST_LOG` overrides the level chosen by `--verbose`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{catalog::CatalogArgs, diff::DiffArgs, generate::GenerateArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "startercode",
    version,
    about = "Generate Python and R starter code for every dataset of an open data shop",
    long_about = None,
)]
struct Cli {
    /// Log debug output.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch metadata and write notebooks, R Markdown files and the index README.
    Generate(GenerateArgs),

    /// List the datasets the generator would process.
    Catalog(CatalogArgs),

    /// Show unified diff of what generate would write.
    Diff(DiffArgs),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Commands::Generate(args) => args.run(),
        Commands::Catalog(args) => args.run(),
        Commands::Diff(args) => args.run(),
    }
}
