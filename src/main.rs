//! # dex CLI
//!
//! Builds the item and move reference indexes and the experience table.
//!
//! ## Usage
//!
//! ```bash
//! dex --config ./config/dex.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dex sync items` | Build `item_index.json` |
//! | `dex sync moves` | Build `move_index.json` |
//! | `dex sync all` | Build both, items first |
//! | `dex xp` | Print the experience table per growth rate |
//! | `dex config` | Print the effective configuration |
//!
//! ## Examples
//!
//! ```bash
//! # Rebuild a narrow slice of the item index without writing anything
//! dex sync items --start 289 --end 346 --dry-run
//!
//! # Machine-readable progress on stderr
//! dex --progress json sync moves
//!
//! # Verbose request logging
//! RUST_LOG=dex_index=debug dex sync items --end 10
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dex_index::config::{self, Config};
use dex_index::pipeline::{self, PipelineKind, SyncOptions};
use dex_index::progress::ProgressMode;
use dex_index::xp;

/// dex: builds generation-filtered item and move indexes from the PokéAPI.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the file does not exist the built-in defaults are used.
#[derive(Parser)]
#[command(
    name = "dex",
    about = "Builds generation-filtered item and move indexes from the PokéAPI",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/dex.toml")]
    config: PathBuf,

    /// Progress output on stderr.
    #[arg(long, global = true, value_enum, default_value = "auto")]
    progress: ProgressMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, filter, normalize and persist an index.
    ///
    /// Walks every id in the configured range. The output file is rewritten
    /// in full after each merged record, so interrupting the run leaves a
    /// valid (partial) index behind. Re-running starts from the first id.
    Sync {
        /// Which index to build.
        #[arg(value_enum)]
        kind: PipelineKind,

        /// First id to fetch (overrides config).
        #[arg(long)]
        start: Option<u32>,

        /// Last id to fetch, inclusive (overrides config).
        #[arg(long)]
        end: Option<u32>,

        /// Output file (overrides config; not valid with `all`).
        #[arg(long)]
        output: Option<PathBuf>,

        /// Fetch and normalize, but never write the index.
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the experience table for every growth rate, levels 1-100.
    Xp {
        /// Write JSON to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML.
    Config,
}

fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        config::load_config(path)
    } else {
        info!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::minimal())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dex=info,dex_index=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Xp { output } = &cli.command {
        return xp::run_xp(output.as_deref());
    }

    let cfg = load_or_default(&cli.config)?;

    match cli.command {
        Commands::Sync {
            kind,
            start,
            end,
            output,
            dry_run,
        } => {
            let options = SyncOptions {
                start,
                end,
                output,
                dry_run,
                progress: cli.progress,
            };
            pipeline::run_sync(&cfg, kind, &options)?;
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&cfg)?);
        }
        Commands::Xp { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
