//! `decktune-blackbox`: inspect black box recordings left behind after a crash

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

mod commands;

use decktune_core::config::DiagnosticsConfig;

#[derive(Parser)]
#[command(name = "decktune-blackbox")]
#[command(about = "Inspect DeckTune black box recordings")]
#[command(version)]
struct Cli {
    /// Diagnostics config file (JSON)
    #[arg(long, global = true, env = "DECKTUNE_DIAGNOSTICS_CONFIG")]
    config: Option<PathBuf>,

    /// Recording directory (overrides the config file)
    #[arg(long, global = true, env = "DECKTUNE_BLACKBOX_DIR")]
    dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recordings, newest first
    List {
        /// Include recordings beyond the retention limit
        #[arg(long)]
        all: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a recording
    Show {
        /// Recording file name, as printed by `list`
        handle: String,

        /// Print at most this many samples (newest)
        #[arg(long)]
        samples: Option<usize>,

        /// Print the raw recording as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export a recording's samples to CSV
    Export {
        /// Recording file name
        handle: String,

        /// Output CSV path
        output: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<DiagnosticsConfig> {
    let mut config = DiagnosticsConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load diagnostics config")?;
    if let Some(dir) = &cli.dir {
        config.blackbox.storage_path = dir.clone();
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::List { all, json } => commands::list(&config, all, json),
        Commands::Show {
            handle,
            samples,
            json,
        } => commands::show(&config, &handle, samples, json),
        Commands::Export { handle, output } => commands::export(&config, &handle, &output),
        Commands::Config => commands::print_config(&config),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        tracing::debug!("command failed: {e:?}");
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
