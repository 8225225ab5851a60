use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "retitlectl",
    version,
    about = "Reconcile media filenames against canonical titles"
)]
pub struct Cli {
    /// Force debug-level logging (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub debug: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decide and rename every item listed in a manifest
    Run(RunArgs),
    /// Show how filenames are cleaned and what markers they carry
    Inspect {
        /// Filenames or paths to inspect
        #[arg(required = true)]
        filenames: Vec<String>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// TOML or JSON manifest with `[[items]]` (path, key, title, year, imdb, tmdb)
    #[arg(long)]
    pub manifest: PathBuf,
    /// Engine configuration file (defaults to $RETITLE_CONFIG_PATH, then retitle.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override the audit log location
    #[arg(long)]
    pub audit_log: Option<PathBuf>,
    /// Report decisions without renaming anything
    #[arg(long)]
    pub dry_run: bool,
    /// Accept every confirmation (ASK items and overwrites)
    #[arg(long, short = 'y', conflicts_with = "no_prompt")]
    pub yes: bool,
    /// Decline every confirmation without prompting
    #[arg(long)]
    pub no_prompt: bool,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Load and validate the configuration, printing warnings
    Check {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
