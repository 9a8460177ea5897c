use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "procurelink")]
#[command(about = "Procurelink CLI: inspect configuration and replay procurement datasets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./procurelink.toml when present)
    #[arg(short, long, global = true, env = "PROCURELINK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Log at debug level, overriding logging.level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load and validate the configuration
    CheckConfig(CheckConfigArgs),
    /// List registered target types
    Registry,
    /// Load a dataset and save its records through the automation pipeline
    Replay(ReplayArgs),
}

#[derive(clap::Args)]
pub struct CheckConfigArgs {
    /// Print the effective configuration as TOML
    #[arg(long)]
    pub show: bool,
    /// Also check that the mail backend is reachable
    #[arg(long)]
    pub probe_mailer: bool,
}

#[derive(clap::Args)]
pub struct ReplayArgs {
    /// Path to the dataset JSON file
    pub dataset: PathBuf,
    /// Report what each save would do without changing anything
    #[arg(long)]
    pub dry_run: bool,
    /// Capture emails in memory instead of using the configured backend
    #[arg(long)]
    pub outbox: bool,
}
