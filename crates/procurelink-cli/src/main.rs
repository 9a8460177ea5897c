mod cli;
mod commands;
mod dataset;
mod output;

use anyhow::Result;
use clap::Parser;
use procurelink_config::observability::{apply_logging_level, init_tracing_with_level};
use procurelink_config::{load_config, load_dotenv};

use cli::{Cli, Commands};
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.format.unwrap_or_default();

    // Warnings from config loading are visible before the configured level applies.
    init_tracing_with_level(if cli.verbose { "debug" } else { "warn" });
    load_dotenv()?;
    let config = load_config(cli.config.as_deref())?;
    if !cli.verbose && std::env::var_os("RUST_LOG").is_none() {
        apply_logging_level(&config.logging.level);
    }

    match &cli.command {
        Commands::CheckConfig(args) => commands::check_config::run(&config, args).await?,
        Commands::Registry => commands::registry::list(&config, format)?,
        Commands::Replay(args) => commands::replay::run(&config, args, format).await?,
    }

    Ok(())
}
