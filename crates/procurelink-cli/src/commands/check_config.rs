use anyhow::{Context, Result};
use colored::Colorize;
use procurelink_config::AppConfig;
use procurelink_notifications::build_mailer;

use crate::cli::CheckConfigArgs;
use crate::output::print_success;

pub async fn run(config: &AppConfig, args: &CheckConfigArgs) -> Result<()> {
    let registry = config.registry.build();
    let kinds: Vec<_> = registry.registered_kinds().iter().map(|k| k.as_str()).collect();
    let mailer = build_mailer(&config.email).context("Invalid email settings")?;

    print_success("Configuration is valid");
    println!("{}: {}", "Log level".cyan(), config.logging.level);
    println!("{}: {}", "Mail backend".cyan(), mailer.backend_name());
    println!("{}: {}", "Target types".cyan(), kinds.join(", "));
    println!(
        "{}: {}",
        "Automation".cyan(),
        if config.automation.enabled { "enabled" } else { "disabled" }
    );

    if args.probe_mailer {
        mailer
            .test_connection()
            .await
            .context("Mail backend is not reachable")?;
        print_success(&format!("{} backend reachable", mailer.backend_name()));
    }

    if args.show {
        println!();
        println!("{}", config.to_toml()?);
    }
    Ok(())
}
