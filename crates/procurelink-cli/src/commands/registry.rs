use anyhow::Result;
use procurelink_config::AppConfig;

use crate::cli::OutputFormat;
use crate::output::{print_json, print_registry_table};

pub fn list(config: &AppConfig, format: OutputFormat) -> Result<()> {
    let registry = config.registry.build();
    match format {
        OutputFormat::Json => print_json(&registry.export_config())?,
        OutputFormat::Table => print_registry_table(&registry),
    }
    Ok(())
}
