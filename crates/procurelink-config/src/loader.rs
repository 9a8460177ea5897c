use std::path::{Path, PathBuf};

use config::{Config, Environment, File};

use crate::{AppConfig, ConfigError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "procurelink.toml";
pub const ENV_PREFIX: &str = "PROCURELINK";

/// Loads, merges and validates the configuration.
///
/// With an explicit `path` the file must exist. Without one,
/// `procurelink.toml` in the working directory is used when present and
/// defaults apply otherwise.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let mut builder = Config::builder();
    match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::MissingFile(p.to_path_buf()));
            }
            builder = builder.add_source(File::from(p.to_path_buf()));
        }
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                builder = builder.add_source(File::from(default_path));
            }
        }
    }
    // Environment variable overrides, e.g. PROCURELINK__EMAIL__BACKEND=smtp
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .separator("__"),
    );
    let cfg = builder
        .build()
        .map_err(|e| ConfigError::from_source("config", e))?;
    let merged: AppConfig = cfg
        .try_deserialize()
        .map_err(|e| ConfigError::parse(format!("config deserialize error: {e}")))?;
    merged.validate()?;
    tracing::debug!(
        backend = ?merged.email.backend,
        common_targets = merged.registry.common_targets,
        extra_targets = merged.registry.targets.len(),
        "configuration loaded"
    );
    Ok(merged)
}

/// Loads `.env` from the working directory if there is one.
pub fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(dotenvy::Error::Io(ref io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
            Ok(())
        }
        Err(e) => Err(ConfigError::from_source(".env", e)),
    }
}
