//! Configuration for procurelink.
//!
//! Settings are read once at startup from `procurelink.toml` (or an explicit
//! path) and `PROCURELINK__*` environment variables, e.g.
//! `PROCURELINK__EMAIL__BACKEND=smtp`. Environment values win over the file.

pub mod app;
pub mod loader;
pub mod observability;

use std::path::PathBuf;

pub use app::{AppConfig, AutomationSettings, LoggingConfig, RegistryConfig};
pub use loader::{load_config, load_dotenv, DEFAULT_CONFIG_FILE, ENV_PREFIX};

/// Error types for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Email settings: {0}")]
    Email(#[from] procurelink_notifications::NotificationError),

    #[error("Source error: {source}")]
    Source {
        source_name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ConfigError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn from_source(
        source_name: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Source {
            source_name: source_name.into(),
            source: Box::new(source),
        }
    }
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
