use std::path::PathBuf;
use std::time::Duration;

use indexmap::IndexMap;
use procurelink_core::{Category, KeywordRules, TargetRegistry, TargetTypeConfig};
use procurelink_notifications::EmailSettings;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::{ConfigError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Outbound email used by the notification step
    #[serde(default)]
    pub email: EmailSettings,
    /// Registered target types
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub automation: AutomationSettings,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.logging.validate()?;
        self.email.validate()?;
        self.registry.validate()?;
        self.automation.validate()?;
        Ok(())
    }

    /// Effective configuration rendered as TOML. Secrets are not serialised.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::parse(e.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<()> {
        EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| ConfigError::validation(format!("logging.level: {e}")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Pre-register vehicles and plants with their standard settings
    #[serde(default = "default_true")]
    pub common_targets: bool,
    /// Extra or overriding registrations, applied in order
    #[serde(default)]
    pub targets: Vec<TargetTypeConfig>,
}

fn default_true() -> bool {
    true
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            common_targets: true,
            targets: Vec::new(),
        }
    }
}

impl RegistryConfig {
    /// Builds the target registry. A later entry for the same kind replaces
    /// an earlier one, including the common registrations.
    pub fn build(&self) -> TargetRegistry {
        let mut registry = if self.common_targets {
            TargetRegistry::with_common_targets()
        } else {
            TargetRegistry::new()
        };
        for target in &self.targets {
            registry.register(target.clone());
        }
        registry
    }

    fn validate(&self) -> Result<()> {
        if !self.common_targets && self.targets.is_empty() {
            return Err(ConfigError::validation(
                "registry has no target types: enable registry.common_targets or add [[registry.targets]]",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationSettings {
    /// Run the automation pipeline on save
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Per-hook timeout in seconds
    #[serde(default = "default_hook_timeout_secs")]
    pub hook_timeout_secs: u64,
    /// Base directory for relative document paths
    #[serde(default)]
    pub documents_root: Option<PathBuf>,
    /// Keyword lists replacing the defaults of the listed categories
    #[serde(default)]
    pub keywords: IndexMap<Category, Vec<String>>,
}

fn default_hook_timeout_secs() -> u64 {
    30
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            hook_timeout_secs: default_hook_timeout_secs(),
            documents_root: None,
            keywords: IndexMap::new(),
        }
    }
}

impl AutomationSettings {
    pub fn hook_timeout(&self) -> Duration {
        Duration::from_secs(self.hook_timeout_secs)
    }

    /// Default keyword rules with the configured categories replaced.
    pub fn keyword_rules(&self) -> KeywordRules {
        let mut rules = KeywordRules::default();
        for (category, words) in &self.keywords {
            rules.set(*category, words.iter().cloned());
        }
        rules
    }

    fn validate(&self) -> Result<()> {
        if self.hook_timeout_secs == 0 {
            return Err(ConfigError::validation(
                "automation.hook_timeout_secs must be > 0",
            ));
        }
        if let Some((category, _)) = self
            .keywords
            .iter()
            .find(|(_, words)| words.iter().all(|w| w.trim().is_empty()))
        {
            return Err(ConfigError::validation(format!(
                "automation.keywords.{category} must list at least one keyword"
            )));
        }
        Ok(())
    }
}
