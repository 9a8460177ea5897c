//! Registry of asset kinds that procurement records may target.
//!
//! The registry is an explicit value: build one at startup (usually through
//! [`TargetRegistry::with_common_targets`] or from configuration) and hand it
//! to whatever needs it. Nothing here is global.
//!
//! Lookups never fail. An unregistered kind yields `None`, an empty result, or
//! the default widget/automation settings. Only [`TargetRegistry::validate_input`]
//! and [`TargetRegistry::validate_target`] turn an unregistered kind into an
//! error, because they guard the save path.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::TargetRecord;
use crate::target::{Target, TargetInput, TargetKind};

pub const DEFAULT_ICON: &str = "fas fa-cube";

/// Field-equality filters over a target's serialised fields.
pub type Filters = IndexMap<String, serde_json::Value>;

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

fn default_true() -> bool {
    true
}

/// Settings for the target picker widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default)]
    pub search_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,
    /// Applied before caller filters on every query.
    #[serde(default)]
    pub default_filters: Filters,
}

/// Which automation steps run for targets of a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationFlags {
    #[serde(default = "default_true")]
    pub auto_attach_documents: bool,
    #[serde(default = "default_true")]
    pub create_notification: bool,
    #[serde(default = "default_true")]
    pub sync_metadata: bool,
}

impl Default for AutomationFlags {
    fn default() -> Self {
        Self {
            auto_attach_documents: true,
            create_notification: true,
            sync_metadata: true,
        }
    }
}

/// Metadata for one registered target kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetTypeConfig {
    pub kind: TargetKind,
    #[serde(default)]
    pub display_name: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub widget: WidgetConfig,
    #[serde(default)]
    pub automation: AutomationFlags,
}

impl TargetTypeConfig {
    pub fn new(kind: TargetKind, display_name: impl Into<String>) -> Self {
        Self {
            kind,
            display_name: display_name.into(),
            icon: default_icon(),
            description: String::new(),
            widget: WidgetConfig::default(),
            automation: AutomationFlags::default(),
        }
        .normalized()
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_widget(mut self, widget: WidgetConfig) -> Self {
        self.widget = widget;
        self
    }

    pub fn with_automation(mut self, automation: AutomationFlags) -> Self {
        self.automation = automation;
        self
    }

    /// Fills blank display name, icon and description with their defaults.
    fn normalized(mut self) -> Self {
        if self.display_name.trim().is_empty() {
            self.display_name = verbose_name(self.kind).to_string();
        }
        if self.icon.trim().is_empty() {
            self.icon = default_icon();
        }
        if self.description.trim().is_empty() {
            self.description = format!("Gestione {}", self.display_name.to_lowercase());
        }
        self
    }
}

fn verbose_name(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Vehicle => "Automezzo",
        TargetKind::Plant => "Stabilimento",
    }
}

/// Display data for a single resolved target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDisplayInfo {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub icon: String,
    pub kind: TargetKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryStatistics {
    pub total_registered: usize,
    pub kinds: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedTargetType {
    pub display_name: String,
    pub icon: String,
    pub description: String,
    pub widget: WidgetConfig,
    pub automation: AutomationFlags,
}

/// Serialisable snapshot of a registry, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryExport {
    pub registered_types: IndexMap<String, ExportedTargetType>,
}

#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    types: IndexMap<TargetKind, TargetTypeConfig>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the vehicle and plant kinds configured as in production.
    pub fn with_common_targets() -> Self {
        let mut registry = Self::new();
        registry.register(common_target(TargetKind::Vehicle));
        registry.register(common_target(TargetKind::Plant));
        tracing::debug!(count = registry.len(), "registered common procurement targets");
        registry
    }

    pub fn from_types(types: impl IntoIterator<Item = TargetTypeConfig>) -> Self {
        let mut registry = Self::new();
        for config in types {
            registry.register(config);
        }
        registry
    }

    /// Adds a kind, replacing any previous registration of the same kind.
    pub fn register(&mut self, config: TargetTypeConfig) -> Option<TargetTypeConfig> {
        let config = config.normalized();
        tracing::info!(
            kind = %config.kind,
            display_name = %config.display_name,
            "registered procurement target type"
        );
        self.types.insert(config.kind, config)
    }

    pub fn unregister(&mut self, kind: TargetKind) -> Option<TargetTypeConfig> {
        let removed = self.types.shift_remove(&kind);
        if removed.is_some() {
            tracing::info!(kind = %kind, "unregistered procurement target type");
        }
        removed
    }

    pub fn is_registered(&self, kind: TargetKind) -> bool {
        self.types.contains_key(&kind)
    }

    pub fn get_config(&self, kind: TargetKind) -> Option<&TargetTypeConfig> {
        self.types.get(&kind)
    }

    /// Config for an untrusted type string. Unknown strings yield `None`.
    pub fn lookup(&self, target_type: &str) -> Option<&TargetTypeConfig> {
        target_type
            .parse::<TargetKind>()
            .ok()
            .and_then(|kind| self.get_config(kind))
    }

    pub fn registered_kinds(&self) -> Vec<TargetKind> {
        self.types.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn display_name(&self, kind: TargetKind) -> Option<&str> {
        self.get_config(kind).map(|c| c.display_name.as_str())
    }

    pub fn icon(&self, kind: TargetKind) -> &str {
        self.get_config(kind)
            .map(|c| c.icon.as_str())
            .unwrap_or(DEFAULT_ICON)
    }

    /// `(key, display name)` pairs sorted by display name.
    pub fn choices(&self) -> Vec<(&'static str, String)> {
        let mut choices: Vec<_> = self
            .types
            .values()
            .map(|c| (c.kind.as_str(), c.display_name.clone()))
            .collect();
        choices.sort_by(|a, b| a.1.cmp(&b.1));
        choices
    }

    pub fn widget_config(&self, kind: TargetKind) -> WidgetConfig {
        self.get_config(kind)
            .map(|c| c.widget.clone())
            .unwrap_or_default()
    }

    pub fn automation_config(&self, kind: TargetKind) -> AutomationFlags {
        self.get_config(kind)
            .map(|c| c.automation)
            .unwrap_or_default()
    }

    /// Validates a raw `(type, id)` pair and turns it into a typed target.
    pub fn validate_input(&self, input: &TargetInput) -> Result<Option<Target>, ValidationError> {
        let Some((target_type, id)) = input.pair()? else {
            return Ok(None);
        };
        match self.lookup(target_type) {
            Some(config) => Ok(Some(Target::new(config.kind, id))),
            None => Err(self.unregistered(target_type)),
        }
    }

    /// Rejects typed targets whose kind is not registered here.
    pub fn validate_target(&self, target: Option<Target>) -> Result<(), ValidationError> {
        match target {
            Some(target) if !self.is_registered(target.kind()) => {
                Err(self.unregistered(target.kind().as_str()))
            }
            _ => Ok(()),
        }
    }

    fn unregistered(&self, target_type: &str) -> ValidationError {
        ValidationError::unregistered_target_type(
            target_type,
            self.types.keys().map(|k| k.as_str()),
        )
    }

    /// Whether a record passes the kind's default filters and then `filters`.
    ///
    /// Records of unregistered kinds never match.
    pub fn matches(&self, record: &TargetRecord, filters: &Filters) -> bool {
        let Some(config) = self.get_config(record.kind()) else {
            return false;
        };
        let fields = record.fields();
        config
            .widget
            .default_filters
            .iter()
            .chain(filters.iter())
            .all(|(field, expected)| fields.get(field) == Some(expected))
    }

    /// Keeps the records of `kind` that pass [`TargetRegistry::matches`].
    pub fn filter_records(
        &self,
        kind: TargetKind,
        records: impl IntoIterator<Item = TargetRecord>,
        filters: &Filters,
    ) -> Vec<TargetRecord> {
        if !self.is_registered(kind) {
            return Vec::new();
        }
        records
            .into_iter()
            .filter(|r| r.kind() == kind && self.matches(r, filters))
            .collect()
    }

    /// Display data for a stored target, or `None` if its kind is unregistered.
    pub fn display_info(&self, record: &TargetRecord) -> Option<TargetDisplayInfo> {
        let config = self.get_config(record.kind())?;
        let fields = record.fields();
        let name = config
            .widget
            .display_field
            .as_deref()
            .and_then(|field| fields.get(field))
            .and_then(|value| value.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| record.label().to_string());

        Some(TargetDisplayInfo {
            id: record.id(),
            name: if name.is_empty() {
                format!("#{}", record.id())
            } else {
                name
            },
            type_name: config.display_name.clone(),
            icon: config.icon.clone(),
            kind: config.kind,
        })
    }

    pub fn statistics(&self) -> RegistryStatistics {
        RegistryStatistics {
            total_registered: self.types.len(),
            kinds: self.types.keys().map(|k| k.as_str().to_string()).collect(),
        }
    }

    pub fn export_config(&self) -> RegistryExport {
        RegistryExport {
            registered_types: self
                .types
                .values()
                .map(|c| {
                    (
                        c.kind.as_str().to_string(),
                        ExportedTargetType {
                            display_name: c.display_name.clone(),
                            icon: c.icon.clone(),
                            description: c.description.clone(),
                            widget: c.widget.clone(),
                            automation: c.automation,
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetTypeConfig> {
        self.types.values()
    }
}

fn common_target(kind: TargetKind) -> TargetTypeConfig {
    let active_only = Filters::from([("active".to_string(), serde_json::Value::Bool(true))]);
    match kind {
        TargetKind::Vehicle => TargetTypeConfig::new(kind, "Automezzo")
            .with_icon("fas fa-car")
            .with_description("Veicoli e mezzi aziendali")
            .with_widget(WidgetConfig {
                search_fields: vec!["plate".into(), "brand".into(), "model".into()],
                display_field: Some("plate".into()),
                default_filters: active_only,
            }),
        TargetKind::Plant => TargetTypeConfig::new(kind, "Stabilimento")
            .with_icon("fas fa-building")
            .with_description("Stabilimenti e sedi aziendali")
            .with_widget(WidgetConfig {
                search_fields: vec!["name".into(), "address".into()],
                display_field: Some("name".into()),
                default_filters: active_only,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Plant, Vehicle};

    #[test]
    fn test_register_defaults() {
        let mut registry = TargetRegistry::new();
        registry.register(TargetTypeConfig::new(TargetKind::Plant, "Sede"));

        let config = registry.get_config(TargetKind::Plant).unwrap();
        assert_eq!(config.icon, DEFAULT_ICON);
        assert_eq!(config.description, "Gestione sede");
        assert_eq!(config.automation, AutomationFlags::default());
        assert!(config.automation.sync_metadata);
    }

    #[test]
    fn test_blank_display_name_uses_verbose_name() {
        let registry = TargetRegistry::from_types([TargetTypeConfig::new(TargetKind::Vehicle, "")]);
        assert_eq!(registry.display_name(TargetKind::Vehicle), Some("Automezzo"));
    }

    #[test]
    fn test_reregistration_overwrites() {
        let mut registry = TargetRegistry::new();
        assert!(registry
            .register(TargetTypeConfig::new(TargetKind::Vehicle, "First"))
            .is_none());
        let previous = registry.register(TargetTypeConfig::new(TargetKind::Vehicle, "Second"));

        assert_eq!(previous.unwrap().display_name, "First");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.display_name(TargetKind::Vehicle), Some("Second"));
    }

    #[test]
    fn test_unregistered_lookups_are_empty() {
        let registry = TargetRegistry::new();
        assert!(registry.get_config(TargetKind::Plant).is_none());
        assert!(registry.lookup("spaceship").is_none());
        assert!(registry.lookup("plant").is_none());
        assert_eq!(registry.icon(TargetKind::Plant), DEFAULT_ICON);
        assert_eq!(registry.widget_config(TargetKind::Plant), WidgetConfig::default());
        assert_eq!(
            registry.automation_config(TargetKind::Plant),
            AutomationFlags::default()
        );
        assert!(registry
            .filter_records(TargetKind::Plant, [Plant::new(1, "Nord").into()], &Filters::new())
            .is_empty());
    }

    #[test]
    fn test_unregister() {
        let mut registry = TargetRegistry::with_common_targets();
        assert!(registry.unregister(TargetKind::Plant).is_some());
        assert!(registry.unregister(TargetKind::Plant).is_none());
        assert_eq!(registry.registered_kinds(), vec![TargetKind::Vehicle]);
    }

    #[test]
    fn test_choices_sorted_by_display_name() {
        let registry = TargetRegistry::from_types([
            TargetTypeConfig::new(TargetKind::Vehicle, "Zattera"),
            TargetTypeConfig::new(TargetKind::Plant, "Capannone"),
        ]);
        assert_eq!(
            registry.choices(),
            vec![
                ("plant", "Capannone".to_string()),
                ("vehicle", "Zattera".to_string())
            ]
        );
    }

    #[test]
    fn test_validate_input() {
        let registry = TargetRegistry::with_common_targets();

        assert_eq!(
            registry.validate_input(&TargetInput::new("vehicle", 7)).unwrap(),
            Some(Target::Vehicle(7))
        );
        assert_eq!(
            registry
                .validate_input(&TargetInput::new("stabilimenti.stabilimento", 2))
                .unwrap(),
            Some(Target::Plant(2))
        );
        assert_eq!(registry.validate_input(&TargetInput::detached()).unwrap(), None);

        let incomplete = TargetInput {
            target_type: Some("vehicle".into()),
            target_id: None,
        };
        assert!(matches!(
            registry.validate_input(&incomplete),
            Err(ValidationError::IncompleteTargetReference(_))
        ));

        let err = registry
            .validate_input(&TargetInput::new("warehouse", 1))
            .unwrap_err();
        assert!(err.to_string().contains("warehouse"));
        assert!(err.to_string().contains("vehicle, plant"));
    }

    #[test]
    fn test_validate_known_kind_missing_from_registry() {
        let registry = TargetRegistry::from_types([TargetTypeConfig::new(TargetKind::Vehicle, "")]);
        let err = registry
            .validate_input(&TargetInput::new("plant", 3))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnregisteredTargetType {
                target_type: "plant".into(),
                available: "vehicle".into(),
            }
        );
        assert!(registry.validate_target(Some(Target::Plant(3))).is_err());
        assert!(registry.validate_target(Some(Target::Vehicle(3))).is_ok());
        assert!(registry.validate_target(None).is_ok());
    }

    #[test]
    fn test_default_filters_then_caller_filters() {
        let registry = TargetRegistry::with_common_targets();
        let mut retired = Vehicle::new(2, "CC333DD").with_make("Iveco", "Daily");
        retired.active = false;
        let records: Vec<TargetRecord> = vec![
            Vehicle::new(1, "AA111BB").with_make("Fiat", "Ducato").into(),
            retired.into(),
            Vehicle::new(3, "EE555FF").with_make("Iveco", "Daily").into(),
            Plant::new(1, "Nord").into(),
        ];

        let active = registry.filter_records(TargetKind::Vehicle, records.clone(), &Filters::new());
        assert_eq!(active.iter().map(|r| r.id()).collect::<Vec<_>>(), vec![1, 3]);

        let filters = Filters::from([("brand".to_string(), serde_json::json!("Iveco"))]);
        let iveco = registry.filter_records(TargetKind::Vehicle, records, &filters);
        assert_eq!(iveco.iter().map(|r| r.id()).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_display_info() {
        let registry = TargetRegistry::with_common_targets();
        let info = registry
            .display_info(&Vehicle::new(7, "AB123CD").into())
            .unwrap();
        assert_eq!(info.name, "AB123CD");
        assert_eq!(info.type_name, "Automezzo");
        assert_eq!(info.icon, "fas fa-car");

        let empty = TargetRegistry::new();
        assert!(empty.display_info(&Plant::new(1, "Nord").into()).is_none());
    }

    #[test]
    fn test_statistics_and_export() {
        let registry = TargetRegistry::with_common_targets();
        let stats = registry.statistics();
        assert_eq!(stats.total_registered, 2);
        assert_eq!(stats.kinds, vec!["vehicle", "plant"]);

        let export = serde_json::to_value(registry.export_config()).unwrap();
        assert_eq!(
            export["registered_types"]["plant"]["description"],
            "Stabilimenti e sedi aziendali"
        );
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: TargetTypeConfig = serde_json::from_value(serde_json::json!({
            "kind": "plant",
            "display_name": "Sede",
            "automation": {"create_notification": false}
        }))
        .unwrap();
        assert_eq!(config.icon, DEFAULT_ICON);
        assert!(!config.automation.create_notification);
        assert!(config.automation.auto_attach_documents);
    }
}
