//! Lazy resolution of target references against storage.

use std::sync::Arc;

use procurelink_core::model::TargetRecord;
use procurelink_core::{Filters, NO_TARGET_LINKED, Target, TargetDisplayInfo, TargetKind, TargetRegistry};
use procurelink_storage::{DynStorage, StorageError};
use tracing::warn;

/// Turns `Option<Target>` references into stored assets.
///
/// References to unregistered kinds and to ids that no longer exist resolve
/// to `None`.
#[derive(Clone)]
pub struct TargetResolver {
    registry: Arc<TargetRegistry>,
    storage: DynStorage,
}

impl TargetResolver {
    pub fn new(registry: Arc<TargetRegistry>, storage: DynStorage) -> Self {
        Self { registry, storage }
    }

    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    pub fn storage(&self) -> &DynStorage {
        &self.storage
    }

    /// Stored targets of `kind` passing the kind's default filters and then
    /// `filters`. Empty for unregistered kinds.
    pub async fn query(
        &self,
        kind: TargetKind,
        filters: &Filters,
    ) -> Result<Vec<TargetRecord>, StorageError> {
        if !self.registry.is_registered(kind) {
            return Ok(Vec::new());
        }
        let records = self.storage.list_targets(kind).await?;
        Ok(self.registry.filter_records(kind, records, filters))
    }

    pub async fn resolve(&self, target: Option<Target>) -> Result<Option<TargetRecord>, StorageError> {
        match target {
            Some(target) if self.registry.is_registered(target.kind()) => {
                self.storage.get_target(target).await
            }
            _ => Ok(None),
        }
    }

    /// Whether the target is registered and exists.
    pub async fn validate_target(&self, target: Target) -> Result<bool, StorageError> {
        Ok(self.resolve(Some(target)).await?.is_some())
    }

    pub async fn display_info(
        &self,
        target: Target,
    ) -> Result<Option<TargetDisplayInfo>, StorageError> {
        Ok(self
            .resolve(Some(target))
            .await?
            .and_then(|record| self.registry.display_info(&record)))
    }

    /// `Automezzo <plate>`, `Stabilimento <name>` or `no target linked`.
    pub async fn target_display_name(&self, target: Option<Target>) -> String {
        match self.resolve(target).await {
            Ok(Some(record)) => record.display_name(),
            Ok(None) => NO_TARGET_LINKED.to_string(),
            Err(e) => {
                warn!(target = ?target, error = %e, "Failed to resolve target for display");
                NO_TARGET_LINKED.to_string()
            }
        }
    }

    /// Registered display name of the target's kind.
    pub fn target_type_name(&self, target: Option<Target>) -> Option<String> {
        target
            .and_then(|t| self.registry.display_name(t.kind()))
            .map(str::to_string)
    }

    /// Detail page path of the target.
    pub fn target_url(&self, target: Option<Target>) -> Option<String> {
        target
            .filter(|t| self.registry.is_registered(t.kind()))
            .map(|t| t.url())
    }
}

impl std::fmt::Debug for TargetResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetResolver")
            .field("registered", &self.registry.len())
            .field("storage", &self.storage.backend_name())
            .finish()
    }
}
