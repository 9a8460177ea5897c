//! Save path for procurement records.
//!
//! `save` validates the target reference, compares it with the stored state,
//! persists, runs the automation pipeline when the target changed to a new
//! value, and finally notifies the lifecycle hooks. Automation and hooks are
//! best effort: once the record is stored, `save` succeeds.

use std::sync::Arc;

use procurelink_core::events::{HookRegistry, ProcurementEvent};
use procurelink_core::model::{Attachment, NewAttachment, ProcurementKey, ProcurementRecord};
use procurelink_core::{Target, TargetInput, TargetRegistry};
use procurelink_storage::{DynStorage, StorageError};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::engine::AutomationEngine;
use crate::error::ServiceError;
use crate::report::AutomationReport;
use crate::resolver::TargetResolver;

/// Result of [`ProcurementService::save`].
#[derive(Debug, Clone, Serialize)]
pub struct SaveOutcome {
    /// The stored record, including changes made by the pipeline
    pub record: ProcurementRecord,
    pub created: bool,
    pub target_changed: bool,
    pub automation: Option<AutomationReport>,
}

impl SaveOutcome {
    pub fn automation_ran(&self) -> bool {
        self.automation.is_some()
    }
}

#[derive(Clone)]
pub struct ProcurementService {
    engine: Arc<AutomationEngine>,
    hooks: Arc<HookRegistry>,
    automation_enabled: bool,
}

impl ProcurementService {
    pub fn new(engine: Arc<AutomationEngine>, hooks: Arc<HookRegistry>) -> Self {
        Self {
            engine,
            hooks,
            automation_enabled: true,
        }
    }

    /// A handle to the same service that never runs the pipeline. Used for
    /// bulk imports.
    pub fn without_automation(&self) -> Self {
        Self {
            automation_enabled: false,
            ..self.clone()
        }
    }

    pub fn automation_enabled(&self) -> bool {
        self.automation_enabled
    }

    pub fn engine(&self) -> &AutomationEngine {
        &self.engine
    }

    pub fn resolver(&self) -> &TargetResolver {
        self.engine.resolver()
    }

    pub fn registry(&self) -> &TargetRegistry {
        self.resolver().registry()
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    fn storage(&self) -> &DynStorage {
        self.resolver().storage()
    }

    pub async fn get(&self, key: ProcurementKey) -> Result<Option<ProcurementRecord>, ServiceError> {
        Ok(self.storage().get_procurement(key).await?)
    }

    /// Validates and persists `record`.
    ///
    /// # Errors
    ///
    /// `ServiceError::Validation` when the target kind is not registered,
    /// `ServiceError::Storage` when the record cannot be read or written.
    /// Once the record is written, `save` returns `Ok`.
    pub async fn save(&self, record: ProcurementRecord) -> Result<SaveOutcome, ServiceError> {
        self.registry().validate_target(record.target())?;

        let previous = match record.key() {
            Some(key) => self.storage().get_procurement(key).await?,
            None => None,
        };
        let created = previous.is_none();
        let target_changed = previous.map(|p| p.target()).unwrap_or(None) != record.target();

        let mut stored = self.storage().save_procurement(record).await?;
        let Some(key) = stored.key() else {
            warn!(
                backend = self.storage().backend_name(),
                "Stored procurement has no id, automation and hooks skipped"
            );
            return Ok(SaveOutcome {
                record: stored,
                created,
                target_changed,
                automation: None,
            });
        };
        debug!(procurement = %key, created, target_changed, "Procurement saved");

        let automation = if self.automation_enabled && target_changed && stored.target().is_some() {
            let report = self.engine.process(&stored).await;
            // the pipeline may have updated the record (RFQ status)
            match self.storage().get_procurement(key).await {
                Ok(Some(current)) => stored = current,
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        procurement = %key,
                        error = %e,
                        "Failed to reload procurement after automation"
                    );
                }
            }
            report
        } else {
            None
        };

        let display_name = self.resolver().target_display_name(stored.target()).await;
        self.hooks
            .dispatch(&ProcurementEvent::saved(
                key,
                &stored,
                created,
                target_changed,
                display_name,
            ))
            .await;

        Ok(SaveOutcome {
            record: stored,
            created,
            target_changed,
            automation,
        })
    }

    /// Saves `record` with the target taken from an untrusted `(type, id)` pair.
    pub async fn save_input(
        &self,
        mut record: ProcurementRecord,
        input: &TargetInput,
    ) -> Result<SaveOutcome, ServiceError> {
        let target = self.registry().validate_input(input)?;
        record.set_target(target);
        self.save(record).await
    }

    /// Links a stored record to `target`, optionally overriding its
    /// auto-attach flag.
    pub async fn attach_target(
        &self,
        key: ProcurementKey,
        target: Target,
        auto_attach: Option<bool>,
    ) -> Result<SaveOutcome, ServiceError> {
        self.registry().validate_target(Some(target))?;
        let mut record = self.load(key).await?;
        record.set_target(Some(target));
        if let Some(auto_attach) = auto_attach {
            record.set_auto_attach_documents(auto_attach);
        }
        info!(procurement = %key, target = %target, "Attaching target");
        self.save(record).await
    }

    /// Clears the target of a stored record. Never runs the pipeline.
    pub async fn detach_target(&self, key: ProcurementKey) -> Result<SaveOutcome, ServiceError> {
        let mut record = self.load(key).await?;
        record.set_target(None);
        info!(procurement = %key, "Detaching target");
        self.save(record).await
    }

    pub async fn delete(&self, key: ProcurementKey) -> Result<(), ServiceError> {
        let record = self.load(key).await?;
        self.storage().delete_procurement(key).await?;
        let display_name = self.resolver().target_display_name(record.target()).await;
        self.hooks
            .dispatch(&ProcurementEvent::deleted(key, &record, display_name))
            .await;
        Ok(())
    }

    /// Stores an attachment owned by the record `key`.
    pub async fn add_attachment(
        &self,
        key: ProcurementKey,
        mut attachment: NewAttachment,
    ) -> Result<Attachment, ServiceError> {
        let record = self.load(key).await?;
        attachment.owner = key.into();
        let stored = self.storage().add_attachment(attachment).await?;

        let display_name = self.resolver().target_display_name(record.target()).await;
        self.hooks
            .dispatch(&ProcurementEvent::attachment_added(
                key,
                &record,
                display_name,
                stored.title.clone(),
            ))
            .await;
        Ok(stored)
    }

    async fn load(&self, key: ProcurementKey) -> Result<ProcurementRecord, ServiceError> {
        self.storage()
            .get_procurement(key)
            .await?
            .ok_or_else(|| StorageError::not_found(key.kind.as_str(), key.id).into())
    }
}

impl std::fmt::Debug for ProcurementService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcurementService")
            .field("engine", &self.engine)
            .field("automation_enabled", &self.automation_enabled)
            .finish()
    }
}
