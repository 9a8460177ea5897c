//! Hooks installed by default on every procurement service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::hooks::{HookError, ProcurementHook};
use super::registry::HookRegistry;
use super::types::{ProcurementEvent, ProcurementEventType};
use crate::keywords::KeywordRules;

/// Logs every save of a record that carries a target.
pub struct LinkAuditHook;

#[async_trait]
impl ProcurementHook for LinkAuditHook {
    fn name(&self) -> &str {
        "link_audit"
    }

    fn event_types(&self) -> &[ProcurementEventType] {
        &[ProcurementEventType::Created, ProcurementEventType::Updated]
    }

    fn matches(&self, event: &ProcurementEvent) -> bool {
        event.has_target() && self.event_types().contains(&event.event_type)
    }

    async fn handle(&self, event: &ProcurementEvent) -> Result<(), HookError> {
        info!(
            procurement = %event.procurement,
            number = %event.number,
            target = %event.target_display_name,
            created = event.event_type == ProcurementEventType::Created,
            target_changed = event.target_changed,
            "procurement linked to target"
        );
        Ok(())
    }
}

/// Logs the keyword categories detected in a linked record's text.
pub struct CategoryDetectionHook {
    rules: KeywordRules,
}

impl CategoryDetectionHook {
    pub fn new(rules: KeywordRules) -> Self {
        Self { rules }
    }
}

#[async_trait]
impl ProcurementHook for CategoryDetectionHook {
    fn name(&self) -> &str {
        "category_detection"
    }

    fn matches(&self, event: &ProcurementEvent) -> bool {
        event.has_target()
            && matches!(
                event.event_type,
                ProcurementEventType::Created | ProcurementEventType::Updated
            )
    }

    async fn handle(&self, event: &ProcurementEvent) -> Result<(), HookError> {
        let categories = self.rules.classify(&event.text);
        if !categories.is_empty() {
            let names: Vec<_> = categories.iter().map(|c| c.as_str()).collect();
            info!(
                procurement = %event.procurement,
                categories = %names.join(", "),
                "detected procurement categories"
            );
        }
        Ok(())
    }
}

/// Logs deletion of records that were linked to a target.
pub struct DeletionCleanupHook;

#[async_trait]
impl ProcurementHook for DeletionCleanupHook {
    fn name(&self) -> &str {
        "deletion_cleanup"
    }

    fn event_types(&self) -> &[ProcurementEventType] {
        &[ProcurementEventType::Deleted]
    }

    async fn handle(&self, event: &ProcurementEvent) -> Result<(), HookError> {
        if event.has_target() {
            info!(
                procurement = %event.procurement,
                target = %event.target_display_name,
                "deleting procurement linked to target"
            );
        }
        Ok(())
    }
}

/// Logs attachments added to records that carry a target.
pub struct AttachmentAddedHook;

#[async_trait]
impl ProcurementHook for AttachmentAddedHook {
    fn name(&self) -> &str {
        "attachment_added"
    }

    fn event_types(&self) -> &[ProcurementEventType] {
        &[ProcurementEventType::AttachmentAdded]
    }

    async fn handle(&self, event: &ProcurementEvent) -> Result<(), HookError> {
        if event.has_target() {
            info!(
                procurement = %event.procurement,
                attachment = event.attachment_title.as_deref().unwrap_or_default(),
                target = %event.target_display_name,
                "new attachment on linked procurement"
            );
        }
        Ok(())
    }
}

/// A registry holding the four built-in hooks.
pub async fn default_hooks(rules: KeywordRules) -> HookRegistry {
    let registry = HookRegistry::new();
    register_builtin_hooks(&registry, rules).await;
    registry
}

/// Adds the four built-in hooks to an existing registry.
pub async fn register_builtin_hooks(registry: &HookRegistry, rules: KeywordRules) {
    registry.register(Arc::new(LinkAuditHook)).await;
    registry.register(Arc::new(CategoryDetectionHook::new(rules))).await;
    registry.register(Arc::new(DeletionCleanupHook)).await;
    registry.register(Arc::new(AttachmentAddedHook)).await;
}
