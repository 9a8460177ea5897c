//! Hook trait for procurement lifecycle events.
//!
//! Hooks observe saves, deletions and new attachments. They never influence
//! the outcome of the operation that emitted the event: errors are logged by
//! the registry and dropped.

use async_trait::async_trait;

use super::types::{ProcurementEvent, ProcurementEventType};

/// Error type for hook operations.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// Hook execution failed with a message.
    #[error("Hook execution failed: {0}")]
    Execution(String),

    /// Hook failed due to a storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generic error with source.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HookError {
    pub fn execution(msg: impl Into<String>) -> Self {
        HookError::Execution(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        HookError::Storage(msg.into())
    }
}

/// Handler for procurement lifecycle events.
///
/// # Example
///
/// ```ignore
/// struct AuditHook;
///
/// #[async_trait]
/// impl ProcurementHook for AuditHook {
///     fn name(&self) -> &str { "audit" }
///     fn event_types(&self) -> &[ProcurementEventType] { &[ProcurementEventType::Deleted] }
///
///     async fn handle(&self, event: &ProcurementEvent) -> Result<(), HookError> {
///         tracing::info!(procurement = %event.procurement, "deleted");
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait ProcurementHook: Send + Sync {
    /// Unique name for this hook (for logging).
    fn name(&self) -> &str;

    /// Event types this hook handles. Empty matches every type.
    fn event_types(&self) -> &[ProcurementEventType] {
        &[]
    }

    /// Handle an event. Runs inline with the save, so keep it short.
    async fn handle(&self, event: &ProcurementEvent) -> Result<(), HookError>;

    /// Check if this hook should handle the given event.
    fn matches(&self, event: &ProcurementEvent) -> bool {
        let event_types = self.event_types();
        event_types.is_empty() || event_types.contains(&event.event_type)
    }
}
