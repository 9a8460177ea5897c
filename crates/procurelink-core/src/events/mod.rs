//! Procurement lifecycle events and hooks.
//!
//! The save path builds a [`ProcurementEvent`] after each persisted change and
//! hands it to a [`HookRegistry`]. Hooks run inline in the caller's task:
//!
//! ```text
//! save / delete / add attachment
//!          │
//!          ▼
//!    HookRegistry::dispatch ──► hook 1 ──► hook 2 ──► hook 3
//!                               (timeout + panic guard per hook)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use procurelink_core::events::{default_hooks, ProcurementEvent};
//!
//! let hooks = default_hooks(KeywordRules::default()).await;
//! hooks.dispatch(&ProcurementEvent::deleted(key, &record, "no target linked")).await;
//! ```

pub mod builtin;
pub mod hooks;
pub mod registry;
pub mod types;

pub use builtin::{
    AttachmentAddedHook, CategoryDetectionHook, DeletionCleanupHook, LinkAuditHook, default_hooks,
    register_builtin_hooks,
};
pub use hooks::{HookError, ProcurementHook};
pub use registry::{DispatchSummary, HookRegistry};
pub use types::{ProcurementEvent, ProcurementEventType};
