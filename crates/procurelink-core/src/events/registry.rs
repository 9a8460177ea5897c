//! Hook registry for procurement lifecycle events.
//!
//! Hooks run inline, one after another, in registration order. Each call is
//! bounded by a timeout and guarded against panics; neither an error nor a
//! panic reaches the caller of [`HookRegistry::dispatch`].

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use super::hooks::ProcurementHook;
use super::types::ProcurementEvent;

/// Default timeout for hook execution.
const DEFAULT_HOOK_TIMEOUT: Duration = Duration::from_secs(30);

/// Result counts of one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl DispatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

pub struct HookRegistry {
    hooks: RwLock<Vec<Arc<dyn ProcurementHook>>>,
    timeout: Duration,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_HOOK_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            hooks: RwLock::new(Vec::new()),
            timeout,
        }
    }

    pub async fn register(&self, hook: Arc<dyn ProcurementHook>) {
        let name = hook.name().to_string();
        self.hooks.write().await.push(hook);
        debug!(hook = %name, "Registered procurement hook");
    }

    pub async fn hook_count(&self) -> usize {
        self.hooks.read().await.len()
    }

    pub async fn hook_names(&self) -> Vec<String> {
        self.hooks
            .read()
            .await
            .iter()
            .map(|h| h.name().to_string())
            .collect()
    }

    pub async fn get_matching_hooks(&self, event: &ProcurementEvent) -> Vec<Arc<dyn ProcurementHook>> {
        let hooks = self.hooks.read().await;
        hooks.iter().filter(|h| h.matches(event)).cloned().collect()
    }

    /// Runs every matching hook in turn.
    pub async fn dispatch(&self, event: &ProcurementEvent) -> DispatchSummary {
        let hooks = self.get_matching_hooks(event).await;
        let mut summary = DispatchSummary::default();

        if hooks.is_empty() {
            debug!(event = %event.event_type, "No hooks matched event");
            return summary;
        }

        for hook in hooks {
            let hook_name = hook.name().to_string();

            let result = tokio::time::timeout(self.timeout, async {
                AssertUnwindSafe(hook.handle(event)).catch_unwind().await
            })
            .await;

            match result {
                Ok(Ok(Ok(()))) => {
                    debug!(hook = %hook_name, "Hook executed successfully");
                    summary.succeeded += 1;
                    continue;
                }
                Ok(Ok(Err(e))) => {
                    warn!(
                        hook = %hook_name,
                        procurement = %event.procurement,
                        error = %e,
                        "Hook execution failed"
                    );
                }
                Ok(Err(panic)) => {
                    let panic_msg = if let Some(s) = panic.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    error!(
                        hook = %hook_name,
                        procurement = %event.procurement,
                        panic = %panic_msg,
                        "Hook panicked"
                    );
                }
                Err(_) => {
                    error!(
                        hook = %hook_name,
                        procurement = %event.procurement,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "Hook timed out"
                    );
                }
            }
            summary.failed += 1;
        }

        summary
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
