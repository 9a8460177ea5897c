//! Automation pipeline run when a procurement record gets a new target.
//!
//! ```text
//! save ──► target changed? ──► AutomationEngine::process
//!                                  │
//!        metadata sync ──► document attach ──► notification
//!                 ──► related state ──► category workflow
//!                                  │
//!                                  ▼
//!                           AutomationReport
//! ```
//!
//! Steps are independent. A failing or panicking step is recorded in the
//! report and the next step still runs.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use futures_util::FutureExt;
use procurelink_core::model::{ProcurementKey, ProcurementRecord, TargetRecord};
use procurelink_core::{AutomationFlags, KeywordRules, Target, TargetRegistry};
use procurelink_notifications::{DynMailer, RfqComposer};
use procurelink_storage::DynStorage;
use tracing::{debug, error, info, warn};

use crate::error::StepError;
use crate::report::{
    AutomationReport, AutomationSummary, DryRunReport, StepKind, StepOutcome, StepStatus,
};
use crate::resolver::TargetResolver;
use crate::steps;

/// Everything a step needs about the record being processed.
pub(crate) struct StepContext<'a> {
    pub key: ProcurementKey,
    pub record: &'a ProcurementRecord,
    pub target: Target,
    pub target_record: &'a TargetRecord,
    pub flags: AutomationFlags,
    pub display_name: String,
}

pub struct AutomationEngine {
    resolver: TargetResolver,
    mailer: DynMailer,
    composer: RfqComposer,
    keywords: KeywordRules,
    runs: AtomicUsize,
}

impl AutomationEngine {
    pub fn new(registry: Arc<TargetRegistry>, storage: DynStorage, mailer: DynMailer) -> Self {
        Self {
            resolver: TargetResolver::new(registry, storage),
            mailer,
            composer: RfqComposer::default(),
            keywords: KeywordRules::default(),
            runs: AtomicUsize::new(0),
        }
    }

    pub fn with_keywords(mut self, keywords: KeywordRules) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_composer(mut self, composer: RfqComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn resolver(&self) -> &TargetResolver {
        &self.resolver
    }

    pub(crate) fn storage(&self) -> &DynStorage {
        self.resolver.storage()
    }

    pub(crate) fn mailer(&self) -> &DynMailer {
        &self.mailer
    }

    pub(crate) fn composer(&self) -> &RfqComposer {
        &self.composer
    }

    pub fn keywords(&self) -> &KeywordRules {
        &self.keywords
    }

    /// Number of pipeline runs since construction.
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::Relaxed)
    }

    /// Runs the pipeline for a persisted record with a target.
    ///
    /// Returns `None` when the record has no id or no target.
    pub async fn process(&self, record: &ProcurementRecord) -> Option<AutomationReport> {
        let key = record.key()?;
        let target = record.target()?;
        self.runs.fetch_add(1, Ordering::Relaxed);

        let started = Instant::now();
        let mut report = AutomationReport::new(key, target);
        info!(procurement = %key, target = %target, "Starting procurement automation");

        let target_record = match self.resolver.resolve(Some(target)).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!(procurement = %key, target = %target, "Target not found, automation skipped");
                for step in StepKind::ALL {
                    report.record(step, StepStatus::Skipped, "target not found");
                }
                report.duration_ms = started.elapsed().as_millis() as u64;
                return Some(report);
            }
            Err(e) => {
                error!(procurement = %key, target = %target, error = %e, "Failed to load target");
                for step in StepKind::ALL {
                    report.record(step, StepStatus::Failed, format!("target not loaded: {e}"));
                }
                report.duration_ms = started.elapsed().as_millis() as u64;
                return Some(report);
            }
        };

        let ctx = StepContext {
            key,
            record,
            target,
            target_record: &target_record,
            flags: self.resolver.registry().automation_config(target.kind()),
            display_name: target_record.display_name(),
        };

        for step in StepKind::ALL {
            let result = AssertUnwindSafe(self.run_step(step, &ctx, &mut report))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(StepError::Panicked(panic_message(&panic))));

            match result {
                Ok(StepOutcome::Completed(detail)) => {
                    debug!(procurement = %key, step = %step, %detail, "Automation step completed");
                    report.record(step, StepStatus::Completed, detail);
                }
                Ok(StepOutcome::Skipped(reason)) => {
                    debug!(procurement = %key, step = %step, %reason, "Automation step skipped");
                    report.record(step, StepStatus::Skipped, reason);
                }
                Err(e) => {
                    error!(procurement = %key, step = %step, error = %e, "Automation step failed");
                    report.record(step, StepStatus::Failed, e.to_string());
                }
            }
        }

        report.duration_ms = started.elapsed().as_millis() as u64;
        if report.is_success() {
            info!(
                procurement = %key,
                target = %target,
                attachments_copied = report.attachments_copied,
                emails_sent = report.emails_sent,
                maintenance_record_id = ?report.maintenance_record_id,
                duration_ms = report.duration_ms,
                "Procurement automation completed"
            );
        } else {
            warn!(
                procurement = %key,
                target = %target,
                failed_steps = report.failures().count(),
                duration_ms = report.duration_ms,
                "Procurement automation completed with failures"
            );
        }
        Some(report)
    }

    async fn run_step(
        &self,
        step: StepKind,
        ctx: &StepContext<'_>,
        report: &mut AutomationReport,
    ) -> Result<StepOutcome, StepError> {
        match step {
            StepKind::MetadataSync => steps::metadata::run(self, ctx).await,
            StepKind::DocumentAttach => steps::documents::run(self, ctx, report).await,
            StepKind::Notification => steps::notification::run(self, ctx, report).await,
            StepKind::RelatedState => steps::related_state::run(self, ctx).await,
            StepKind::CategoryWorkflow => steps::workflow::run(self, ctx, report).await,
        }
    }

    /// Automations that would run for `record`.
    pub async fn summary(&self, record: &ProcurementRecord) -> AutomationSummary {
        let target = record.target();
        let target_name = self.resolver.target_display_name(target).await;
        let Some(target) = target else {
            return AutomationSummary {
                target_type: None,
                target_name,
                automation_config: None,
                available_automations: Vec::new(),
            };
        };

        let flags = self.resolver.registry().automation_config(target.kind());
        let mut available = Vec::new();
        if flags.sync_metadata {
            available.push(StepKind::MetadataSync);
        }
        if flags.auto_attach_documents && record.auto_attach_documents() {
            available.push(StepKind::DocumentAttach);
        }
        if flags.create_notification {
            available.push(StepKind::Notification);
        }
        available.push(StepKind::RelatedState);
        available.push(StepKind::CategoryWorkflow);

        AutomationSummary {
            target_type: self.resolver.target_type_name(Some(target)),
            target_name,
            automation_config: Some(flags),
            available_automations: available,
        }
    }

    /// Reports what [`AutomationEngine::process`] would do, without side effects.
    pub async fn dry_run(&self, record: &ProcurementRecord) -> DryRunReport {
        let mut result = DryRunReport {
            categories: self.keywords.classify(record.description()),
            ..Default::default()
        };
        let Some(target) = record.target() else {
            return result;
        };

        result.target = Some(self.resolver.target_display_name(Some(target)).await);
        let flags = self.resolver.registry().automation_config(target.kind());
        result.metadata_sync = flags.sync_metadata;

        if let Some(key) = record.key() {
            if flags.auto_attach_documents && record.auto_attach_documents() {
                match steps::documents::pending_copies(self, key, target).await {
                    Ok(pending) => result.documents_to_attach = pending.len(),
                    Err(e) => result.errors.push(e.to_string()),
                }
            }
        }

        if flags.create_notification {
            result.notifications_to_create = match record {
                ProcurementRecord::Rfq(rfq) => {
                    match steps::notification::reachable_suppliers(self, rfq).await {
                        Ok(suppliers) => suppliers.len(),
                        Err(e) => {
                            result.errors.push(e.to_string());
                            0
                        }
                    }
                }
                ProcurementRecord::PurchaseOrder(_) => 1,
            };
        }
        result
    }
}

impl std::fmt::Debug for AutomationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutomationEngine")
            .field("resolver", &self.resolver)
            .field("mailer", &self.mailer.backend_name())
            .field("runs", &self.runs())
            .finish()
    }
}

fn panic_message(panic: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
