//! Results of an automation run.

use std::fmt;

use procurelink_core::model::ProcurementKey;
use procurelink_core::{AutomationFlags, Category, Target};
use serde::Serialize;
use time::OffsetDateTime;

/// Pipeline steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    MetadataSync,
    DocumentAttach,
    Notification,
    RelatedState,
    CategoryWorkflow,
}

impl StepKind {
    pub const ALL: [StepKind; 5] = [
        StepKind::MetadataSync,
        StepKind::DocumentAttach,
        StepKind::Notification,
        StepKind::RelatedState,
        StepKind::CategoryWorkflow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::MetadataSync => "metadata_sync",
            StepKind::DocumentAttach => "document_attach",
            StepKind::Notification => "notification",
            StepKind::RelatedState => "related_state",
            StepKind::CategoryWorkflow => "category_workflow",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Skipped,
    Failed,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StepStatus::Completed => "completed",
            StepStatus::Skipped => "skipped",
            StepStatus::Failed => "failed",
        })
    }
}

/// What a step did, as returned by the step itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed(String),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: StepKind,
    pub status: StepStatus,
    pub detail: String,
}

/// Aggregated result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct AutomationReport {
    pub procurement: ProcurementKey,
    pub target: Target,
    pub steps: Vec<StepReport>,
    /// Keyword categories detected in title and description
    pub categories: Vec<Category>,
    pub maintenance_record_id: Option<u64>,
    pub attachments_copied: usize,
    pub emails_sent: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    pub duration_ms: u64,
}

impl AutomationReport {
    pub fn new(procurement: ProcurementKey, target: Target) -> Self {
        Self {
            procurement,
            target,
            steps: Vec::with_capacity(StepKind::ALL.len()),
            categories: Vec::new(),
            maintenance_record_id: None,
            attachments_copied: 0,
            emails_sent: 0,
            started_at: OffsetDateTime::now_utc(),
            duration_ms: 0,
        }
    }

    pub fn record(&mut self, step: StepKind, status: StepStatus, detail: impl Into<String>) {
        self.steps.push(StepReport {
            step,
            status,
            detail: detail.into(),
        });
    }

    pub fn step(&self, step: StepKind) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.step == step)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|s| s.status == StepStatus::Failed)
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Automations that would apply to a record, without running them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutomationSummary {
    pub target_type: Option<String>,
    pub target_name: String,
    pub automation_config: Option<AutomationFlags>,
    pub available_automations: Vec<StepKind>,
}

/// Side effects a run would have.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DryRunReport {
    pub target: Option<String>,
    pub metadata_sync: bool,
    pub documents_to_attach: usize,
    pub notifications_to_create: usize,
    pub categories: Vec<Category>,
    pub errors: Vec<String>,
}
