use std::sync::Arc;

use anyhow::{Context, Result};
use procurelink_automation::{
    AutomationEngine, DryRunReport, ProcurementService, SaveOutcome, ServiceError,
};
use procurelink_config::AppConfig;
use procurelink_core::events::{HookRegistry, register_builtin_hooks};
use procurelink_core::model::{NewAttachment, ProcurementKey, ProcurementRecord};
use procurelink_db_memory::create_storage;
use procurelink_notifications::{DynMailer, OutboxMailer, RfqComposer, build_mailer};
use procurelink_storage::{DynStorage, StorageError};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::{OutputFormat, ReplayArgs};
use crate::dataset::{Action, Dataset};
use crate::output::{
    print_dry_run_table, print_error, print_json, print_report_table, print_success,
    print_warning,
};

/// Result of one dataset action.
#[derive(Debug, Serialize)]
pub struct ReplayEntry {
    pub index: usize,
    pub action: &'static str,
    pub procurement: Option<ProcurementKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SaveOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<DryRunReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReplayEntry {
    fn new(index: usize, action: &Action) -> Self {
        Self {
            index,
            action: action.name(),
            procurement: None,
            outcome: None,
            dry_run: None,
            error: None,
        }
    }

    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

pub async fn run(config: &AppConfig, args: &ReplayArgs, format: OutputFormat) -> Result<()> {
    let dataset = Dataset::from_path(&args.dataset)?;
    let outbox = Arc::new(OutboxMailer::new());
    let mailer: DynMailer = if args.outbox || args.dry_run {
        outbox.clone()
    } else {
        build_mailer(&config.email).context("Invalid email settings")?
    };

    let entries = execute(config, dataset, mailer, args.dry_run).await?;

    match format {
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Table => {
            for entry in &entries {
                print_entry_table(entry);
            }
            if args.outbox {
                println!("{} email(s) captured in outbox", outbox.len().await);
            }
        }
    }

    let failed = entries.iter().filter(|e| e.failed()).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} action(s) failed", entries.len());
    }
    if matches!(format, OutputFormat::Table) {
        print_success(&format!("Replayed {} action(s)", entries.len()));
    }
    Ok(())
}

/// Seeds a fresh in-memory store from `dataset` and applies its actions in
/// order. A failing action is recorded and the next one still runs.
pub async fn execute(
    config: &AppConfig,
    dataset: Dataset,
    mailer: DynMailer,
    dry_run: bool,
) -> Result<Vec<ReplayEntry>> {
    let storage = create_storage();
    let seeded = dataset.seed(&storage).await?;
    info!(
        targets = seeded.targets,
        suppliers = seeded.suppliers,
        attachments = seeded.attachments,
        "Dataset loaded"
    );

    let service = build_service(config, storage, mailer).await;
    let mut entries = Vec::with_capacity(dataset.actions.len());
    for (index, action) in dataset.actions.into_iter().enumerate() {
        let mut entry = ReplayEntry::new(index, &action);
        let result = if dry_run {
            preview(&service, action, &mut entry).await
        } else {
            apply(&service, action, &mut entry).await
        };
        if let Err(e) = result {
            warn!(index, action = entry.action, error = %e, "Replay action failed");
            entry.error = Some(e.to_string());
        }
        entries.push(entry);
    }
    Ok(entries)
}

/// Wires the registry, engine and hooks described by `config`.
pub async fn build_service(
    config: &AppConfig,
    storage: DynStorage,
    mailer: DynMailer,
) -> ProcurementService {
    let registry = Arc::new(config.registry.build());
    let rules = config.automation.keyword_rules();

    let mut composer = RfqComposer::default();
    if let Some(root) = &config.automation.documents_root {
        composer = composer.with_documents_root(root.clone());
    }
    let engine = AutomationEngine::new(registry, storage, mailer)
        .with_keywords(rules.clone())
        .with_composer(composer);

    let hooks = HookRegistry::with_timeout(config.automation.hook_timeout());
    register_builtin_hooks(&hooks, rules).await;

    let service = ProcurementService::new(Arc::new(engine), Arc::new(hooks));
    if config.automation.enabled {
        service
    } else {
        service.without_automation()
    }
}

async fn apply(
    service: &ProcurementService,
    action: Action,
    entry: &mut ReplayEntry,
) -> Result<(), ServiceError> {
    let outcome = match action {
        Action::Save { record, target } => match target {
            Some(input) => service.save_input(record, &input).await?,
            None => service.save(record).await?,
        },
        Action::Attach {
            procurement,
            target,
            auto_attach,
        } => {
            entry.procurement = Some(procurement);
            match service.registry().validate_input(&target)? {
                Some(target) => service.attach_target(procurement, target, auto_attach).await?,
                None => service.detach_target(procurement).await?,
            }
        }
        Action::Detach { procurement } => {
            entry.procurement = Some(procurement);
            service.detach_target(procurement).await?
        }
        Action::Delete { procurement } => {
            entry.procurement = Some(procurement);
            return service.delete(procurement).await;
        }
        Action::AddAttachment {
            procurement,
            title,
            file,
            description,
        } => {
            entry.procurement = Some(procurement);
            let mut attachment = NewAttachment::new(procurement, title).with_description(description);
            attachment.file = file;
            service.add_attachment(procurement, attachment).await?;
            return Ok(());
        }
    };
    entry.procurement = outcome.record.key();
    entry.outcome = Some(outcome);
    Ok(())
}

/// Dry-run counterpart of [`apply`]: resolves the record an action would save
/// and reports what the pipeline would do. Nothing is written.
async fn preview(
    service: &ProcurementService,
    action: Action,
    entry: &mut ReplayEntry,
) -> Result<(), ServiceError> {
    let record = match action {
        Action::Save { mut record, target } => {
            if let Some(input) = target {
                record.set_target(service.registry().validate_input(&input)?);
            }
            service.registry().validate_target(record.target())?;
            entry.procurement = record.key();
            record
        }
        Action::Attach {
            procurement,
            target,
            auto_attach,
        } => {
            entry.procurement = Some(procurement);
            let mut record = stored(service, procurement).await?;
            record.set_target(service.registry().validate_input(&target)?);
            if let Some(auto_attach) = auto_attach {
                record.set_auto_attach_documents(auto_attach);
            }
            record
        }
        Action::Detach { procurement }
        | Action::Delete { procurement }
        | Action::AddAttachment { procurement, .. } => {
            entry.procurement = Some(procurement);
            return Ok(());
        }
    };
    entry.dry_run = Some(service.engine().dry_run(&record).await);
    Ok(())
}

async fn stored(
    service: &ProcurementService,
    key: ProcurementKey,
) -> Result<ProcurementRecord, ServiceError> {
    service
        .get(key)
        .await?
        .ok_or_else(|| StorageError::not_found(key.kind.as_str(), key.id).into())
}

fn print_entry_table(entry: &ReplayEntry) {
    let label = match entry.procurement {
        Some(key) => format!("#{} {} {}", entry.index, entry.action, key),
        None => format!("#{} {}", entry.index, entry.action),
    };
    if let Some(error) = &entry.error {
        print_error(&format!("{label}: {error}"));
        return;
    }
    if let Some(report) = &entry.dry_run {
        print_dry_run_table(&label, report);
        return;
    }
    match entry.outcome.as_ref().and_then(|o| o.automation.as_ref()) {
        Some(report) => print_report_table(&label, report),
        None if entry.outcome.is_some() => print_warning(&format!("{label}: saved, no automation")),
        None => print_success(&label),
    }
}
