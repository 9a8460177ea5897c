use procurelink_core::Target;
use procurelink_core::model::{Attachment, OwnerRef, ProcurementKey};
use procurelink_storage::StorageError;
use tracing::{info, warn};

use crate::engine::{AutomationEngine, StepContext};
use crate::error::StepError;
use crate::report::{AutomationReport, StepOutcome};

/// Attachments of `key` that the target does not hold yet, compared by
/// title and file.
///
/// The check reads the target's attachments once; a concurrent writer adding
/// the same document between this read and the copy is not detected.
pub(crate) async fn pending_copies(
    engine: &AutomationEngine,
    key: ProcurementKey,
    target: Target,
) -> Result<Vec<Attachment>, StorageError> {
    let storage = engine.storage();
    let source = storage.attachments_for(OwnerRef::from(key)).await?;
    if source.is_empty() {
        return Ok(Vec::new());
    }
    let existing = storage.attachments_for(OwnerRef::from(target)).await?;

    let mut pending: Vec<Attachment> = Vec::new();
    for attachment in source {
        let title = attachment.title.as_str();
        let file = attachment.file.as_deref();
        let present = existing.iter().any(|a| a.same_document(title, file))
            || pending.iter().any(|a| a.same_document(title, file));
        if !present {
            pending.push(attachment);
        }
    }
    Ok(pending)
}

/// Copies the record's attachments onto the target.
pub(crate) async fn run(
    engine: &AutomationEngine,
    ctx: &StepContext<'_>,
    report: &mut AutomationReport,
) -> Result<StepOutcome, StepError> {
    if !ctx.flags.auto_attach_documents {
        return Ok(StepOutcome::Skipped(format!(
            "auto_attach_documents disabled for {}",
            ctx.target.kind()
        )));
    }
    if !ctx.record.auto_attach_documents() {
        return Ok(StepOutcome::Skipped(
            "auto_attach_documents disabled on record".into(),
        ));
    }

    let pending = pending_copies(engine, ctx.key, ctx.target).await?;
    if pending.is_empty() {
        return Ok(StepOutcome::Completed("nothing to attach".into()));
    }

    let description = format!(
        "Allegato automatico da {} #{}",
        ctx.key.kind.label(),
        ctx.key.id
    );
    let owner = OwnerRef::from(ctx.target);
    let mut failed = 0;
    for attachment in &pending {
        match engine
            .storage()
            .add_attachment(attachment.copy_for(owner, description.clone()))
            .await
        {
            Ok(_) => report.attachments_copied += 1,
            Err(e) => {
                failed += 1;
                warn!(
                    procurement = %ctx.key,
                    attachment_id = attachment.id,
                    error = %e,
                    "Failed to copy attachment to target"
                );
            }
        }
    }

    if report.attachments_copied > 0 {
        info!(
            procurement = %ctx.key,
            target = %ctx.display_name,
            copied = report.attachments_copied,
            "Copied attachments to target"
        );
    }
    if failed > 0 {
        return Err(StepError::PartialCopy {
            copied: report.attachments_copied,
            failed,
        });
    }
    Ok(StepOutcome::Completed(format!(
        "{} attachment(s) copied",
        report.attachments_copied
    )))
}
