use procurelink_core::model::{ProcurementRecord, Rfq, RfqStatus, Supplier, SupplierQuoteRequest};
use procurelink_core::now_utc;
use procurelink_storage::StorageError;
use tracing::{debug, info, warn};

use crate::engine::{AutomationEngine, StepContext};
use crate::error::StepError;
use crate::report::{AutomationReport, StepOutcome};

/// Linked suppliers that have an email address.
pub(crate) async fn reachable_suppliers(
    engine: &AutomationEngine,
    rfq: &Rfq,
) -> Result<Vec<Supplier>, StorageError> {
    let mut suppliers = Vec::with_capacity(rfq.supplier_ids.len());
    for id in &rfq.supplier_ids {
        match engine.storage().get_supplier(*id).await? {
            Some(supplier) if supplier.contact_email().is_some() => suppliers.push(supplier),
            Some(supplier) => {
                debug!(rfq = %rfq.number, supplier = %supplier.name, "Supplier has no email")
            }
            None => warn!(rfq = %rfq.number, supplier_id = id, "Linked supplier not found"),
        }
    }
    Ok(suppliers)
}

/// Logs the new link and, for RFQs, emails the linked suppliers.
pub(crate) async fn run(
    engine: &AutomationEngine,
    ctx: &StepContext<'_>,
    report: &mut AutomationReport,
) -> Result<StepOutcome, StepError> {
    if !ctx.flags.create_notification {
        return Ok(StepOutcome::Skipped("create_notification disabled".into()));
    }

    info!(
        procurement = %ctx.key,
        label = %ctx.record.label(),
        target = %ctx.display_name,
        "New procurement link"
    );

    match ctx.record {
        ProcurementRecord::Rfq(rfq) => send_rfq_emails(engine, ctx, rfq, report).await,
        ProcurementRecord::PurchaseOrder(_) => Ok(StepOutcome::Completed("link logged".into())),
    }
}

async fn send_rfq_emails(
    engine: &AutomationEngine,
    ctx: &StepContext<'_>,
    rfq: &Rfq,
    report: &mut AutomationReport,
) -> Result<StepOutcome, StepError> {
    if rfq.supplier_ids.is_empty() {
        return Ok(StepOutcome::Completed("no suppliers linked".into()));
    }

    let suppliers = reachable_suppliers(engine, rfq).await?;
    let mut failed = 0;
    for supplier in &suppliers {
        let sent = match engine
            .composer()
            .compose(rfq, supplier, Some(ctx.target_record))
            .await
        {
            Ok(message) => engine.mailer().send(&message).await,
            Err(e) => Err(e),
        };

        match sent {
            Ok(_) => {
                report.emails_sent += 1;
                let request = SupplierQuoteRequest {
                    rfq_id: ctx.key.id,
                    supplier_id: supplier.id,
                    email_sent: true,
                    sent_at: Some(now_utc()),
                };
                if let Err(e) = engine.storage().upsert_quote_request(request).await {
                    warn!(rfq = %rfq.number, supplier_id = supplier.id, error = %e, "Failed to record quote request");
                }
            }
            Err(e) => {
                failed += 1;
                warn!(rfq = %rfq.number, supplier = %supplier.name, error = %e, "Failed to send RFQ email");
            }
        }
    }

    info!(
        rfq = %rfq.number,
        sent = report.emails_sent,
        linked = rfq.supplier_ids.len(),
        "RFQ emails sent"
    );

    if report.emails_sent > 0 {
        mark_sent(engine, ctx).await?;
    } else if failed > 0 {
        return Err(StepError::Delivery {
            attempted: suppliers.len(),
            failed,
        });
    }

    Ok(StepOutcome::Completed(format!(
        "{}/{} supplier email(s) sent",
        report.emails_sent,
        rfq.supplier_ids.len()
    )))
}

/// Stamps the send time and moves a draft RFQ to sent. Written straight to
/// storage so the save path does not run again.
async fn mark_sent(engine: &AutomationEngine, ctx: &StepContext<'_>) -> Result<(), StorageError> {
    let storage = engine.storage();
    let Some(ProcurementRecord::Rfq(mut rfq)) = storage.get_procurement(ctx.key).await? else {
        return Ok(());
    };
    rfq.sent_to_suppliers_at = Some(now_utc());
    if rfq.status == RfqStatus::Draft {
        rfq.status = RfqStatus::SentToSuppliers;
    }
    storage.save_procurement(rfq.into()).await?;
    Ok(())
}
