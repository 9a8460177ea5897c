use procurelink_core::model::{
    AttachmentKind, NewAttachment, NewMaintenance, OwnerRef, ProcurementRecord, PurchaseOrder,
    TargetRecord, Vehicle,
};
use procurelink_core::{Category, Target, today_utc};
use procurelink_storage::StorageError;
use tracing::info;

use crate::engine::{AutomationEngine, StepContext};
use crate::error::StepError;
use crate::report::{AutomationReport, StepOutcome};

/// Classifies the record's description and runs the workflow for its
/// category and target. The title is not scanned.
///
/// Maintenance on a vehicle wins over fuel, as both may match the same text.
pub(crate) async fn run(
    engine: &AutomationEngine,
    ctx: &StepContext<'_>,
    report: &mut AutomationReport,
) -> Result<StepOutcome, StepError> {
    let categories = engine.keywords().classify(ctx.record.description());
    report.categories = categories.clone();

    match ctx.target_record {
        TargetRecord::Vehicle(vehicle) if categories.contains(&Category::Maintenance) => {
            match ctx.record {
                ProcurementRecord::PurchaseOrder(order) => {
                    maintenance_workflow(engine, ctx, order, vehicle, report).await
                }
                ProcurementRecord::Rfq(_) => {
                    info!(procurement = %ctx.key, plate = %vehicle.plate, "Maintenance quote requested");
                    Ok(StepOutcome::Completed("maintenance request logged".into()))
                }
            }
        }
        TargetRecord::Vehicle(vehicle) if categories.contains(&Category::Fuel) => {
            info!(procurement = %ctx.key, plate = %vehicle.plate, "Possible fuel purchase");
            Ok(StepOutcome::Completed("fuel purchase logged".into()))
        }
        TargetRecord::Plant(plant) if categories.contains(&Category::Software) => {
            info!(procurement = %ctx.key, plant = %plant.name, "Software purchase for plant");
            Ok(StepOutcome::Completed("software purchase logged".into()))
        }
        _ => Ok(StepOutcome::Completed(if categories.is_empty() {
            "no category detected".to_string()
        } else {
            let names: Vec<_> = categories.iter().map(Category::as_str).collect();
            format!("no workflow for {}", names.join(", "))
        })),
    }
}

/// Creates the maintenance ticket for an order and files the order on the
/// ticket and on the vehicle. Safe to run again for the same order.
async fn maintenance_workflow(
    engine: &AutomationEngine,
    ctx: &StepContext<'_>,
    order: &PurchaseOrder,
    vehicle: &Vehicle,
    report: &mut AutomationReport,
) -> Result<StepOutcome, StepError> {
    let storage = engine.storage();
    let order_id = ctx.key.id;

    let (maintenance, created) = match storage
        .find_maintenance_by_source(vehicle.id, order_id)
        .await?
    {
        Some(existing) => (existing, false),
        None => {
            let record = storage
                .create_maintenance(NewMaintenance {
                    vehicle_id: vehicle.id,
                    description: format!("Manutenzione da ordine {}", order.number),
                    scheduled_date: order.requested_delivery_date.unwrap_or_else(today_utc),
                    cost: order.total_amount.clone(),
                    internal_notes: format!(
                        "Manutenzione generata automaticamente dall'ordine di acquisto {}",
                        order.number
                    ),
                    assigned_to: order.created_by.clone(),
                    source_order_id: Some(order_id),
                })
                .await?;
            info!(
                maintenance_id = record.id,
                plate = %vehicle.plate,
                order = %order.number,
                "Maintenance created from purchase order"
            );
            (record, true)
        }
    };
    report.maintenance_record_id = Some(maintenance.id);

    let supplier = storage
        .get_supplier(order.supplier_id)
        .await?
        .map(|s| s.name)
        .unwrap_or_else(|| format!("#{}", order.supplier_id));
    let title = format!("Ordine di Acquisto {}", order.number);

    attach_once(
        engine,
        NewAttachment::new(OwnerRef::maintenance(maintenance.id), &title)
            .with_description(format!(
                "Ordine di acquisto collegato automaticamente - Fornitore: {supplier}"
            ))
            .with_kind(AttachmentKind::Order)
            .uploaded_by(order.created_by.clone()),
    )
    .await?;
    attach_once(
        engine,
        NewAttachment::new(Target::Vehicle(vehicle.id), &title)
            .with_description(format!(
                "Ordine di acquisto per manutenzione - Fornitore: {supplier} - €{}",
                order.total_amount
            ))
            .with_kind(AttachmentKind::OrderMaintenance)
            .uploaded_by(order.created_by.clone()),
    )
    .await?;

    Ok(StepOutcome::Completed(if created {
        format!("maintenance #{} created", maintenance.id)
    } else {
        format!("maintenance #{} already present", maintenance.id)
    }))
}

/// Adds the attachment unless its owner already has one with the same title.
async fn attach_once(
    engine: &AutomationEngine,
    attachment: NewAttachment,
) -> Result<bool, StorageError> {
    let storage = engine.storage();
    let existing = storage.attachments_for(attachment.owner).await?;
    if existing.iter().any(|a| a.title == attachment.title) {
        return Ok(false);
    }
    let owner = attachment.owner;
    let stored = storage.add_attachment(attachment).await?;
    info!(attachment_id = stored.id, owner = %owner, "Purchase order attached");
    Ok(true)
}
