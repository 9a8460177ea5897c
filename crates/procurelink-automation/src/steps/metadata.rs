use procurelink_core::Category;
use procurelink_core::model::TargetRecord;
use tracing::info;

use crate::engine::{AutomationEngine, StepContext};
use crate::error::StepError;
use crate::report::StepOutcome;

/// Writes a link note onto a target that has none.
///
/// Existing notes are never overwritten, and nothing is written when the
/// record itself has no internal notes.
pub(crate) async fn run(
    engine: &AutomationEngine,
    ctx: &StepContext<'_>,
) -> Result<StepOutcome, StepError> {
    if !ctx.flags.sync_metadata {
        return Ok(StepOutcome::Skipped("sync_metadata disabled".into()));
    }

    match ctx.target_record {
        TargetRecord::Vehicle(vehicle)
            if engine
                .keywords()
                .matches(Category::Maintenance, ctx.record.description()) =>
        {
            info!(
                procurement = %ctx.key,
                plate = %vehicle.plate,
                "Vehicle linked to a maintenance purchase"
            );
        }
        TargetRecord::Plant(plant) => {
            info!(procurement = %ctx.key, plant = %plant.name, "Plant linked to procurement");
        }
        _ => {}
    }

    if ctx.record.internal_notes().trim().is_empty() {
        return Ok(StepOutcome::Completed("no internal notes to link".into()));
    }

    let storage = engine.storage();
    let Some(mut target) = storage.get_target(ctx.target).await? else {
        return Ok(StepOutcome::Skipped("target no longer exists".into()));
    };
    if !target.notes().trim().is_empty() {
        return Ok(StepOutcome::Completed("target notes kept".into()));
    }

    target.set_notes(format!("Collegato a {} #{}", ctx.key.kind.label(), ctx.key.id));
    storage.save_target(target).await?;
    Ok(StepOutcome::Completed("link note written".into()))
}
