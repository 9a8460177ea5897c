use procurelink_core::now_utc;

use crate::engine::{AutomationEngine, StepContext};
use crate::error::StepError;
use crate::report::StepOutcome;

/// Marks the target as modified now.
pub(crate) async fn run(
    engine: &AutomationEngine,
    ctx: &StepContext<'_>,
) -> Result<StepOutcome, StepError> {
    let storage = engine.storage();
    let Some(mut target) = storage.get_target(ctx.target).await? else {
        return Ok(StepOutcome::Skipped("target no longer exists".into()));
    };
    let now = now_utc();
    target.touch(now);
    storage.save_target(target).await?;
    Ok(StepOutcome::Completed(format!("{} touched", ctx.target)))
}
