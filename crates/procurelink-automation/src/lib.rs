//! # procurelink-automation
//!
//! Target resolution and the automation pipeline that runs when a purchase
//! order or RFQ is linked to a vehicle or plant.
//!
//! [`ProcurementService`] is the entry point: it validates and stores a
//! record, runs the [`AutomationEngine`] when the target changed, and
//! dispatches lifecycle events to the hook registry.
//!
//! ```ignore
//! let engine = AutomationEngine::new(registry, storage, mailer);
//! let service = ProcurementService::new(Arc::new(engine), Arc::new(hooks));
//! let outcome = service.attach_target(key, Target::Vehicle(7), None).await?;
//! assert!(outcome.automation_ran());
//! ```

mod engine;
mod error;
mod report;
mod resolver;
mod service;
mod steps;

pub use engine::AutomationEngine;
pub use error::{ServiceError, StepError};
pub use report::{
    AutomationReport, AutomationSummary, DryRunReport, StepKind, StepOutcome, StepReport,
    StepStatus,
};
pub use resolver::TargetResolver;
pub use service::{ProcurementService, SaveOutcome};
