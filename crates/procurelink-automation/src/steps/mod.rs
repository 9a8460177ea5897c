//! The five pipeline steps. Each returns a [`crate::report::StepOutcome`] or a
//! [`crate::error::StepError`]; none of them aborts the pipeline.

pub(crate) mod documents;
pub(crate) mod metadata;
pub(crate) mod notification;
pub(crate) mod related_state;
pub(crate) mod workflow;
