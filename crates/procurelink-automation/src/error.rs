use procurelink_core::ValidationError;
use procurelink_notifications::NotificationError;
use procurelink_storage::StorageError;
use thiserror::Error;

/// Failure of a single pipeline step. Recorded in the report, never returned
/// from the save path.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Notification(#[from] NotificationError),

    #[error("copied {copied} attachment(s), {failed} failed")]
    PartialCopy { copied: usize, failed: usize },

    #[error("no email delivered ({failed} of {attempted} failed)")]
    Delivery { attempted: usize, failed: usize },

    #[error("step panicked: {0}")]
    Panicked(String),
}

/// Errors surfaced by [`crate::ProcurementService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_not_found())
    }

    pub fn category(&self) -> String {
        match self {
            Self::Validation(_) => "validation".to_string(),
            Self::Storage(e) => e.category().to_string(),
        }
    }
}
