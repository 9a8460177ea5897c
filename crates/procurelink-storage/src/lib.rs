//! # procurelink-storage
//!
//! Storage abstraction layer for procurement records.
//!
//! This crate defines the trait and types that all storage backends must
//! implement. It does not contain any implementations; those live in separate
//! crates (`procurelink-db-memory`).
//!
//! ## Example
//!
//! ```ignore
//! use procurelink_storage::{DynStorage, StorageError};
//!
//! async fn linked_attachments(storage: &DynStorage, target: Target) -> Result<usize, StorageError> {
//!     Ok(storage.attachments_for(target.into()).await?.len())
//! }
//! ```

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, StorageError};
pub use traits::ProcurementStorage;
pub use types::StorageStats;

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared storage trait object.
pub type DynStorage = std::sync::Arc<dyn ProcurementStorage>;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ErrorCategory, StorageError};
    pub use crate::traits::ProcurementStorage;
    pub use crate::types::StorageStats;
    pub use crate::{DynStorage, StorageResult};
}
