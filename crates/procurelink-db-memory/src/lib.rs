//! In-memory procurement storage backend.
//!
//! This crate provides an in-memory implementation of the `ProcurementStorage`
//! trait from `procurelink-storage`, using papaya lock-free HashMaps for
//! concurrent access.
//!
//! # Example
//!
//! ```ignore
//! use procurelink_db_memory::InMemoryStorage;
//! use procurelink_storage::ProcurementStorage;
//!
//! let storage = InMemoryStorage::new();
//! storage.save_target(Vehicle::new(7, "AB123CD").into()).await?;
//! ```

mod procurement_impl;
pub mod storage;

pub use procurelink_storage::{DynStorage, ProcurementStorage, StorageError};
pub use storage::InMemoryStorage;

/// Creates a new shared in-memory storage instance.
pub fn create_storage() -> DynStorage {
    std::sync::Arc::new(InMemoryStorage::new())
}
