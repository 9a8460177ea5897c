//! Storage trait for procurement records, their targets and side records.

use async_trait::async_trait;
use procurelink_core::model::{
    Attachment, MaintenanceRecord, NewAttachment, NewMaintenance, OwnerRef, ProcurementKey,
    ProcurementKind, ProcurementRecord, Supplier, SupplierQuoteRequest, TargetRecord,
};
use procurelink_core::{Target, TargetKind};

use crate::error::StorageError;
use crate::types::StorageStats;

/// The storage contract every backend implements.
///
/// Reads return `Ok(None)` for missing records; errors are reserved for
/// backend failures and for writes that cannot be applied.
///
/// # Example
///
/// ```ignore
/// use procurelink_storage::{ProcurementStorage, StorageError};
///
/// async fn vehicle_plate(storage: &dyn ProcurementStorage, id: u64) -> Result<String, StorageError> {
///     let record = storage
///         .get_target(Target::Vehicle(id))
///         .await?
///         .ok_or_else(|| StorageError::not_found("vehicle", id))?;
///     Ok(record.label().to_string())
/// }
/// ```
#[async_trait]
pub trait ProcurementStorage: Send + Sync {
    // ==================== Targets ====================

    async fn get_target(&self, target: Target) -> Result<Option<TargetRecord>, StorageError>;

    /// All stored targets of a kind, in id order.
    async fn list_targets(&self, kind: TargetKind) -> Result<Vec<TargetRecord>, StorageError>;

    /// Inserts or replaces a target.
    async fn save_target(&self, record: TargetRecord) -> Result<TargetRecord, StorageError>;

    // ==================== Procurement ====================

    async fn get_procurement(
        &self,
        key: ProcurementKey,
    ) -> Result<Option<ProcurementRecord>, StorageError>;

    /// Inserts or replaces a record.
    ///
    /// Records without an id are assigned the next id of their kind; the
    /// stored record is returned.
    async fn save_procurement(
        &self,
        record: ProcurementRecord,
    ) -> Result<ProcurementRecord, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the record does not exist.
    async fn delete_procurement(&self, key: ProcurementKey) -> Result<(), StorageError>;

    async fn list_procurements(
        &self,
        kind: ProcurementKind,
    ) -> Result<Vec<ProcurementRecord>, StorageError>;

    // ==================== Suppliers ====================

    async fn get_supplier(&self, id: u64) -> Result<Option<Supplier>, StorageError>;

    async fn save_supplier(&self, supplier: Supplier) -> Result<Supplier, StorageError>;

    /// Inserts or replaces the delivery state for `(rfq, supplier)`.
    async fn upsert_quote_request(
        &self,
        request: SupplierQuoteRequest,
    ) -> Result<SupplierQuoteRequest, StorageError>;

    async fn quote_requests(&self, rfq_id: u64) -> Result<Vec<SupplierQuoteRequest>, StorageError>;

    // ==================== Attachments ====================

    /// Attachments owned by a record, oldest first.
    async fn attachments_for(&self, owner: OwnerRef) -> Result<Vec<Attachment>, StorageError>;

    async fn add_attachment(&self, attachment: NewAttachment) -> Result<Attachment, StorageError>;

    // ==================== Maintenance ====================

    async fn create_maintenance(
        &self,
        maintenance: NewMaintenance,
    ) -> Result<MaintenanceRecord, StorageError>;

    async fn get_maintenance(&self, id: u64) -> Result<Option<MaintenanceRecord>, StorageError>;

    /// The maintenance record generated from a purchase order, if any.
    async fn find_maintenance_by_source(
        &self,
        vehicle_id: u64,
        order_id: u64,
    ) -> Result<Option<MaintenanceRecord>, StorageError>;

    async fn maintenance_for_vehicle(
        &self,
        vehicle_id: u64,
    ) -> Result<Vec<MaintenanceRecord>, StorageError>;

    // ==================== Metadata ====================

    async fn stats(&self) -> Result<StorageStats, StorageError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
