use std::sync::atomic::{AtomicU64, Ordering};

use papaya::HashMap as PapayaHashMap;
use procurelink_core::model::{
    Attachment, MaintenanceRecord, ProcurementKey, ProcurementKind, ProcurementRecord, Supplier,
    SupplierQuoteRequest, TargetRecord,
};
use procurelink_core::Target;

/// In-memory procurement storage backend using papaya lock-free HashMaps.
///
/// One map per collection plus an id sequence for every collection whose
/// ids the backend assigns. Maps are safe for concurrent use; there is no
/// cross-map isolation, so a check-then-insert spanning two calls can race.
#[derive(Debug)]
pub struct InMemoryStorage {
    pub(crate) targets: PapayaHashMap<Target, TargetRecord>,
    pub(crate) procurements: PapayaHashMap<ProcurementKey, ProcurementRecord>,
    pub(crate) suppliers: PapayaHashMap<u64, Supplier>,
    /// Keyed by `(rfq id, supplier id)`
    pub(crate) quote_requests: PapayaHashMap<(u64, u64), SupplierQuoteRequest>,
    pub(crate) attachments: PapayaHashMap<u64, Attachment>,
    pub(crate) maintenance: PapayaHashMap<u64, MaintenanceRecord>,
    order_seq: AtomicU64,
    rfq_seq: AtomicU64,
    attachment_seq: AtomicU64,
    maintenance_seq: AtomicU64,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            targets: PapayaHashMap::new(),
            procurements: PapayaHashMap::new(),
            suppliers: PapayaHashMap::new(),
            quote_requests: PapayaHashMap::new(),
            attachments: PapayaHashMap::new(),
            maintenance: PapayaHashMap::new(),
            order_seq: AtomicU64::new(1),
            rfq_seq: AtomicU64::new(1),
            attachment_seq: AtomicU64::new(1),
            maintenance_seq: AtomicU64::new(1),
        }
    }

    fn procurement_seq(&self, kind: ProcurementKind) -> &AtomicU64 {
        match kind {
            ProcurementKind::PurchaseOrder => &self.order_seq,
            ProcurementKind::Rfq => &self.rfq_seq,
        }
    }

    /// Id for a new record of `kind`.
    pub(crate) fn next_procurement_id(&self, kind: ProcurementKind) -> u64 {
        self.procurement_seq(kind).fetch_add(1, Ordering::SeqCst)
    }

    /// Moves the sequence past an externally supplied id.
    pub(crate) fn observe_procurement_id(&self, kind: ProcurementKind, id: u64) {
        self.procurement_seq(kind)
            .fetch_max(id.saturating_add(1), Ordering::SeqCst);
    }

    pub(crate) fn next_attachment_id(&self) -> u64 {
        self.attachment_seq.fetch_add(1, Ordering::SeqCst)
    }

    pub(crate) fn next_maintenance_id(&self) -> u64 {
        self.maintenance_seq.fetch_add(1, Ordering::SeqCst)
    }

    /// Total number of stored records across all collections.
    pub fn count(&self) -> usize {
        self.targets.len()
            + self.procurements.len()
            + self.suppliers.len()
            + self.quote_requests.len()
            + self.attachments.len()
            + self.maintenance.len()
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}
