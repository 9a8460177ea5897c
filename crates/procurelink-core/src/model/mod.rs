//! Domain records shared by every crate in the workspace.

mod assets;
mod attachment;
mod maintenance;
mod procurement;

pub use assets::{Plant, TargetRecord, Vehicle};
pub use attachment::{
    Attachment, AttachmentKind, AttachmentStatus, NewAttachment, OwnerKind, OwnerRef,
};
pub use maintenance::{MaintenanceRecord, MaintenanceStatus, NewMaintenance};
pub use procurement::{
    OrderStatus, ProcurementKey, ProcurementKind, ProcurementRecord, PurchaseOrder, Rfq,
    RfqStatus, Supplier, SupplierQuoteRequest,
};
