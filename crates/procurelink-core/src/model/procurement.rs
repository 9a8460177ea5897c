//! Procurement records: purchase orders and requests for quotation.

use std::fmt;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::target::Target;

fn default_true() -> bool {
    true
}

/// A supplier from the registry (anagrafica fornitori).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Supplier {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// The email address, if present and not blank.
    pub fn contact_email(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}

/// Kind of procurement record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcurementKind {
    PurchaseOrder,
    Rfq,
}

impl ProcurementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcurementKind::PurchaseOrder => "purchase_order",
            ProcurementKind::Rfq => "rfq",
        }
    }

    /// Label used in generated notes and attachment descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            ProcurementKind::PurchaseOrder => "Ordine di acquisto",
            ProcurementKind::Rfq => "Richiesta preventivo",
        }
    }
}

impl fmt::Display for ProcurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a persisted procurement record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProcurementKey {
    pub kind: ProcurementKind,
    pub id: u64,
}

impl ProcurementKey {
    pub fn new(kind: ProcurementKind, id: u64) -> Self {
        Self { kind, id }
    }

    pub fn purchase_order(id: u64) -> Self {
        Self::new(ProcurementKind::PurchaseOrder, id)
    }

    pub fn rfq(id: u64) -> Self {
        Self::new(ProcurementKind::Rfq, id)
    }
}

impl fmt::Display for ProcurementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Draft,
    Approved,
    Ordered,
    Received,
    Cancelled,
}

/// A purchase order (ordine di acquisto).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// `None` until the order is first persisted.
    #[serde(default)]
    pub id: Option<u64>,
    pub number: String,
    pub supplier_id: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub internal_notes: String,
    pub total_amount: BigDecimal,
    #[serde(default)]
    pub requested_delivery_date: Option<Date>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub target: Option<Target>,
    #[serde(default = "default_true")]
    pub auto_attach_documents: bool,
}

impl PurchaseOrder {
    pub fn new(number: impl Into<String>, supplier_id: u64, total_amount: BigDecimal) -> Self {
        Self {
            id: None,
            number: number.into(),
            supplier_id,
            description: String::new(),
            internal_notes: String::new(),
            total_amount,
            requested_delivery_date: None,
            created_by: None,
            status: OrderStatus::default(),
            target: None,
            auto_attach_documents: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RfqStatus {
    /// BOZZA
    #[default]
    Draft,
    /// INVIATO_FORNITORI
    SentToSuppliers,
    QuotesReceived,
    Approved,
    Closed,
}

/// A request for quotation (richiesta preventivo).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rfq {
    #[serde(default)]
    pub id: Option<u64>,
    pub number: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub internal_notes: String,
    #[serde(default)]
    pub status: RfqStatus,
    #[serde(default)]
    pub supplier_ids: Vec<u64>,
    #[serde(default)]
    pub deadline: Option<Date>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub sent_to_suppliers_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub target: Option<Target>,
    #[serde(default = "default_true")]
    pub auto_attach_documents: bool,
}

impl Rfq {
    pub fn new(number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: None,
            number: number.into(),
            title: title.into(),
            description: String::new(),
            internal_notes: String::new(),
            status: RfqStatus::default(),
            supplier_ids: Vec::new(),
            deadline: None,
            sent_to_suppliers_at: None,
            target: None,
            auto_attach_documents: true,
        }
    }

    pub fn with_suppliers(mut self, supplier_ids: impl IntoIterator<Item = u64>) -> Self {
        self.supplier_ids = supplier_ids.into_iter().collect();
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }
}

/// Per-supplier delivery state of an RFQ email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierQuoteRequest {
    pub rfq_id: u64,
    pub supplier_id: u64,
    pub email_sent: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub sent_at: Option<OffsetDateTime>,
}

/// Any procurement record that can carry a target reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProcurementRecord {
    PurchaseOrder(PurchaseOrder),
    Rfq(Rfq),
}

impl ProcurementRecord {
    pub fn kind(&self) -> ProcurementKind {
        match self {
            ProcurementRecord::PurchaseOrder(_) => ProcurementKind::PurchaseOrder,
            ProcurementRecord::Rfq(_) => ProcurementKind::Rfq,
        }
    }

    pub fn id(&self) -> Option<u64> {
        match self {
            ProcurementRecord::PurchaseOrder(o) => o.id,
            ProcurementRecord::Rfq(r) => r.id,
        }
    }

    pub fn set_id(&mut self, id: u64) {
        match self {
            ProcurementRecord::PurchaseOrder(o) => o.id = Some(id),
            ProcurementRecord::Rfq(r) => r.id = Some(id),
        }
    }

    /// Storage identity; `None` for a record that was never saved.
    pub fn key(&self) -> Option<ProcurementKey> {
        self.id().map(|id| ProcurementKey::new(self.kind(), id))
    }

    pub fn number(&self) -> &str {
        match self {
            ProcurementRecord::PurchaseOrder(o) => &o.number,
            ProcurementRecord::Rfq(r) => &r.number,
        }
    }

    /// Title for RFQs; purchase orders have none.
    pub fn title(&self) -> &str {
        match self {
            ProcurementRecord::PurchaseOrder(_) => "",
            ProcurementRecord::Rfq(r) => &r.title,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            ProcurementRecord::PurchaseOrder(o) => &o.description,
            ProcurementRecord::Rfq(r) => &r.description,
        }
    }

    pub fn internal_notes(&self) -> &str {
        match self {
            ProcurementRecord::PurchaseOrder(o) => &o.internal_notes,
            ProcurementRecord::Rfq(r) => &r.internal_notes,
        }
    }

    pub fn target(&self) -> Option<Target> {
        match self {
            ProcurementRecord::PurchaseOrder(o) => o.target,
            ProcurementRecord::Rfq(r) => r.target,
        }
    }

    pub fn set_target(&mut self, target: Option<Target>) {
        match self {
            ProcurementRecord::PurchaseOrder(o) => o.target = target,
            ProcurementRecord::Rfq(r) => r.target = target,
        }
    }

    pub fn auto_attach_documents(&self) -> bool {
        match self {
            ProcurementRecord::PurchaseOrder(o) => o.auto_attach_documents,
            ProcurementRecord::Rfq(r) => r.auto_attach_documents,
        }
    }

    pub fn set_auto_attach_documents(&mut self, enabled: bool) {
        match self {
            ProcurementRecord::PurchaseOrder(o) => o.auto_attach_documents = enabled,
            ProcurementRecord::Rfq(r) => r.auto_attach_documents = enabled,
        }
    }

    /// e.g. `Ordine di acquisto PO-2024-001`
    pub fn label(&self) -> String {
        format!("{} {}", self.kind().label(), self.number())
    }
}

impl From<PurchaseOrder> for ProcurementRecord {
    fn from(order: PurchaseOrder) -> Self {
        ProcurementRecord::PurchaseOrder(order)
    }
}

impl From<Rfq> for ProcurementRecord {
    fn from(rfq: Rfq) -> Self {
        ProcurementRecord::Rfq(rfq)
    }
}
