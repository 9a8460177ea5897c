//! Polymorphic attachments (allegati) owned by any record.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::procurement::{ProcurementKey, ProcurementKind};
use crate::target::Target;

/// Kind of record an attachment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    PurchaseOrder,
    Rfq,
    Vehicle,
    Plant,
    Maintenance,
}

impl OwnerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerKind::PurchaseOrder => "purchase_order",
            OwnerKind::Rfq => "rfq",
            OwnerKind::Vehicle => "vehicle",
            OwnerKind::Plant => "plant",
            OwnerKind::Maintenance => "maintenance",
        }
    }
}

/// `(kind, id)` of the record owning an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerRef {
    pub kind: OwnerKind,
    pub id: u64,
}

impl OwnerRef {
    pub fn new(kind: OwnerKind, id: u64) -> Self {
        Self { kind, id }
    }

    pub fn maintenance(id: u64) -> Self {
        Self::new(OwnerKind::Maintenance, id)
    }
}

impl fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind.as_str(), self.id)
    }
}

impl From<Target> for OwnerRef {
    fn from(target: Target) -> Self {
        match target {
            Target::Vehicle(id) => Self::new(OwnerKind::Vehicle, id),
            Target::Plant(id) => Self::new(OwnerKind::Plant, id),
        }
    }
}

impl From<ProcurementKey> for OwnerRef {
    fn from(key: ProcurementKey) -> Self {
        let kind = match key.kind {
            ProcurementKind::PurchaseOrder => OwnerKind::PurchaseOrder,
            ProcurementKind::Rfq => OwnerKind::Rfq,
        };
        Self::new(kind, key.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AttachmentKind {
    #[default]
    #[serde(rename = "doc")]
    Document,
    #[serde(rename = "doc_ordine")]
    Order,
    #[serde(rename = "doc_ordine_manutenzione")]
    OrderMaintenance,
    #[serde(rename = "nota_interna")]
    Note,
    #[serde(rename = "altro")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentStatus {
    #[default]
    Active,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: u64,
    pub owner: OwnerRef,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Stored file path, absent for notes and links.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub kind: AttachmentKind,
    #[serde(default)]
    pub status: AttachmentStatus,
    #[serde(default)]
    pub uploaded_by: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
}

impl Attachment {
    /// Two attachments are the same document when title and file match.
    pub fn same_document(&self, title: &str, file: Option<&str>) -> bool {
        self.title == title && self.file.as_deref() == file
    }

    /// A copy of this attachment for another owner, keeping title and file.
    pub fn copy_for(&self, owner: OwnerRef, description: impl Into<String>) -> NewAttachment {
        NewAttachment {
            owner,
            title: self.title.clone(),
            description: description.into(),
            file: self.file.clone(),
            kind: self.kind,
            uploaded_by: self.uploaded_by.clone(),
        }
    }
}

/// An attachment that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAttachment {
    pub owner: OwnerRef,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub kind: AttachmentKind,
    #[serde(default)]
    pub uploaded_by: Option<String>,
}

impl NewAttachment {
    pub fn new(owner: impl Into<OwnerRef>, title: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            title: title.into(),
            description: String::new(),
            file: None,
            kind: AttachmentKind::default(),
            uploaded_by: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_kind(mut self, kind: AttachmentKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn uploaded_by(mut self, user: Option<String>) -> Self {
        self.uploaded_by = user;
        self
    }

    pub fn into_attachment(self, id: u64, uploaded_at: OffsetDateTime) -> Attachment {
        Attachment {
            id,
            owner: self.owner,
            title: self.title,
            description: self.description,
            file: self.file,
            kind: self.kind,
            status: AttachmentStatus::Active,
            uploaded_by: self.uploaded_by,
            uploaded_at,
        }
    }
}
