//! Lifecycle events emitted by the procurement save path.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::model::{ProcurementKey, ProcurementRecord};
use crate::target::Target;

// ============================================================================
// Procurement Events
// ============================================================================

/// Type of procurement lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcurementEventType {
    /// Record was persisted for the first time
    Created,
    /// Existing record was persisted again
    Updated,
    /// Record was deleted
    Deleted,
    /// An attachment was added to the record
    AttachmentAdded,
}

impl ProcurementEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcurementEventType::Created => "created",
            ProcurementEventType::Updated => "updated",
            ProcurementEventType::Deleted => "deleted",
            ProcurementEventType::AttachmentAdded => "attachment_added",
        }
    }
}

impl std::fmt::Display for ProcurementEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Event describing a change to a procurement record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcurementEvent {
    pub event_type: ProcurementEventType,
    pub procurement: ProcurementKey,
    /// Order or RFQ number
    pub number: String,
    /// Title and description, used for keyword detection
    pub text: String,
    pub target: Option<Target>,
    /// Resolved target name, `no target linked` when absent or dangling
    pub target_display_name: String,
    /// Whether the save changed the target reference
    pub target_changed: bool,
    /// Title of the added attachment (attachment events only)
    pub attachment_title: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl ProcurementEvent {
    fn new(
        event_type: ProcurementEventType,
        key: ProcurementKey,
        record: &ProcurementRecord,
        target_display_name: impl Into<String>,
    ) -> Self {
        Self {
            event_type,
            procurement: key,
            number: record.number().to_string(),
            text: format!("{} {}", record.title(), record.description())
                .trim()
                .to_string(),
            target: record.target(),
            target_display_name: target_display_name.into(),
            target_changed: false,
            attachment_title: None,
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    /// Event for a persisted record.
    pub fn saved(
        key: ProcurementKey,
        record: &ProcurementRecord,
        created: bool,
        target_changed: bool,
        target_display_name: impl Into<String>,
    ) -> Self {
        let event_type = if created {
            ProcurementEventType::Created
        } else {
            ProcurementEventType::Updated
        };
        let mut event = Self::new(event_type, key, record, target_display_name);
        event.target_changed = target_changed;
        event
    }

    pub fn deleted(
        key: ProcurementKey,
        record: &ProcurementRecord,
        target_display_name: impl Into<String>,
    ) -> Self {
        Self::new(ProcurementEventType::Deleted, key, record, target_display_name)
    }

    pub fn attachment_added(
        key: ProcurementKey,
        record: &ProcurementRecord,
        target_display_name: impl Into<String>,
        attachment_title: impl Into<String>,
    ) -> Self {
        let mut event = Self::new(
            ProcurementEventType::AttachmentAdded,
            key,
            record,
            target_display_name,
        );
        event.attachment_title = Some(attachment_title.into());
        event
    }

    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rfq;

    #[test]
    fn test_saved_event_type() {
        let rfq: ProcurementRecord = Rfq::new("RFQ-1", "Gomme").with_target(Target::Vehicle(7)).into();
        let key = ProcurementKey::rfq(1);

        let created = ProcurementEvent::saved(key, &rfq, true, true, "Automezzo AB123CD");
        assert_eq!(created.event_type, ProcurementEventType::Created);
        assert!(created.target_changed);
        assert!(created.has_target());
        assert_eq!(created.text, "Gomme");

        let updated = ProcurementEvent::saved(key, &rfq, false, false, "Automezzo AB123CD");
        assert_eq!(updated.event_type, ProcurementEventType::Updated);
        assert!(!updated.target_changed);
    }

    #[test]
    fn test_attachment_event_carries_title() {
        let rfq: ProcurementRecord = Rfq::new("RFQ-2", "Toner").into();
        let event =
            ProcurementEvent::attachment_added(ProcurementKey::rfq(2), &rfq, "no target linked", "capitolato.pdf");
        assert_eq!(event.event_type.to_string(), "attachment_added");
        assert_eq!(event.attachment_title.as_deref(), Some("capitolato.pdf"));
        assert!(!event.has_target());
    }
}
