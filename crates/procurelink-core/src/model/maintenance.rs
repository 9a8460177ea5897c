use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use time::Date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    #[default]
    Open,
    InProgress,
    Completed,
}

/// A vehicle maintenance ticket (manutenzione).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: u64,
    pub vehicle_id: u64,
    pub description: String,
    pub scheduled_date: Date,
    pub cost: BigDecimal,
    #[serde(default)]
    pub internal_notes: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub status: MaintenanceStatus,
    /// Purchase order this ticket was generated from.
    #[serde(default)]
    pub source_order_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMaintenance {
    pub vehicle_id: u64,
    pub description: String,
    pub scheduled_date: Date,
    pub cost: BigDecimal,
    pub internal_notes: String,
    pub assigned_to: Option<String>,
    pub source_order_id: Option<u64>,
}

impl NewMaintenance {
    pub fn into_record(self, id: u64) -> MaintenanceRecord {
        MaintenanceRecord {
            id,
            vehicle_id: self.vehicle_id,
            description: self.description,
            scheduled_date: self.scheduled_date,
            cost: self.cost,
            internal_notes: self.internal_notes,
            assigned_to: self.assigned_to,
            status: MaintenanceStatus::Open,
            source_order_id: self.source_order_id,
        }
    }
}
