use serde::{Deserialize, Serialize};

/// Record counts per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageStats {
    pub vehicles: usize,
    pub plants: usize,
    pub suppliers: usize,
    pub purchase_orders: usize,
    pub rfqs: usize,
    pub attachments: usize,
    pub maintenance_records: usize,
}

impl StorageStats {
    pub fn targets(&self) -> usize {
        self.vehicles + self.plants
    }

    pub fn procurements(&self) -> usize {
        self.purchase_orders + self.rfqs
    }
}
