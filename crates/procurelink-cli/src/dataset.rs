//! Replay datasets: seed data plus an ordered list of actions.
//!
//! ```json
//! {
//!   "vehicles": [{"id": 7, "plate": "AB123CD"}],
//!   "suppliers": [{"id": 4, "name": "Officina Rossi", "email": "officina@rossi.it"}],
//!   "actions": [
//!     {"action": "save",
//!      "record": {"kind": "purchase_order", "number": "PO-1", "supplier_id": 4,
//!                 "total_amount": "250.00", "description": "Tagliando"},
//!      "target": {"target_type": "vehicle", "target_id": 7}}
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use procurelink_core::TargetInput;
use procurelink_core::model::{
    NewAttachment, Plant, ProcurementKey, ProcurementRecord, Supplier, TargetRecord, Vehicle,
};
use procurelink_storage::DynStorage;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub plants: Vec<Plant>,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    /// Attachments stored before any action runs
    #[serde(default)]
    pub attachments: Vec<NewAttachment>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Saves a record, taking the target from `target` when given
    Save {
        record: ProcurementRecord,
        #[serde(default)]
        target: Option<TargetInput>,
    },
    Attach {
        procurement: ProcurementKey,
        target: TargetInput,
        #[serde(default)]
        auto_attach: Option<bool>,
    },
    Detach {
        procurement: ProcurementKey,
    },
    Delete {
        procurement: ProcurementKey,
    },
    AddAttachment {
        procurement: ProcurementKey,
        title: String,
        #[serde(default)]
        file: Option<String>,
        #[serde(default)]
        description: String,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Save { .. } => "save",
            Action::Attach { .. } => "attach",
            Action::Detach { .. } => "detach",
            Action::Delete { .. } => "delete",
            Action::AddAttachment { .. } => "add_attachment",
        }
    }
}

impl Dataset {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid dataset: {}", path.display()))
    }

    /// Writes the seed collections into `storage`.
    pub async fn seed(&self, storage: &DynStorage) -> Result<SeedCounts> {
        for vehicle in &self.vehicles {
            storage
                .save_target(TargetRecord::Vehicle(vehicle.clone()))
                .await?;
        }
        for plant in &self.plants {
            storage.save_target(TargetRecord::Plant(plant.clone())).await?;
        }
        for supplier in &self.suppliers {
            storage.save_supplier(supplier.clone()).await?;
        }
        for attachment in &self.attachments {
            storage
                .add_attachment(attachment.clone())
                .await
                .with_context(|| format!("Failed to store attachment '{}'", attachment.title))?;
        }
        Ok(SeedCounts {
            targets: self.vehicles.len() + self.plants.len(),
            suppliers: self.suppliers.len(),
            attachments: self.attachments.len(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedCounts {
    pub targets: usize,
    pub suppliers: usize,
    pub attachments: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use procurelink_core::Target;
    use procurelink_core::model::ProcurementKind;

    const SAMPLE: &str = r#"{
        "vehicles": [{"id": 7, "plate": "AB123CD"}],
        "plants": [{"id": 2, "name": "Sede Nord"}],
        "suppliers": [{"id": 4, "name": "Officina Rossi", "email": "officina@rossi.it"}],
        "attachments": [
            {"owner": {"kind": "vehicle", "id": 7}, "title": "Libretto", "file": "docs/libretto.pdf"}
        ],
        "actions": [
            {"action": "save",
             "record": {"kind": "rfq", "id": 1, "number": "RFQ-1", "title": "Tagliando",
                        "supplier_ids": [4]},
             "target": {"target_type": "vehicle", "target_id": 7}},
            {"action": "attach", "procurement": {"kind": "rfq", "id": 1},
             "target": {"target_type": "plant", "target_id": 2}, "auto_attach": false},
            {"action": "detach", "procurement": {"kind": "rfq", "id": 1}}
        ]
    }"#;

    #[test]
    fn test_parse_dataset() {
        let dataset: Dataset = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(dataset.vehicles.len(), 1);
        assert_eq!(dataset.attachments[0].owner, Target::Vehicle(7).into());
        assert_eq!(dataset.actions.len(), 3);

        let names: Vec<_> = dataset.actions.iter().map(Action::name).collect();
        assert_eq!(names, vec!["save", "attach", "detach"]);
        match &dataset.actions[1] {
            Action::Attach {
                procurement,
                target,
                auto_attach,
            } => {
                assert_eq!(procurement.kind, ProcurementKind::Rfq);
                assert_eq!(target, &TargetInput::new("plant", 2));
                assert_eq!(*auto_attach, Some(false));
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_missing_dataset_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Dataset::from_path(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read dataset"));
    }
}
