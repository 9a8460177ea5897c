//! Assets that procurement records can be linked to.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::target::{Target, TargetKind};

fn default_true() -> bool {
    true
}

/// A company vehicle (automezzo).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: u64,
    pub plate: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub notes: String,
    /// Scanned registration document, front side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_front: Option<String>,
    /// Scanned registration document, back side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_back: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub modified_at: Option<OffsetDateTime>,
}

impl Vehicle {
    pub fn new(id: u64, plate: impl Into<String>) -> Self {
        Self {
            id,
            plate: plate.into(),
            brand: String::new(),
            model: String::new(),
            active: true,
            notes: String::new(),
            registration_front: None,
            registration_back: None,
            modified_at: None,
        }
    }

    pub fn with_make(mut self, brand: impl Into<String>, model: impl Into<String>) -> Self {
        self.brand = brand.into();
        self.model = model.into();
        self
    }

    /// Registration document files, front first.
    pub fn registration_documents(&self) -> impl Iterator<Item = &str> {
        self.registration_front
            .as_deref()
            .into_iter()
            .chain(self.registration_back.as_deref())
    }
}

/// A company site or facility (stabilimento).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub modified_at: Option<OffsetDateTime>,
}

impl Plant {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: String::new(),
            active: true,
            notes: String::new(),
            modified_at: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }
}

/// A stored asset of any target kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TargetRecord {
    Vehicle(Vehicle),
    Plant(Plant),
}

impl TargetRecord {
    pub fn target(&self) -> Target {
        match self {
            TargetRecord::Vehicle(v) => Target::Vehicle(v.id),
            TargetRecord::Plant(p) => Target::Plant(p.id),
        }
    }

    pub fn kind(&self) -> TargetKind {
        self.target().kind()
    }

    pub fn id(&self) -> u64 {
        self.target().id()
    }

    pub fn notes(&self) -> &str {
        match self {
            TargetRecord::Vehicle(v) => &v.notes,
            TargetRecord::Plant(p) => &p.notes,
        }
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        match self {
            TargetRecord::Vehicle(v) => v.notes = notes.into(),
            TargetRecord::Plant(p) => p.notes = notes.into(),
        }
    }

    pub fn modified_at(&self) -> Option<OffsetDateTime> {
        match self {
            TargetRecord::Vehicle(v) => v.modified_at,
            TargetRecord::Plant(p) => p.modified_at,
        }
    }

    pub fn touch(&mut self, at: OffsetDateTime) {
        match self {
            TargetRecord::Vehicle(v) => v.modified_at = Some(at),
            TargetRecord::Plant(p) => p.modified_at = Some(at),
        }
    }

    /// Identifying label: plate for vehicles, name for plants.
    pub fn label(&self) -> &str {
        match self {
            TargetRecord::Vehicle(v) => &v.plate,
            TargetRecord::Plant(p) => &p.name,
        }
    }

    /// Human readable name, e.g. `Automezzo AB123CD`.
    pub fn display_name(&self) -> String {
        match self {
            TargetRecord::Vehicle(v) => format!("Automezzo {}", v.plate),
            TargetRecord::Plant(p) => format!("Stabilimento {}", p.name),
        }
    }

    /// Field-addressable view used by registry filters.
    pub fn fields(&self) -> serde_json::Value {
        let value = match self {
            TargetRecord::Vehicle(v) => serde_json::to_value(v),
            TargetRecord::Plant(p) => serde_json::to_value(p),
        };
        value.unwrap_or(serde_json::Value::Null)
    }
}

impl From<Vehicle> for TargetRecord {
    fn from(vehicle: Vehicle) -> Self {
        TargetRecord::Vehicle(vehicle)
    }
}

impl From<Plant> for TargetRecord {
    fn from(plant: Plant) -> Self {
        TargetRecord::Plant(plant)
    }
}
