//! Procurement targets.
//!
//! A target is the asset a purchase order or RFQ is linked to. The set of
//! target kinds is closed: new kinds are added here and matched exhaustively
//! wherever kind-specific behaviour lives.
//!
//! Untrusted input (form fields, imported datasets) arrives as a
//! [`TargetInput`] pair of optional strings/ids and is turned into an
//! `Option<Target>` by the registry's validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationError};

/// Kind of asset that can be a procurement target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Vehicle,
    Plant,
}

impl TargetKind {
    pub const ALL: [TargetKind; 2] = [TargetKind::Vehicle, TargetKind::Plant];

    /// Stable key used in configuration and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Vehicle => "vehicle",
            TargetKind::Plant => "plant",
        }
    }

    /// Path segment of the asset's detail page.
    pub fn url_segment(&self) -> &'static str {
        match self {
            TargetKind::Vehicle => "automezzi",
            TargetKind::Plant => "stabilimenti",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = CoreError;

    /// Accepts the stable key as well as the legacy `app.model` labels found
    /// in exported data.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vehicle" | "automezzo" | "automezzi.automezzo" => Ok(TargetKind::Vehicle),
            "plant" | "stabilimento" | "stabilimenti.stabilimento" => Ok(TargetKind::Plant),
            _ => Err(CoreError::unknown_target_type(s)),
        }
    }
}

/// A resolved-by-type reference to a single asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum Target {
    Vehicle(u64),
    Plant(u64),
}

impl Target {
    pub fn new(kind: TargetKind, id: u64) -> Self {
        match kind {
            TargetKind::Vehicle => Target::Vehicle(id),
            TargetKind::Plant => Target::Plant(id),
        }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            Target::Vehicle(_) => TargetKind::Vehicle,
            Target::Plant(_) => TargetKind::Plant,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            Target::Vehicle(id) | Target::Plant(id) => *id,
        }
    }

    /// Detail page path, e.g. `/automezzi/7/`.
    pub fn url(&self) -> String {
        format!("/{}/{}/", self.kind().url_segment(), self.id())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind(), self.id())
    }
}

/// Raw `(type, id)` pair as submitted by a form or found in imported data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<u64>,
}

impl TargetInput {
    pub fn new(target_type: impl Into<String>, target_id: u64) -> Self {
        Self {
            target_type: Some(target_type.into()),
            target_id: Some(target_id),
        }
    }

    /// Both fields cleared.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Checks the both-or-neither invariant and returns the pair if set.
    ///
    /// Blank type strings count as absent.
    pub fn pair(&self) -> Result<Option<(&str, u64)>, ValidationError> {
        let target_type = self
            .target_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        match (target_type, self.target_id) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(ValidationError::missing_target_id()),
            (None, Some(_)) => Err(ValidationError::missing_target_type()),
            (Some(t), Some(id)) => Ok(Some((t, id))),
        }
    }
}

impl From<Target> for TargetInput {
    fn from(target: Target) -> Self {
        Self::new(target.kind().as_str(), target.id())
    }
}

impl From<Option<Target>> for TargetInput {
    fn from(target: Option<Target>) -> Self {
        target.map(TargetInput::from).unwrap_or_default()
    }
}
