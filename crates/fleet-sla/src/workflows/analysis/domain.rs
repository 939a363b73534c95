use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Protocol identifier assigned to a persisted analysis record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisId(pub Uuid);

impl AnalysisId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contracted maintenance categories, each bound to an SLA threshold in
/// business days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Preventive,
    Corrective,
    PreventiveCorrective,
    Engine,
}

impl ServiceType {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Preventive,
            Self::Corrective,
            Self::PreventiveCorrective,
            Self::Engine,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Preventive => "Preventive",
            Self::Corrective => "Corrective",
            Self::PreventiveCorrective => "Preventive + Corrective",
            Self::Engine => "Engine",
        }
    }

    /// Contractual turnaround allowance in business days.
    pub const fn threshold_days(self) -> u32 {
        match self {
            Self::Preventive => 2,
            Self::Corrective => 3,
            Self::PreventiveCorrective => 5,
            Self::Engine => 15,
        }
    }
}

/// Whether the maintenance turnaround honored the contractual allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaStatus {
    WithinSla,
    OutOfSla,
}

impl SlaStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::WithinSla => "within SLA",
            Self::OutOfSla => "out of SLA",
        }
    }
}

/// Itemized extra-part cost attached to a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartItem {
    pub name: String,
    pub cost: Decimal,
}
