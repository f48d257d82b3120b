use serde::{Deserialize, Serialize};

use super::enums::Gender;

/// Most recent vital signs recorded for a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    /// Blood pressure as "SYS/DIA" (mmHg).
    pub bp: String,
    /// Heart rate (bpm).
    pub hr: u32,
    /// Body temperature (°C).
    pub temp: f64,
    /// Blood oxygen saturation (%).
    pub spo2: u32,
}

/// A patient record as shown in the clinical workspace.
///
/// Records are fixture data: built once at startup and never mutated.
/// `mrn` is unique within a [`crate::store::DataStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    /// Medical Record Number.
    pub mrn: String,
    pub last_visit: String,
    pub diagnosis: Vec<String>,
    pub medications: Vec<String>,
    /// Raw clinical notes, free text.
    pub notes: String,
    pub vitals: Vitals,
}

impl Patient {
    /// Case-insensitive substring match on name or MRN.
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.mrn.to_lowercase().contains(needle)
    }

    /// One-line summary for the workspace header.
    pub fn header_line(&self) -> String {
        format!(
            "Last Visit: {} • BP: {} • HR: {}",
            self.last_visit, self.vitals.bp, self.vitals.hr
        )
    }
}
