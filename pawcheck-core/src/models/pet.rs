//! Pet sub-document: identity, health notes, and care schedules.
//!
//! Pets are owned exclusively by one check-in document and are never
//! shared across documents. Their ids are generated locally and replaced
//! by backend-assigned ids after submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::DayTime;

/// Which care schedule an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CareKind {
    Feeding,
    Medication,
}

impl fmt::Display for CareKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CareKind::Feeding => write!(f, "feeding"),
            CareKind::Medication => write!(f, "medication"),
        }
    }
}

impl FromStr for CareKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feeding" => Ok(CareKind::Feeding),
            "medication" | "med" => Ok(CareKind::Medication),
            _ => Err(format!(
                "Invalid care kind '{}'. Valid options: feeding, medication",
                s
            )),
        }
    }
}

/// A single feeding or medication instruction for one time of day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareEntry {
    pub day_time: DayTime,
    pub feeding_med_details: String,
}

impl CareEntry {
    pub fn new(day_time: DayTime, details: impl Into<String>) -> Self {
        Self {
            day_time,
            feeding_med_details: details.into(),
        }
    }
}

impl fmt::Display for CareEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.day_time, self.feeding_med_details)
    }
}

/// Basic identifying information collected on the pet-info step.
///
/// Field names serialize in the form's camelCase so partial updates
/// coming from form input merge directly onto the stored document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PetInfo {
    pub pet_name: String,
    pub pet_color: String,
    pub pet_type: String,
    pub pet_breed: String,
    /// Birth date as entered (YYYY-MM-DD).
    pub pet_age: String,
    pub pet_weight: String,
    pub pet_gender: String,
    pub pet_spayed: bool,
}

impl PetInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            pet_name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, pet_type: impl Into<String>) -> Self {
        self.pet_type = pet_type.into();
        self
    }

    pub fn with_breed(mut self, breed: impl Into<String>) -> Self {
        self.pet_breed = breed.into();
        self
    }
}

/// Health questionnaire answers collected on the health-info step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthInfo {
    pub unusual_health_behavior: bool,
    pub health_behaviors: String,
    pub warnings: String,
}

/// One pet within a check-in document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: Uuid,
    pub info: PetInfo,
    #[serde(default)]
    pub health: HealthInfo,
    #[serde(default)]
    pub feeding: Vec<CareEntry>,
    #[serde(default)]
    pub medication: Vec<CareEntry>,
    pub last_updated: DateTime<Utc>,
}

impl Pet {
    /// Create a pet from its info, with empty health and schedules.
    pub fn new(info: PetInfo) -> Self {
        Self {
            id: Uuid::new_v4(),
            info,
            health: HealthInfo::default(),
            feeding: Vec::new(),
            medication: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    /// The care schedule for the given kind.
    pub fn care_entries(&self, kind: CareKind) -> &Vec<CareEntry> {
        match kind {
            CareKind::Feeding => &self.feeding,
            CareKind::Medication => &self.medication,
        }
    }

    pub fn care_entries_mut(&mut self, kind: CareKind) -> &mut Vec<CareEntry> {
        match kind {
            CareKind::Feeding => &mut self.feeding,
            CareKind::Medication => &mut self.medication,
        }
    }

    /// Stamp the pet as just modified.
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

impl fmt::Display for Pet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info.pet_name)?;
        if !self.info.pet_type.is_empty() {
            write!(f, " ({})", self.info.pet_type)?;
        }
        Ok(())
    }
}
