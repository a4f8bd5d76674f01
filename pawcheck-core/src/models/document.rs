//! The check-in document: the single root aggregate for one boarding
//! check-in session.
//!
//! Exactly one document is live in the store at a time. It is built up
//! incrementally as the owner moves through the wizard steps and either
//! cleared after a successful submission or left intact for retry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use super::Pet;

/// Lifecycle state of a check-in document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInStatus {
    InProgress,
    Completed,
}

impl fmt::Display for CheckInStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckInStatus::InProgress => write!(f, "in_progress"),
            CheckInStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Owner contact fields collected on the owner-info step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnerInfo {
    pub phone: String,
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub zip: String,
}

/// Emergency contact, reshaped from the form's flat sibling fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
}

/// Owner record: contact info plus emergency contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OwnerRecord {
    pub info: OwnerInfo,
    pub emergency_contact: EmergencyContact,
}

/// Grooming service selections and the requested appointment day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroomingSelections {
    /// Service name -> requested. BTreeMap keeps diffing deterministic.
    pub services: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_day: Option<String>,
}

impl GroomingSelections {
    /// True if any grooming service is requested.
    pub fn any_requested(&self) -> bool {
        self.services.values().any(|v| *v)
    }
}

/// Edit-of-prior-submission state.
///
/// While enabled, `original_data` holds an immutable snapshot taken at
/// edit start. It is used only for diffing and is never touched by the
/// normal mutation paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditingMode {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_data: Option<Box<CheckInDocument>>,
}

/// The root aggregate for one in-progress or completed check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInDocument {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub auto_saved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub status: CheckInStatus,
    #[serde(default)]
    pub user: OwnerRecord,
    #[serde(default)]
    pub pets: Vec<Pet>,
    #[serde(default)]
    pub grooming: GroomingSelections,
    #[serde(default)]
    pub grooming_details: String,
    #[serde(default)]
    pub inventory: Vec<String>,
    #[serde(default)]
    pub inventory_complete: bool,
    #[serde(default)]
    pub grooming_acknowledged: bool,
    #[serde(default)]
    pub terms_accepted: bool,
    #[serde(default)]
    pub editing_mode: EditingMode,
}

impl CheckInDocument {
    /// Create a fresh in-progress document.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            date: now,
            last_updated: now,
            auto_saved_at: None,
            completed_at: None,
            status: CheckInStatus::InProgress,
            user: OwnerRecord::default(),
            pets: Vec::new(),
            grooming: GroomingSelections::default(),
            grooming_details: String::new(),
            inventory: Vec::new(),
            inventory_complete: false,
            grooming_acknowledged: false,
            terms_accepted: false,
            editing_mode: EditingMode::default(),
        }
    }

    /// Stamp the document as just modified.
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }

    /// Stamp the auto-save timestamp (taken on step changes).
    pub fn touch_auto_saved(&mut self) {
        self.auto_saved_at = Some(Utc::now());
    }

    /// Mark the document as submitted.
    pub fn mark_completed(&mut self) {
        self.status = CheckInStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    pub fn is_editing(&self) -> bool {
        self.editing_mode.enabled
    }

    pub fn pet(&self, index: usize) -> Option<&Pet> {
        self.pets.get(index)
    }

    pub fn pet_mut(&mut self, index: usize) -> Option<&mut Pet> {
        self.pets.get_mut(index)
    }
}

impl Default for CheckInDocument {
    fn default() -> Self {
        Self::new()
    }
}
