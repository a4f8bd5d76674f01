//! The mutation API over the check-in document.
//!
//! Every mutating operation follows the same shape: load the current
//! document (creating it once if absent), apply the change, stamp
//! `last_updated`, write through the store, and publish to the change
//! broker on success. All operations return `bool`; invalid indices are
//! warn-logged no-ops and nothing in here throws to the caller.

use chrono::Duration;
use serde_json::{Map, Value};

use crate::events::ChangeBroker;
use crate::merge::deep_merge;
use crate::models::{CareEntry, CareKind, CheckInDocument, EditingMode, Pet, PetInfo};
use crate::store::{DocumentStore, StoreOptions};

/// Store key for the live check-in document, matching the cookie name
/// the original wizard used.
pub const CHECKIN_KEY: &str = "boarding_checkin";

/// Default record time-to-live in days (multi-day expiry so a check-in
/// survives the family dropping off mid-form and coming back).
pub const DEFAULT_TTL_DAYS: i64 = 7;

/// Per-top-level-field diff between the live document and the editing
/// snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub user_info: bool,
    pub pets: bool,
    pub grooming: bool,
    pub inventory: bool,
    pub grooming_details: bool,
}

impl ChangeSummary {
    pub fn any(&self) -> bool {
        self.user_info || self.pets || self.grooming || self.inventory || self.grooming_details
    }
}

/// Manager over the single live check-in document.
#[derive(Debug)]
pub struct CheckInManager {
    store: DocumentStore,
    broker: ChangeBroker,
    key: String,
    ttl: Duration,
    options: StoreOptions,
}

impl CheckInManager {
    /// Create a manager over the given store, watching the default key.
    pub fn new(store: DocumentStore) -> Self {
        let mut broker = ChangeBroker::new(store.clone(), CHECKIN_KEY);
        broker.start();
        Self {
            store,
            broker,
            key: CHECKIN_KEY.to_string(),
            ttl: Duration::days(DEFAULT_TTL_DAYS),
            options: StoreOptions::default(),
        }
    }

    pub fn with_ttl_days(mut self, days: i64) -> Self {
        self.ttl = Duration::days(days);
        self
    }

    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    /// The broker mutations publish to; subscribe projections here.
    pub fn broker_mut(&mut self) -> &mut ChangeBroker {
        &mut self.broker
    }

    /// The current document, if one is live.
    pub fn current(&self) -> Option<CheckInDocument> {
        let value = self.store.read(&self.key)?;
        match serde_json::from_value(value) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!("Stored check-in does not parse: {}", e);
                None
            }
        }
    }

    /// Create the document if absent. Idempotent: an existing document
    /// is never altered.
    pub fn create_document(&mut self) -> bool {
        if self.current().is_some() {
            return true;
        }
        self.commit(&CheckInDocument::new())
    }

    /// Load the document, creating it once if missing. A second miss is
    /// fatal for the calling operation rather than retried again.
    fn load_or_create(&mut self) -> Option<CheckInDocument> {
        if let Some(doc) = self.current() {
            return Some(doc);
        }
        if !self.create_document() {
            tracing::warn!("Could not create check-in document; dropping mutation");
            return None;
        }
        self.current()
    }

    fn commit(&mut self, doc: &CheckInDocument) -> bool {
        let value = match serde_json::to_value(doc) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Check-in document does not serialize: {}", e);
                return false;
            }
        };
        if !self.store.can_write(&self.key, &value) {
            tracing::warn!(
                "Check-in document is {} bytes, over the record limit; write rejected",
                self.store.size_of(&self.key, &value)
            );
            return false;
        }
        let ok = self.store.write(&self.key, &value, self.ttl, &self.options);
        if ok {
            self.broker.trigger_check();
        }
        ok
    }

    /// Shared read-modify-write path. The closure returns `false` to
    /// abandon the mutation (e.g. out-of-range index).
    fn mutate(&mut self, apply: impl FnOnce(&mut CheckInDocument) -> bool) -> bool {
        let Some(mut doc) = self.load_or_create() else {
            return false;
        };
        if !apply(&mut doc) {
            return false;
        }
        doc.touch();
        self.commit(&doc)
    }

    // ---- owner ----------------------------------------------------

    /// Merge a partial owner-info patch.
    ///
    /// The form submits emergency contact fields as flat siblings
    /// (`emergencyContactName`, `emergencyContactPhone`); they are
    /// reshaped into the nested `user.emergencyContact` record.
    pub fn update_user_info(&mut self, patch: &Value) -> bool {
        let Some(fields) = patch.as_object() else {
            tracing::warn!("Owner-info patch is not an object; ignored");
            return false;
        };

        let mut info_patch = fields.clone();
        let mut emergency_patch = Map::new();
        if let Some(name) = info_patch.remove("emergencyContactName") {
            emergency_patch.insert("name".to_string(), name);
        }
        if let Some(phone) = info_patch.remove("emergencyContactPhone") {
            emergency_patch.insert("phone".to_string(), phone);
        }

        self.mutate(move |doc| {
            let mut user_value = match serde_json::to_value(&doc.user) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("Owner record does not serialize: {}", e);
                    return false;
                }
            };
            if let Some(info) = user_value.get_mut("info") {
                deep_merge(info, &Value::Object(info_patch));
            }
            if !emergency_patch.is_empty() {
                if let Some(contact) = user_value.get_mut("emergencyContact") {
                    deep_merge(contact, &Value::Object(emergency_patch));
                }
            }
            match serde_json::from_value(user_value) {
                Ok(user) => {
                    doc.user = user;
                    true
                }
                Err(e) => {
                    tracing::warn!("Owner-info patch does not parse: {}", e);
                    false
                }
            }
        })
    }

    // ---- pets -----------------------------------------------------

    /// Append a pet initialized from the default template merged with
    /// the supplied info patch.
    pub fn add_pet(&mut self, info: &Value) -> bool {
        let mut info_value = match serde_json::to_value(PetInfo::default()) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Pet template does not serialize: {}", e);
                return false;
            }
        };
        deep_merge(&mut info_value, info);
        let parsed: PetInfo = match serde_json::from_value(info_value) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Pet info patch does not parse: {}", e);
                return false;
            }
        };
        self.mutate(move |doc| {
            doc.pets.push(Pet::new(parsed));
            true
        })
    }

    /// Deep-merge a patch into the pet at `index`. Out-of-range indices
    /// are no-ops; a pet is never auto-created here.
    pub fn update_pet(&mut self, index: usize, patch: &Value) -> bool {
        let patch = patch.clone();
        self.mutate(move |doc| {
            let Some(pet) = doc.pets.get(index) else {
                tracing::warn!("No pet at index {}; update ignored", index);
                return false;
            };
            let mut pet_value = match serde_json::to_value(pet) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("Pet does not serialize: {}", e);
                    return false;
                }
            };
            deep_merge(&mut pet_value, &patch);
            match serde_json::from_value::<Pet>(pet_value) {
                Ok(mut updated) => {
                    updated.touch();
                    doc.pets[index] = updated;
                    true
                }
                Err(e) => {
                    tracing::warn!("Pet patch does not parse: {}", e);
                    false
                }
            }
        })
    }

    pub fn remove_pet(&mut self, index: usize) -> bool {
        self.mutate(move |doc| {
            if index >= doc.pets.len() {
                tracing::warn!("No pet at index {}; remove ignored", index);
                return false;
            }
            doc.pets.remove(index);
            true
        })
    }

    // ---- feeding & medication ------------------------------------

    pub fn add_care_entry(&mut self, pet_index: usize, kind: CareKind, entry: CareEntry) -> bool {
        self.mutate(move |doc| {
            let Some(pet) = doc.pet_mut(pet_index) else {
                tracing::warn!("No pet at index {}; {} entry ignored", pet_index, kind);
                return false;
            };
            pet.care_entries_mut(kind).push(entry);
            pet.touch();
            true
        })
    }

    pub fn update_care_entry(
        &mut self,
        pet_index: usize,
        kind: CareKind,
        item_index: usize,
        entry: CareEntry,
    ) -> bool {
        self.mutate(move |doc| {
            let Some(pet) = doc.pet_mut(pet_index) else {
                tracing::warn!("No pet at index {}; {} update ignored", pet_index, kind);
                return false;
            };
            let entries = pet.care_entries_mut(kind);
            let Some(slot) = entries.get_mut(item_index) else {
                tracing::warn!("No {} entry at index {}; update ignored", kind, item_index);
                return false;
            };
            *slot = entry;
            pet.touch();
            true
        })
    }

    pub fn remove_care_entry(&mut self, pet_index: usize, kind: CareKind, item_index: usize) -> bool {
        self.mutate(move |doc| {
            let Some(pet) = doc.pet_mut(pet_index) else {
                tracing::warn!("No pet at index {}; {} remove ignored", pet_index, kind);
                return false;
            };
            let entries = pet.care_entries_mut(kind);
            if item_index >= entries.len() {
                tracing::warn!("No {} entry at index {}; remove ignored", kind, item_index);
                return false;
            }
            entries.remove(item_index);
            pet.touch();
            true
        })
    }

    // ---- inventory ------------------------------------------------

    pub fn add_inventory_item(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        self.mutate(move |doc| {
            doc.inventory.push(text);
            true
        })
    }

    pub fn update_inventory_item(&mut self, index: usize, text: impl Into<String>) -> bool {
        let text = text.into();
        self.mutate(move |doc| {
            let Some(slot) = doc.inventory.get_mut(index) else {
                tracing::warn!("No inventory item at index {}; update ignored", index);
                return false;
            };
            *slot = text;
            true
        })
    }

    pub fn remove_inventory_item(&mut self, index: usize) -> bool {
        self.mutate(move |doc| {
            if index >= doc.inventory.len() {
                tracing::warn!("No inventory item at index {}; remove ignored", index);
                return false;
            }
            doc.inventory.remove(index);
            true
        })
    }

    // ---- grooming & flags ----------------------------------------

    /// Merge a grooming patch (`services` map and/or `appointmentDay`).
    pub fn update_grooming(&mut self, patch: &Value) -> bool {
        let patch = patch.clone();
        self.mutate(move |doc| {
            let mut grooming_value = match serde_json::to_value(&doc.grooming) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("Grooming selections do not serialize: {}", e);
                    return false;
                }
            };
            deep_merge(&mut grooming_value, &patch);
            match serde_json::from_value(grooming_value) {
                Ok(grooming) => {
                    doc.grooming = grooming;
                    true
                }
                Err(e) => {
                    tracing::warn!("Grooming patch does not parse: {}", e);
                    false
                }
            }
        })
    }

    pub fn set_grooming_details(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        self.mutate(move |doc| {
            doc.grooming_details = text;
            true
        })
    }

    pub fn set_inventory_complete(&mut self, complete: bool) -> bool {
        self.mutate(move |doc| {
            doc.inventory_complete = complete;
            true
        })
    }

    pub fn set_grooming_acknowledged(&mut self, acknowledged: bool) -> bool {
        self.mutate(move |doc| {
            doc.grooming_acknowledged = acknowledged;
            true
        })
    }

    pub fn set_terms_accepted(&mut self, accepted: bool) -> bool {
        self.mutate(move |doc| {
            doc.terms_accepted = accepted;
            true
        })
    }

    /// Stamp the auto-save timestamp (taken on step transitions).
    pub fn touch_auto_saved(&mut self) -> bool {
        self.mutate(|doc| {
            doc.touch_auto_saved();
            true
        })
    }

    /// Mark the document submitted.
    pub fn mark_completed(&mut self) -> bool {
        self.mutate(|doc| {
            doc.mark_completed();
            true
        })
    }

    // ---- session pre-fill & editing mode -------------------------

    /// One-shot merge of externally supplied pre-fill data (resuming an
    /// edit, or the `check-user` lookup result). The pre-merge editing
    /// mode is re-asserted afterwards so incoming data can never clear
    /// or overwrite it.
    pub fn merge_session_data(&mut self, patch: &Value) -> bool {
        let Some(doc) = self.load_or_create() else {
            return false;
        };
        let editing = doc.editing_mode.clone();

        let mut value = match serde_json::to_value(&doc) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Check-in document does not serialize: {}", e);
                return false;
            }
        };
        deep_merge(&mut value, patch);

        let mut merged_doc: CheckInDocument = match serde_json::from_value(value) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("Session data does not merge into a valid document: {}", e);
                return false;
            }
        };
        merged_doc.editing_mode = editing;
        merged_doc.touch();
        self.commit(&merged_doc)
    }

    /// Enter editing mode for a previously submitted check-in. The
    /// snapshot is deep-copied; later mutations of the live document
    /// cannot reach back into it.
    pub fn enable_editing_mode(&mut self, check_in_id: i64, snapshot: &CheckInDocument) -> bool {
        let snapshot = snapshot.clone();
        self.mutate(move |doc| {
            doc.editing_mode = EditingMode {
                enabled: true,
                check_in_id: Some(check_in_id),
                original_data: Some(Box::new(snapshot)),
            };
            true
        })
    }

    pub fn disable_editing_mode(&mut self) -> bool {
        self.mutate(|doc| {
            doc.editing_mode = EditingMode::default();
            true
        })
    }

    /// Order-sensitive structural comparison of the live document
    /// against the editing snapshot. `false` when not editing.
    pub fn has_data_changed(&self) -> bool {
        let Some(doc) = self.current() else {
            return false;
        };
        if !doc.editing_mode.enabled {
            return false;
        }
        let Some(original) = doc.editing_mode.original_data.as_deref() else {
            return false;
        };
        comparable(&doc) != comparable(original)
    }

    /// Per-field diff against the editing snapshot. All-false when not
    /// in editing mode.
    pub fn change_summary(&self) -> ChangeSummary {
        let Some(doc) = self.current() else {
            return ChangeSummary::default();
        };
        if !doc.editing_mode.enabled {
            return ChangeSummary::default();
        }
        let Some(original) = doc.editing_mode.original_data.as_deref() else {
            return ChangeSummary::default();
        };
        ChangeSummary {
            user_info: doc.user != original.user,
            pets: doc.pets != original.pets,
            grooming: doc.grooming != original.grooming,
            inventory: doc.inventory != original.inventory,
            grooming_details: doc.grooming_details != original.grooming_details,
        }
    }

    /// Restore the document to the editing snapshot, staying in editing
    /// mode so the user can continue revising.
    pub fn reset_to_original(&mut self) -> bool {
        let Some(doc) = self.current() else {
            return false;
        };
        let Some(original) = doc.editing_mode.original_data.clone() else {
            tracing::warn!("No editing snapshot to reset to");
            return false;
        };
        let editing = doc.editing_mode.clone();

        let mut restored = *original;
        restored.editing_mode = editing;
        restored.touch();
        self.commit(&restored)
    }

    /// Drop the live document (after a successful submission).
    pub fn clear_document(&mut self) -> bool {
        let ok = self.store.delete(&self.key);
        if ok {
            self.broker.trigger_check();
        }
        ok
    }
}

/// Document value with volatile fields stripped, for change detection.
fn comparable(doc: &CheckInDocument) -> Value {
    let mut value = serde_json::to_value(doc).unwrap_or(Value::Null);
    if let Some(map) = value.as_object_mut() {
        map.remove("editingMode");
        map.remove("lastUpdated");
        map.remove("autoSavedAt");
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayTime;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_manager() -> (CheckInManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::new(temp_dir.path().to_path_buf());
        (CheckInManager::new(store), temp_dir)
    }

    #[test]
    fn test_create_document_is_idempotent() {
        let (mut manager, _temp) = test_manager();

        assert!(manager.create_document());
        let first = manager.current().unwrap();

        assert!(manager.create_document());
        let second = manager.current().unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first, second);
    }

    #[test]
    fn test_mutation_creates_missing_document() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.current().is_none());

        assert!(manager.add_inventory_item("blue leash"));
        let doc = manager.current().unwrap();
        assert_eq!(doc.inventory, vec!["blue leash".to_string()]);
    }

    #[test]
    fn test_update_user_info_merges_partially() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.update_user_info(&json!({"name": "Jane", "city": "Austin"})));
        assert!(manager.update_user_info(&json!({"phone": "5551234567"})));

        let doc = manager.current().unwrap();
        assert_eq!(doc.user.info.name, "Jane");
        assert_eq!(doc.user.info.city, "Austin");
        assert_eq!(doc.user.info.phone, "5551234567");
    }

    #[test]
    fn test_update_user_info_reshapes_emergency_contact() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.update_user_info(&json!({
            "name": "Jane",
            "emergencyContactName": "Bob",
            "emergencyContactPhone": "5559876543",
        })));

        let doc = manager.current().unwrap();
        assert_eq!(doc.user.info.name, "Jane");
        assert_eq!(doc.user.emergency_contact.name, "Bob");
        assert_eq!(doc.user.emergency_contact.phone, "5559876543");

        // Flat fields must not leak into the info record as-is.
        let value = serde_json::to_value(&doc.user).unwrap();
        assert!(value["info"].get("emergencyContactName").is_none());
    }

    #[test]
    fn test_add_and_update_pet() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.add_pet(&json!({"petName": "Rex", "petType": "dog"})));

        let doc = manager.current().unwrap();
        assert_eq!(doc.pets.len(), 1);
        assert_eq!(doc.pets[0].info.pet_name, "Rex");

        assert!(manager.update_pet(0, &json!({"info": {"petBreed": "husky"}})));
        let doc = manager.current().unwrap();
        assert_eq!(doc.pets[0].info.pet_name, "Rex");
        assert_eq!(doc.pets[0].info.pet_breed, "husky");
    }

    #[test]
    fn test_update_pet_out_of_range_is_noop() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.add_pet(&json!({"petName": "Rex"})));
        let before = manager.current().unwrap();

        assert!(!manager.update_pet(5, &json!({"info": {"petName": "Ghost"}})));
        assert_eq!(manager.current().unwrap(), before);
    }

    #[test]
    fn test_remove_pet() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.add_pet(&json!({"petName": "Rex"})));
        assert!(manager.add_pet(&json!({"petName": "Milo"})));

        assert!(manager.remove_pet(0));
        let doc = manager.current().unwrap();
        assert_eq!(doc.pets.len(), 1);
        assert_eq!(doc.pets[0].info.pet_name, "Milo");

        assert!(!manager.remove_pet(7));
    }

    #[test]
    fn test_care_entries() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.add_pet(&json!({"petName": "Rex"})));

        assert!(manager.add_care_entry(
            0,
            CareKind::Feeding,
            CareEntry::new(DayTime::Morning, "1 cup kibble"),
        ));
        assert!(manager.add_care_entry(
            0,
            CareKind::Medication,
            CareEntry::new(DayTime::Night, "heartworm pill"),
        ));

        let doc = manager.current().unwrap();
        assert_eq!(doc.pets[0].feeding.len(), 1);
        assert_eq!(doc.pets[0].medication.len(), 1);

        assert!(manager.update_care_entry(
            0,
            CareKind::Feeding,
            0,
            CareEntry::new(DayTime::Evening, "half cup"),
        ));
        let doc = manager.current().unwrap();
        assert_eq!(doc.pets[0].feeding[0].day_time, DayTime::Evening);

        assert!(manager.remove_care_entry(0, CareKind::Feeding, 0));
        assert!(manager.current().unwrap().pets[0].feeding.is_empty());
    }

    #[test]
    fn test_care_entry_index_safety() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.add_pet(&json!({"petName": "Rex"})));
        let before = manager.current().unwrap();

        let entry = CareEntry::new(DayTime::Morning, "kibble");
        assert!(!manager.add_care_entry(3, CareKind::Feeding, entry.clone()));
        assert!(!manager.update_care_entry(0, CareKind::Feeding, 0, entry));
        assert!(!manager.remove_care_entry(0, CareKind::Medication, 0));
        assert_eq!(manager.current().unwrap(), before);
    }

    #[test]
    fn test_inventory_items() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.add_inventory_item("blue leash"));
        assert!(manager.add_inventory_item("food bowl"));
        assert!(manager.update_inventory_item(1, "steel food bowl"));
        assert!(manager.remove_inventory_item(0));

        let doc = manager.current().unwrap();
        assert_eq!(doc.inventory, vec!["steel food bowl".to_string()]);

        let before = manager.current().unwrap();
        assert!(!manager.update_inventory_item(9, "nothing"));
        assert!(!manager.remove_inventory_item(9));
        assert_eq!(manager.current().unwrap(), before);
    }

    #[test]
    fn test_flag_setters() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.set_inventory_complete(true));
        assert!(manager.set_grooming_acknowledged(true));
        assert!(manager.set_terms_accepted(true));

        let doc = manager.current().unwrap();
        assert!(doc.inventory_complete);
        assert!(doc.grooming_acknowledged);
        assert!(doc.terms_accepted);
    }

    #[test]
    fn test_update_grooming_merges_services() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.update_grooming(&json!({"services": {"bath": true}})));
        assert!(manager.update_grooming(&json!({
            "services": {"nails": true},
            "appointmentDay": "friday",
        })));

        let doc = manager.current().unwrap();
        assert_eq!(doc.grooming.services.get("bath"), Some(&true));
        assert_eq!(doc.grooming.services.get("nails"), Some(&true));
        assert_eq!(doc.grooming.appointment_day.as_deref(), Some("friday"));
    }

    #[test]
    fn test_oversized_mutation_rejected_without_partial_effect() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.add_inventory_item("blue leash"));
        let before = manager.current().unwrap();

        assert!(!manager.add_inventory_item("x".repeat(8192)));
        assert_eq!(manager.current().unwrap(), before);
    }

    #[test]
    fn test_merge_session_data_preserves_editing_mode() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.update_user_info(&json!({"name": "Jane"})));
        let snapshot = manager.current().unwrap();
        assert!(manager.enable_editing_mode(42, &snapshot));

        // Incoming session data tries to clobber the editing flag.
        assert!(manager.merge_session_data(&json!({
            "user": {"info": {"city": "Dallas"}},
            "editingMode": {"enabled": false, "checkInId": null},
        })));

        let doc = manager.current().unwrap();
        assert_eq!(doc.user.info.city, "Dallas");
        assert!(doc.editing_mode.enabled);
        assert_eq!(doc.editing_mode.check_in_id, Some(42));
        assert!(doc.editing_mode.original_data.is_some());
    }

    #[test]
    fn test_has_data_changed() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.update_user_info(&json!({"name": "Jane"})));

        // Not editing: never reports changes.
        assert!(!manager.has_data_changed());

        let snapshot = manager.current().unwrap();
        assert!(manager.enable_editing_mode(42, &snapshot));
        assert!(!manager.has_data_changed());

        assert!(manager.add_inventory_item("blue leash"));
        assert!(manager.has_data_changed());
    }

    #[test]
    fn test_change_summary_per_field() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.update_user_info(&json!({"name": "Jane"})));
        assert!(manager.add_pet(&json!({"petName": "Rex"})));

        let snapshot = manager.current().unwrap();
        assert!(manager.enable_editing_mode(1, &snapshot));
        assert_eq!(manager.change_summary(), ChangeSummary::default());

        assert!(manager.add_inventory_item("blue leash"));
        assert!(manager.set_grooming_details("short trim"));

        let summary = manager.change_summary();
        assert!(summary.inventory);
        assert!(summary.grooming_details);
        assert!(!summary.user_info);
        assert!(!summary.pets);
        assert!(!summary.grooming);
        assert!(summary.any());
    }

    #[test]
    fn test_reset_to_original_stays_in_editing_mode() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.update_user_info(&json!({"name": "Jane"})));
        let snapshot = manager.current().unwrap();
        assert!(manager.enable_editing_mode(42, &snapshot));

        assert!(manager.update_user_info(&json!({"name": "Janet"})));
        assert!(manager.add_inventory_item("blue leash"));
        assert!(manager.has_data_changed());

        assert!(manager.reset_to_original());
        let doc = manager.current().unwrap();
        assert_eq!(doc.user.info.name, "Jane");
        assert!(doc.inventory.is_empty());
        assert!(doc.editing_mode.enabled);
        assert!(!manager.has_data_changed());
    }

    #[test]
    fn test_snapshot_survives_later_mutations() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.update_user_info(&json!({"name": "Jane"})));
        let snapshot = manager.current().unwrap();
        assert!(manager.enable_editing_mode(42, &snapshot));

        assert!(manager.update_user_info(&json!({"name": "Janet"})));

        let doc = manager.current().unwrap();
        let original = doc.editing_mode.original_data.as_deref().unwrap();
        assert_eq!(original.user.info.name, "Jane");
    }

    #[test]
    fn test_disable_editing_mode() {
        let (mut manager, _temp) = test_manager();
        let snapshot = CheckInDocument::new();
        assert!(manager.enable_editing_mode(42, &snapshot));
        assert!(manager.disable_editing_mode());

        let doc = manager.current().unwrap();
        assert!(!doc.editing_mode.enabled);
        assert!(doc.editing_mode.original_data.is_none());
    }

    #[test]
    fn test_clear_document() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.create_document());
        assert!(manager.clear_document());
        assert!(manager.current().is_none());
        assert!(!manager.clear_document());
    }

    #[test]
    fn test_mutations_publish_to_broker() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let (mut manager, _temp) = test_manager();
        let changes = Rc::new(RefCell::new(0));
        let slot = Rc::clone(&changes);
        manager.broker_mut().subscribe(Box::new(move |_| {
            *slot.borrow_mut() += 1;
            Ok(())
        }));

        assert!(manager.add_inventory_item("blue leash"));
        assert!(manager.set_terms_accepted(true));
        assert_eq!(*changes.borrow(), 2);

        // A rejected mutation publishes nothing.
        assert!(!manager.remove_inventory_item(9));
        assert_eq!(*changes.borrow(), 2);
    }

    #[test]
    fn test_mark_completed_and_auto_save() {
        let (mut manager, _temp) = test_manager();
        assert!(manager.touch_auto_saved());
        assert!(manager.mark_completed());

        let doc = manager.current().unwrap();
        assert!(doc.auto_saved_at.is_some());
        assert!(doc.completed_at.is_some());
        assert_eq!(doc.status, crate::models::CheckInStatus::Completed);
    }
}
