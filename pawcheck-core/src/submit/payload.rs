//! Request body construction for the five submission steps.
//!
//! Each function drains one slice of the check-in document into the
//! JSON shape the corresponding endpoint expects.

use serde_json::{json, Value};

use crate::models::{CheckInDocument, Pet};

/// Step 1 body: owner info keyed by phone, with the nested emergency
/// contact.
pub fn user_info_body(doc: &CheckInDocument) -> Value {
    json!({
        "user_info": {
            "phone": doc.user.info.phone,
            "name": doc.user.info.name,
            "email": doc.user.info.email,
            "address": doc.user.info.address,
            "city": doc.user.info.city,
            "zip": doc.user.info.zip,
            "emergencyContact": doc.user.emergency_contact,
        }
    })
}

/// Step 2 body: one pet, tied to the backend user id.
pub fn pet_info_body(user_id: i64, pet: &Pet) -> Value {
    json!({
        "user_id": user_id,
        "pet_info": pet.info,
    })
}

/// Step 3 body: health questionnaire plus both care schedules.
pub fn pet_health_body(pet_id: i64, pet: &Pet) -> Value {
    json!({
        "pet_id": pet_id,
        "health_data": pet.health,
        "feeding_data": pet.feeding,
        "medication_data": pet.medication,
    })
}

/// Step 4 body: the check-in record itself. Carries the document's
/// client-generated id so an idempotent backend can dedupe retries.
pub fn checkin_body(pet_id: i64, doc: &CheckInDocument) -> Value {
    json!({
        "pet_id": pet_id,
        "checkin_data": {
            "client_ref": doc.id,
            "date": doc.date,
            "status": doc.status,
        }
    })
}

/// Step 5 body: inventory and grooming extras.
pub fn extra_info_body(checkin_id: i64, doc: &CheckInDocument) -> Value {
    json!({
        "checkin_id": checkin_id,
        "extra_data": {
            "inventory": doc.inventory,
            "grooming": {
                "services": doc.grooming.services,
                "appointmentDay": doc.grooming.appointment_day,
                "details": doc.grooming_details,
            }
        }
    })
}

/// Legacy single-shot body: the whole document.
pub fn full_body(doc: &CheckInDocument) -> Value {
    json!({ "checkin_data": doc })
}
