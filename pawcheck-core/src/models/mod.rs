mod day_time;
mod document;
mod pet;

pub use day_time::DayTime;
pub use document::{
    CheckInDocument, CheckInStatus, EditingMode, EmergencyContact, GroomingSelections, OwnerInfo,
    OwnerRecord,
};
pub use pet::{CareEntry, CareKind, HealthInfo, Pet, PetInfo};
