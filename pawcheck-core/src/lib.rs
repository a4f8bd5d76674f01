//! Pawcheck Core Library
//!
//! Shared types and logic for the pet-boarding check-in wizard: the
//! check-in document model, its persistent store, the mutation manager,
//! change notification, step navigation, and backend submission.

pub mod events;
pub mod manager;
pub mod merge;
pub mod models;
pub mod steps;
pub mod store;
pub mod submit;

pub use events::{ChangeBroker, ListenerId};
pub use manager::{ChangeSummary, CheckInManager, CHECKIN_KEY, DEFAULT_TTL_DAYS};
pub use merge::{deep_merge, merged};
pub use models::{
    CareEntry, CareKind, CheckInDocument, CheckInStatus, DayTime, EditingMode, EmergencyContact,
    GroomingSelections, HealthInfo, OwnerInfo, OwnerRecord, Pet, PetInfo,
};
pub use steps::{StepGate, StepNavigator, Transition, WizardStep, STEP_ORDER};
pub use store::{DocumentStore, SameSite, StoreError, StoreOptions, MAX_RECORD_BYTES};
pub use submit::{
    CheckInBackend, HttpBackend, SubmissionOrchestrator, SubmissionReceipt, SubmitError,
    UserLookup,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
