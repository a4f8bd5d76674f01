//! Sequencing of the five dependent submission calls.
//!
//! The calls cannot be parallelized: each one consumes an identifier
//! returned by the previous one. The first failure aborts the remaining
//! steps; already-submitted steps are not rolled back (the document's
//! client-generated id travels with step 4 so an idempotent backend can
//! dedupe a retry).

use crate::models::CheckInDocument;

use super::client::{CheckInBackend, UserLookup};
use super::error::SubmitError;
use super::payload;

/// Identifiers returned by a completed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub user_id: i64,
    pub pet_ids: Vec<i64>,
    pub checkin_id: i64,
}

/// Drains a check-in document to the backend step by step.
#[derive(Debug)]
pub struct SubmissionOrchestrator<B: CheckInBackend> {
    backend: B,
}

impl<B: CheckInBackend> SubmissionOrchestrator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Run the five-step submission: user, then per-pet info and
    /// health, then the check-in record anchored to the first pet, then
    /// the extras.
    pub async fn submit(&self, doc: &CheckInDocument) -> Result<SubmissionReceipt, SubmitError> {
        if doc.pets.is_empty() {
            return Err(SubmitError::EmptyDocument);
        }

        let user_id = self
            .backend
            .submit_user_info(&payload::user_info_body(doc))
            .await?;
        tracing::info!("Submitted owner info, user_id={}", user_id);

        let mut pet_ids = Vec::with_capacity(doc.pets.len());
        for pet in &doc.pets {
            let pet_id = self
                .backend
                .submit_pet_info(&payload::pet_info_body(user_id, pet))
                .await?;
            self.backend
                .submit_pet_health(&payload::pet_health_body(pet_id, pet))
                .await?;
            tracing::info!("Submitted pet '{}', pet_id={}", pet.info.pet_name, pet_id);
            pet_ids.push(pet_id);
        }

        let checkin_id = self
            .backend
            .submit_checkin_data(&payload::checkin_body(pet_ids[0], doc))
            .await?;
        self.backend
            .submit_extra_info(&payload::extra_info_body(checkin_id, doc))
            .await?;
        tracing::info!("Submission complete, checkin_id={}", checkin_id);

        Ok(SubmissionReceipt {
            user_id,
            pet_ids,
            checkin_id,
        })
    }

    /// Legacy single-shot submission of the whole document.
    pub async fn submit_legacy(&self, doc: &CheckInDocument) -> Result<(), SubmitError> {
        if doc.pets.is_empty() {
            return Err(SubmitError::EmptyDocument);
        }
        self.backend.submit_full(&payload::full_body(doc)).await
    }

    /// Pre-wizard lookup routing new-user / resume / already-checked-in.
    pub async fn lookup_user(&self, phone: &str) -> Result<UserLookup, SubmitError> {
        self.backend.check_user(phone).await
    }
}
