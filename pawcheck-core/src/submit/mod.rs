//! Backend submission: the five dependent REST calls that drain a
//! completed check-in document, plus the legacy single-shot path and
//! the pre-wizard user lookup.

mod client;
mod error;
mod orchestrator;
pub mod payload;

pub use client::{ApiResponse, CheckInBackend, HttpBackend, UserLookup, CSRF_HEADER};
pub use error::SubmitError;
pub use orchestrator::{SubmissionOrchestrator, SubmissionReceipt};
