//! Application layer: Use cases and services.
//!
//! This module orchestrates domain rules with ports to implement
//! the bedside workflows: a daily round and weaning management.

mod rounds;
mod weaning;

pub use rounds::{RoundOutcome, RoundService};
pub use weaning::WeaningService;

use crate::adapters::RepositoryError;
use crate::domain::Patient;
use crate::NutriguardError;

fn storage_error<E: Into<RepositoryError>>(e: E) -> NutriguardError {
    NutriguardError::Storage(e.into())
}

fn patient_key(patient: &Patient) -> Result<&str, NutriguardError> {
    patient
        .id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| NutriguardError::Validation("Patient id is required to record history".to_string()))
}
