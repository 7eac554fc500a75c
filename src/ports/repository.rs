//! Repository port: caller-owned patient record store.
//!
//! The engine never persists anything on its own. Callers hand in a store
//! keyed by patient id; the application services read the history they need
//! and write back what a round produced.

use crate::domain::{AdjustedPlan, AssessmentRecord, ToleranceEntry, WeaningPlan};

/// Key-value store of per-patient clinical records.
///
/// Series (assessments, tolerance entries) are append-only. Plans are
/// replaced wholesale; only the latest one is kept.
pub trait PatientRepository: Send + Sync {
    /// Error type for repository operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Replace the patient's current feeding plan.
    ///
    /// # Errors
    /// Returns error if the store cannot be written.
    fn save_plan(&self, patient_id: &str, plan: &AdjustedPlan) -> Result<(), Self::Error>;

    /// Load the patient's current feeding plan.
    ///
    /// # Returns
    /// `None` if no plan has been saved yet.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    fn load_latest_plan(&self, patient_id: &str) -> Result<Option<AdjustedPlan>, Self::Error>;

    /// Append a scored assessment to the patient's round history.
    ///
    /// # Errors
    /// Returns error if the store cannot be written.
    fn append_assessment(&self, patient_id: &str, record: &AssessmentRecord) -> Result<(), Self::Error>;

    /// Load the round history in insertion order.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    fn load_assessments(&self, patient_id: &str) -> Result<Vec<AssessmentRecord>, Self::Error>;

    /// Append one tolerance observation.
    ///
    /// # Errors
    /// Returns error if the store cannot be written.
    fn append_tolerance(&self, patient_id: &str, entry: &ToleranceEntry) -> Result<(), Self::Error>;

    /// Load the tolerance series in insertion order.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    fn load_tolerance(&self, patient_id: &str) -> Result<Vec<ToleranceEntry>, Self::Error>;

    /// Replace the patient's weaning plan.
    ///
    /// # Errors
    /// Returns error if the store cannot be written.
    fn save_weaning_plan(&self, patient_id: &str, plan: &WeaningPlan) -> Result<(), Self::Error>;

    /// Load the patient's weaning plan.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    fn load_weaning_plan(&self, patient_id: &str) -> Result<Option<WeaningPlan>, Self::Error>;

    /// Drop every record held for a patient (discharge).
    ///
    /// # Errors
    /// Returns error if the store cannot be written.
    fn clear_patient(&self, patient_id: &str) -> Result<(), Self::Error>;
}
