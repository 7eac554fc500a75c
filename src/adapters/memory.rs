//! In-memory adapter: Implementation of PatientRepository.
//!
//! Records are held as serialized JSON documents keyed by
//! `(patient id, collection)`, so what comes back is always a fresh copy
//! and never aliases caller state. Patient ids are opaque and may contain
//! any character.
//!
//! # Mutex Behavior
//!
//! The document map is protected by a `Mutex`. A poisoned mutex (from a panic
//! in another thread) fails closed: every later call returns
//! [`RepositoryError::LockPoisoned`] instead of touching possibly torn data.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::{AdjustedPlan, AssessmentRecord, ToleranceEntry, WeaningPlan};
use crate::ports::PatientRepository;

const PLAN: &str = "plan";
const ASSESSMENTS: &str = "assessments";
const TOLERANCE: &str = "tolerance";
const WEANING: &str = "weaning";

/// Error type for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Repository lock poisoned")]
    LockPoisoned,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

type Documents = HashMap<(String, &'static str), Vec<String>>;

/// Process-local patient store.
#[derive(Default)]
pub struct InMemoryRepository {
    documents: Mutex<Documents>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key(patient_id: &str, collection: &'static str) -> (String, &'static str) {
        (patient_id.to_string(), collection)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Documents>, RepositoryError> {
        self.documents.lock().map_err(|_| {
            tracing::error!("Repository mutex poisoned; refusing access");
            RepositoryError::LockPoisoned
        })
    }

    fn replace<T: Serialize>(&self, patient_id: &str, collection: &'static str, value: &T) -> Result<(), RepositoryError> {
        let doc = serde_json::to_string(value)?;
        self.lock()?.insert(Self::key(patient_id, collection), vec![doc]);
        Ok(())
    }

    fn append<T: Serialize>(&self, patient_id: &str, collection: &'static str, value: &T) -> Result<(), RepositoryError> {
        let doc = serde_json::to_string(value)?;
        self.lock()?
            .entry(Self::key(patient_id, collection))
            .or_default()
            .push(doc);
        Ok(())
    }

    fn load_all<T: DeserializeOwned>(&self, patient_id: &str, collection: &'static str) -> Result<Vec<T>, RepositoryError> {
        let docs = self.lock()?;
        docs.get(&Self::key(patient_id, collection))
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .map(|doc| serde_json::from_str(doc).map_err(RepositoryError::from))
            .collect()
    }

    fn load_one<T: DeserializeOwned>(&self, patient_id: &str, collection: &'static str) -> Result<Option<T>, RepositoryError> {
        Ok(self.load_all(patient_id, collection)?.pop())
    }

    /// Number of patients with at least one stored record.
    ///
    /// # Errors
    /// Returns error if the lock is poisoned.
    pub fn patient_count(&self) -> Result<usize, RepositoryError> {
        let docs = self.lock()?;
        let mut ids: Vec<&str> = docs.keys().map(|(id, _)| id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids.len())
    }
}

impl PatientRepository for InMemoryRepository {
    type Error = RepositoryError;

    fn save_plan(&self, patient_id: &str, plan: &AdjustedPlan) -> Result<(), Self::Error> {
        self.replace(patient_id, PLAN, plan)?;
        tracing::debug!("Saved feeding plan for {}", plan.date);
        Ok(())
    }

    fn load_latest_plan(&self, patient_id: &str) -> Result<Option<AdjustedPlan>, Self::Error> {
        self.load_one(patient_id, PLAN)
    }

    fn append_assessment(&self, patient_id: &str, record: &AssessmentRecord) -> Result<(), Self::Error> {
        self.append(patient_id, ASSESSMENTS, record)
    }

    fn load_assessments(&self, patient_id: &str) -> Result<Vec<AssessmentRecord>, Self::Error> {
        self.load_all(patient_id, ASSESSMENTS)
    }

    fn append_tolerance(&self, patient_id: &str, entry: &ToleranceEntry) -> Result<(), Self::Error> {
        self.append(patient_id, TOLERANCE, entry)
    }

    fn load_tolerance(&self, patient_id: &str) -> Result<Vec<ToleranceEntry>, Self::Error> {
        self.load_all(patient_id, TOLERANCE)
    }

    fn save_weaning_plan(&self, patient_id: &str, plan: &WeaningPlan) -> Result<(), Self::Error> {
        self.replace(patient_id, WEANING, plan)?;
        tracing::debug!("Saved weaning plan at phase {}", plan.current_phase);
        Ok(())
    }

    fn load_weaning_plan(&self, patient_id: &str) -> Result<Option<WeaningPlan>, Self::Error> {
        self.load_one(patient_id, WEANING)
    }

    fn clear_patient(&self, patient_id: &str) -> Result<(), Self::Error> {
        let mut docs = self.lock()?;
        let before = docs.len();
        docs.retain(|(id, _), _| id != patient_id);
        if docs.len() == before {
            return Err(RepositoryError::NotFound(patient_id.to_string()));
        }
        tracing::warn!("Cleared all records for a patient");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tolerance::tests::entry_on;
    use crate::domain::{AdjustedPlan, FeedingAdjustment, NutritionRequirements, NutritionType};
    use chrono::NaiveDate;

    fn plan(energy: f64) -> AdjustedPlan {
        AdjustedPlan {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).expect("Valid date"),
            nutrition_type: NutritionType::Enteral,
            items: Vec::new(),
            total_energy_kcal: energy,
            total_protein_g: 50.0,
            total_volume_ml: energy,
            requirements: NutritionRequirements::default(),
            feeding_adjustment: FeedingAdjustment::Maintain,
            adjustments: Vec::new(),
            rationale: String::new(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_plan_is_replaced() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_latest_plan("bed-1").expect("Should load").is_none());

        repo.save_plan("bed-1", &plan(1000.0)).expect("Should save");
        repo.save_plan("bed-1", &plan(1200.0)).expect("Should save");

        let latest = repo.load_latest_plan("bed-1").expect("Should load").expect("Should exist");
        assert_eq!(latest.total_energy_kcal, 1200.0);
    }

    #[test]
    fn test_series_append_in_order_per_patient() {
        let repo = InMemoryRepository::new();
        repo.append_tolerance("a", &entry_on(1, 6)).expect("Should append");
        repo.append_tolerance("a", &entry_on(2, 8)).expect("Should append");
        repo.append_tolerance("b", &entry_on(1, 2)).expect("Should append");

        let a = repo.load_tolerance("a").expect("Should load");
        assert_eq!(a.iter().map(|e| e.score).collect::<Vec<_>>(), vec![6, 8]);
        assert_eq!(repo.load_tolerance("b").expect("Should load").len(), 1);
        assert!(repo.load_tolerance("c").expect("Should load").is_empty());
        assert_eq!(repo.patient_count().expect("Should count"), 2);
    }

    #[test]
    fn test_clear_patient() {
        let repo = InMemoryRepository::new();
        repo.save_plan("a", &plan(900.0)).expect("Should save");
        repo.append_tolerance("a", &entry_on(1, 9)).expect("Should append");
        repo.save_plan("b", &plan(900.0)).expect("Should save");

        repo.clear_patient("a").expect("Should clear");
        assert!(repo.load_latest_plan("a").expect("Should load").is_none());
        assert!(repo.load_latest_plan("b").expect("Should load").is_some());
        assert!(matches!(repo.clear_patient("a"), Err(RepositoryError::NotFound(_))));
    }

    #[test]
    fn test_clear_patient_matches_whole_id() {
        let repo = InMemoryRepository::new();
        repo.append_tolerance("ward", &entry_on(1, 5)).expect("Should append");
        repo.append_tolerance("ward/7", &entry_on(1, 8)).expect("Should append");
        repo.save_plan("ward/7", &plan(800.0)).expect("Should save");

        repo.clear_patient("ward").expect("Should clear");
        assert!(repo.load_tolerance("ward").expect("Should load").is_empty());
        assert_eq!(repo.load_tolerance("ward/7").expect("Should load").len(), 1);
        assert!(repo.load_latest_plan("ward/7").expect("Should load").is_some());
        assert_eq!(repo.patient_count().expect("Should count"), 1);
    }

    #[test]
    fn test_poisoned_lock_fails_closed() {
        let repo = std::sync::Arc::new(InMemoryRepository::new());
        let clone = std::sync::Arc::clone(&repo);
        let _ = std::thread::spawn(move || {
            let _guard = clone.documents.lock().expect("Should lock");
            panic!("poison");
        })
        .join();

        assert!(matches!(repo.load_tolerance("a"), Err(RepositoryError::LockPoisoned)));
    }
}
