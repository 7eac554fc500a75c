//! Weaning service: plan lifecycle against the patient's tolerance series.

use std::sync::Arc;

use super::{patient_key, storage_error};
use crate::adapters::RepositoryError;
use crate::domain::{
    advance_plan_phase, analyze_tolerance_trend, assess_weaning_readiness,
    calculate_weaning_progress, generate_default_weaning_plan, Patient, WeaningPhase, WeaningPlan,
    WeaningProgress, WeaningReadiness,
};
use crate::ports::{Clock, PatientRepository};
use crate::NutriguardError;

/// Service for creating and advancing weaning plans.
pub struct WeaningService<R, C>
where
    R: PatientRepository,
    C: Clock,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> WeaningService<R, C>
where
    R: PatientRepository,
    C: Clock,
    R::Error: Into<RepositoryError>,
{
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    fn load_plan(&self, patient_id: &str) -> Result<WeaningPlan, NutriguardError> {
        self.repository
            .load_weaning_plan(patient_id)
            .map_err(storage_error)?
            .ok_or_else(|| NutriguardError::NotFound(format!("weaning plan for {patient_id}")))
    }

    /// Generate and store a plan starting today.
    ///
    /// Replaces any existing plan for the patient.
    ///
    /// # Errors
    /// Returns error if the patient has no id, the start phase is not a
    /// plan phase, or the repository fails.
    pub fn start_plan(&self, patient: &Patient, start_phase: WeaningPhase) -> Result<WeaningPlan, NutriguardError> {
        let patient_id = patient_key(patient)?;
        let plan = generate_default_weaning_plan(patient, start_phase, self.clock.today())?;

        self.repository
            .save_weaning_plan(patient_id, &plan)
            .map_err(storage_error)?;
        tracing::info!(
            "Weaning plan started at {}: {} phases, target completion {}",
            start_phase,
            plan.phases.len(),
            plan.target_completion_date
        );
        Ok(plan)
    }

    /// # Errors
    /// Returns `NotFound` if the patient has no plan.
    pub fn progress(&self, patient_id: &str) -> Result<WeaningProgress, NutriguardError> {
        let plan = self.load_plan(patient_id)?;
        let progress = calculate_weaning_progress(&plan, self.clock.today());
        if !progress.is_on_track {
            tracing::warn!(
                "Weaning behind schedule: {}/{} phases complete, {} expected",
                progress.completed_phases,
                progress.total_phases,
                progress.expected_phases
            );
        }
        Ok(progress)
    }

    /// Readiness to advance, judged from the recorded tolerance series.
    ///
    /// # Errors
    /// Returns `NotFound` if the patient has no plan.
    pub fn readiness(&self, patient_id: &str) -> Result<WeaningReadiness, NutriguardError> {
        let plan = self.load_plan(patient_id)?;
        let entries = self
            .repository
            .load_tolerance(patient_id)
            .map_err(storage_error)?;
        Ok(assess_weaning_readiness(&plan, &analyze_tolerance_trend(&entries)))
    }

    /// Advance the plan one phase as of today, regardless of readiness.
    ///
    /// # Errors
    /// Returns `NotFound` if the patient has no plan.
    pub fn advance(&self, patient_id: &str) -> Result<WeaningPlan, NutriguardError> {
        let plan = self.load_plan(patient_id)?;
        if plan.is_completed() {
            tracing::debug!("Weaning plan already completed; nothing to advance");
            return Ok(plan);
        }

        let next = advance_plan_phase(&plan, self.clock.today());
        self.repository
            .save_weaning_plan(patient_id, &next)
            .map_err(storage_error)?;
        tracing::info!("Weaning advanced {} -> {}", plan.current_phase, next.current_phase);
        Ok(next)
    }

    /// Advance only when [`WeaningService::readiness`] recommends it.
    ///
    /// # Errors
    /// Returns `NotFound` if the patient has no plan.
    pub fn advance_if_ready(
        &self,
        patient_id: &str,
    ) -> Result<(WeaningReadiness, Option<WeaningPlan>), NutriguardError> {
        let readiness = self.readiness(patient_id)?;
        if !readiness.should_advance {
            tracing::info!("Weaning held at {}", readiness.current_phase);
            return Ok((readiness, None));
        }
        let plan = self.advance(patient_id)?;
        Ok((readiness, Some(plan)))
    }
}
