//! Round service: one bedside round end to end.
//!
//! A round scores the day's assessment, turns yesterday's plan into today's,
//! feeds the GI findings into the tolerance series and records everything in
//! the caller's repository.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{patient_key, storage_error};
use crate::adapters::RepositoryError;
use crate::config::PolicyConfig;
use crate::domain::{
    adjust_requirements_for_condition, analyze_tolerance_trend, calculate_nutrition_requirements,
    plan_from_score, score_assessment_with_policy, summarize_rounds,
    ActivityLevel, AdjustedPlan, AssessmentRecord, AssessmentScoreResult, ClinicalCondition,
    DailyAssessment, NutritionRequirements, NutritionType, Patient, RoundSummary, StressLevel,
    ToleranceEntry, ToleranceTrend,
};
use crate::ports::{Clock, PatientRepository};
use crate::NutriguardError;

/// Everything a round produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub score: AssessmentScoreResult,
    pub plan: AdjustedPlan,
    pub tolerance: ToleranceEntry,
}

/// Service for running daily nutrition rounds.
pub struct RoundService<R, C>
where
    R: PatientRepository,
    C: Clock,
{
    repository: Arc<R>,
    clock: Arc<C>,
    policy: PolicyConfig,
}

impl<R, C> RoundService<R, C>
where
    R: PatientRepository,
    C: Clock,
    R::Error: Into<RepositoryError>,
{
    /// Create a round service with the policy from the environment.
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self::with_policy(repository, clock, PolicyConfig::from_env_or_default())
    }

    pub fn with_policy(repository: Arc<R>, clock: Arc<C>, policy: PolicyConfig) -> Self {
        Self {
            repository,
            clock,
            policy,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Targets for a patient, with each listed condition applied in order.
    ///
    /// Range problems in the biometrics are logged, not rejected.
    #[must_use]
    pub fn requirements_for(
        &self,
        patient: &Patient,
        nutrition_type: NutritionType,
        activity: ActivityLevel,
        stress: StressLevel,
        conditions: &[ClinicalCondition],
    ) -> NutritionRequirements {
        log_validation(patient);

        let base = calculate_nutrition_requirements(patient, nutrition_type, activity, stress);
        conditions
            .iter()
            .fold(base, |req, &condition| adjust_requirements_for_condition(&req, condition))
    }

    /// Run one round for a patient.
    ///
    /// Loads the latest plan, scores the assessment, derives the next plan and
    /// a tolerance entry, then appends the record and saves the plan.
    ///
    /// # Errors
    /// Returns error if the patient has no id or the repository fails.
    pub fn run_round(
        &self,
        patient: &Patient,
        assessment: DailyAssessment,
        requirements: &NutritionRequirements,
    ) -> Result<RoundOutcome, NutriguardError> {
        let patient_id = patient_key(patient)?;
        log_validation(patient);

        if assessment.date > self.clock.today() {
            tracing::warn!("Assessment dated {} is after today", assessment.date);
        }

        tracing::debug!("Step 1: Loading previous plan...");
        let previous = self
            .repository
            .load_latest_plan(patient_id)
            .map_err(storage_error)?;
        if previous.is_none() {
            tracing::info!("No previous plan; seeding totals from actual intake");
        }

        tracing::debug!("Step 2: Scoring assessment...");
        let score = score_assessment_with_policy(&assessment, Some(requirements), &self.policy);

        tracing::debug!("Step 3: Adjusting plan...");
        let plan = plan_from_score(
            &assessment,
            &score,
            previous.as_ref(),
            requirements,
            &self.policy,
        );

        tracing::debug!("Step 4: Scoring GI tolerance...");
        let tolerance = ToleranceEntry::from_gi_assessment(assessment.date, assessment.time, &assessment.gi);

        tracing::debug!("Step 5: Recording round...");
        self.repository
            .append_assessment(patient_id, &AssessmentRecord::new(assessment, score.clone()))
            .map_err(storage_error)?;
        self.repository
            .append_tolerance(patient_id, &tolerance)
            .map_err(storage_error)?;
        self.repository
            .save_plan(patient_id, &plan)
            .map_err(storage_error)?;

        tracing::info!(
            "Round complete: overall={}, risk={}, adjustment={}, energy={:.0} kcal, tolerance={}/10",
            score.overall_score,
            score.risk_level,
            plan.feeding_adjustment,
            plan.total_energy_kcal,
            tolerance.score
        );
        for warning in &score.warnings {
            tracing::warn!("Round warning: {}", warning);
        }

        Ok(RoundOutcome {
            score,
            plan,
            tolerance,
        })
    }

    /// Tolerance trend over the patient's recorded series.
    ///
    /// # Errors
    /// Returns error if the repository fails.
    pub fn tolerance_trend(&self, patient_id: &str) -> Result<ToleranceTrend, NutriguardError> {
        let entries = self
            .repository
            .load_tolerance(patient_id)
            .map_err(storage_error)?;
        Ok(analyze_tolerance_trend(&entries))
    }

    /// Chart series and trend over the patient's recorded rounds.
    ///
    /// # Errors
    /// Returns error if the repository fails.
    pub fn round_summary(&self, patient_id: &str) -> Result<RoundSummary, NutriguardError> {
        let records = self
            .repository
            .load_assessments(patient_id)
            .map_err(storage_error)?;
        tracing::debug!("Summarizing {} rounds", records.len());
        Ok(summarize_rounds(&records))
    }

    /// The plan the next round will adjust from.
    ///
    /// # Errors
    /// Returns error if the repository fails.
    pub fn current_plan(&self, patient_id: &str) -> Result<Option<AdjustedPlan>, NutriguardError> {
        self.repository
            .load_latest_plan(patient_id)
            .map_err(storage_error)
    }
}

fn log_validation(patient: &Patient) {
    if let Err(issues) = patient.validate() {
        for issue in issues {
            tracing::warn!("Patient input check: {}", issue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixedClock, InMemoryRepository};
    use crate::domain::scoring::tests::{baseline_assessment, gi_critical, requirements};
    use crate::domain::{FeedingAdjustment, Gender, PlanItem, TrendDirection};
    use chrono::NaiveDate;

    fn service() -> RoundService<InMemoryRepository, FixedClock> {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).expect("Valid date");
        RoundService::new(Arc::new(InMemoryRepository::new()), Arc::new(FixedClock(today)))
    }

    fn patient() -> Patient {
        Patient::new(70.0, 175.0, 55.0, Gender::Male).with_id("icu-7")
    }

    fn on_day(day: u32) -> DailyAssessment {
        let mut a = baseline_assessment();
        a.date = NaiveDate::from_ymd_opt(2024, 3, day).expect("Valid date");
        a
    }

    #[test]
    fn test_round_requires_patient_id() {
        let svc = service();
        let anonymous = Patient::new(70.0, 175.0, 55.0, Gender::Male);
        let err = svc
            .run_round(&anonymous, on_day(1), &requirements(1600.0, 80.0))
            .expect_err("Should reject patient without id");
        assert!(matches!(err, NutriguardError::Validation(_)));
    }

    #[test]
    fn test_first_round_seeds_then_second_scales() {
        let svc = service();
        let req = requirements(1600.0, 80.0);

        let mut first = on_day(1);
        first.intake.estimated_energy_kcal = 1000.0;
        first.intake.estimated_protein_g = 70.0;
        first.intake.enteral_ml = 1000.0;
        let seeded = svc.run_round(&patient(), first, &req).expect("Should run first round");
        assert_eq!(seeded.plan.total_energy_kcal, 1000.0);
        assert!(seeded.plan.items.is_empty());

        let mut second = on_day(2);
        second.intake.estimated_energy_kcal = 1000.0;
        second.intake.estimated_protein_g = 70.0;
        let advanced = svc.run_round(&patient(), second, &req).expect("Should run second round");
        assert_eq!(advanced.plan.feeding_adjustment, FeedingAdjustment::Advance);
        assert_eq!(advanced.plan.total_energy_kcal, 1188.0);

        let stored = svc
            .current_plan("icu-7")
            .expect("Should load")
            .expect("Should exist");
        assert_eq!(stored, advanced.plan);
    }

    #[test]
    fn test_hold_round_zeroes_plan() {
        let svc = service();
        let req = requirements(1600.0, 80.0);
        svc.repository
            .save_plan(
                "icu-7",
                &AdjustedPlan {
                    items: vec![PlanItem {
                        product_id: "std-1.0".to_string(),
                        product_name: "Standard 1.0".to_string(),
                        volume_ml: 250.0,
                        frequency_per_day: 4,
                        rationale: String::new(),
                    }],
                    ..svc.run_round(&patient(), on_day(1), &req).expect("Should run").plan
                },
            )
            .expect("Should save");

        let mut critical = on_day(2);
        critical.gi = gi_critical();
        let outcome = svc.run_round(&patient(), critical, &req).expect("Should run");

        assert_eq!(outcome.plan.feeding_adjustment, FeedingAdjustment::Hold);
        assert_eq!(outcome.plan.total_energy_kcal, 0.0);
        assert_eq!(outcome.plan.items[0].volume_ml, 0.0);
        assert_eq!(outcome.tolerance.score, 0);
    }

    #[test]
    fn test_history_feeds_trend_and_summary() {
        let svc = service();
        let req = requirements(1600.0, 80.0);
        for day in 1..=2 {
            let mut a = on_day(day);
            a.gi = gi_critical();
            svc.run_round(&patient(), a, &req).expect("Should run");
        }
        for day in 3..=4 {
            svc.run_round(&patient(), on_day(day), &req).expect("Should run");
        }

        let trend = svc.tolerance_trend("icu-7").expect("Should analyze");
        assert_eq!(trend.entry_count, 4);
        assert_eq!(trend.trend, TrendDirection::Improving);
        assert_eq!(trend.consecutive_good_days, 2);

        let summary = svc.round_summary("icu-7").expect("Should summarize");
        assert_eq!(summary.series.len(), 4);
        assert_eq!(summary.hold_count, 2);
        assert_eq!(summary.days_covered, 4);
    }

    #[test]
    fn test_new_reads_policy_from_environment() {
        assert_eq!(service().policy(), &PolicyConfig::from_env_or_default());
    }

    #[test]
    fn test_plan_uses_recorded_score() {
        let svc = service();
        let req = requirements(1600.0, 80.0);
        svc.run_round(&patient(), on_day(1), &req).expect("Should run");

        let mut a = on_day(2);
        a.gi.gastric_residual_ml = 350.0;
        let outcome = svc.run_round(&patient(), a, &req).expect("Should run");
        assert_eq!(outcome.plan.feeding_adjustment, outcome.score.feeding_adjustment);
        assert_eq!(outcome.plan.adjustments, outcome.score.adjustments);

        let recorded = svc
            .repository
            .load_assessments("icu-7")
            .expect("Should load");
        assert_eq!(recorded[1].result, outcome.score);
    }

    #[test]
    fn test_requirements_apply_conditions_in_order() {
        let svc = service();
        let p = patient();
        let plain = svc.requirements_for(
            &p,
            NutritionType::Enteral,
            ActivityLevel::Bedrest,
            StressLevel::Moderate,
            &[],
        );
        let renal = svc.requirements_for(
            &p,
            NutritionType::Enteral,
            ActivityLevel::Bedrest,
            StressLevel::Moderate,
            &[ClinicalCondition::RenalFailure],
        );
        assert_eq!(
            renal,
            adjust_requirements_for_condition(&plain, ClinicalCondition::RenalFailure)
        );
        assert!(renal.protein_g < plain.protein_g);
    }
}
