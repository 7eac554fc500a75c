//! Domain layer: Core clinical nutrition types and rules.
//!
//! Everything here is a pure transform over values the caller already holds.
//! No I/O, no clock access, no shared state; "today" is always a parameter.

pub mod assessment;
pub mod patient;
pub mod plan;
pub mod protocol;
pub mod requirements;
pub mod scoring;
pub mod tolerance;
pub mod trend;
pub mod weaning;

pub use assessment::{
    ActualIntake, BowelSounds, ConsciousnessLevel, DailyAssessment, GastricResidualAction,
    GiAssessment, RespiratoryStatus, Severity, StoolConsistency, VitalSigns,
};
pub use patient::{get_age_category, is_pediatric_patient, AgeCategory, Gender, Patient, PatientType};
pub use plan::{
    generate_adjusted_plan, generate_adjusted_plan_with_policy, plan_from_score, AdjustedPlan,
    PlanItem,
};
pub use protocol::{
    create_protocol_from_requirements, generate_feeding_protocol, FeedingProtocol,
    FeedingProtocolOptions, ProtocolStep,
};
pub use requirements::{
    adjust_requirements_for_condition, calculate_basal_metabolic_rate, calculate_nutrition_requirements,
    calculate_schofield_bmr, calculate_total_energy_requirement, ActivityLevel, ClinicalCondition,
    NutritionRequirements, NutritionType, StressLevel,
};
pub use scoring::{
    score_assessment, score_assessment_with_policy, AdjustmentSeverity, AdjustmentType,
    AssessmentScoreResult, FeedingAdjustment, PlanAdjustment, RiskLevel,
};
pub use tolerance::{
    analyze_tolerance_trend, calculate_tolerance_score, determine_feeding_adjustment,
    ToleranceEntry, ToleranceTrend, TrendDirection,
};
pub use trend::{summarize_rounds, AssessmentRecord, RoundSeriesPoint, RoundSummary};
pub use weaning::{
    advance_plan_phase, assess_weaning_readiness, calculate_weaning_progress,
    generate_default_weaning_plan, get_phase_config, WeaningMilestone, WeaningPhase,
    WeaningPhaseConfig, WeaningPlan, WeaningProgress, WeaningReadiness,
};

/// Round half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
