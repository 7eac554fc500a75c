//! Feeding plan adjustment.
//!
//! Each round produces a new [`AdjustedPlan`] from the scored assessment and
//! the previous round's plan. The previous plan is only read, never modified.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::assessment::DailyAssessment;
use super::requirements::{NutritionRequirements, NutritionType};
use super::round_to;
use super::scoring::{
    score_assessment_with_policy, AssessmentScoreResult, FeedingAdjustment, PlanAdjustment,
};
use crate::config::PolicyConfig;

/// One formula product in the regimen, chosen by the caller from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanItem {
    pub product_id: String,
    pub product_name: String,
    /// Volume per administration in mL
    pub volume_ml: f64,
    pub frequency_per_day: u32,
    pub rationale: String,
}

/// Recommended regimen for the next period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedPlan {
    /// Date of the assessment this plan answers
    pub date: NaiveDate,
    pub nutrition_type: NutritionType,
    pub items: Vec<PlanItem>,
    pub total_energy_kcal: f64,
    pub total_protein_g: f64,
    pub total_volume_ml: f64,
    pub requirements: NutritionRequirements,
    pub feeding_adjustment: FeedingAdjustment,
    pub adjustments: Vec<PlanAdjustment>,
    pub rationale: String,
    pub warnings: Vec<String>,
}

/// Scale factor applied to the previous plan for a feeding adjustment.
#[must_use]
pub fn scale_factor(
    adjustment: FeedingAdjustment,
    energy_ratio: Option<f64>,
    policy: &PolicyConfig,
) -> f64 {
    match adjustment {
        FeedingAdjustment::Hold => 0.0,
        FeedingAdjustment::Reduce => policy.reduce_factor,
        FeedingAdjustment::Advance => match energy_ratio {
            Some(r) if r < policy.advance_threshold => {
                (1.0 + (1.0 - r) * policy.advance_gain).min(policy.advance_ceiling)
            }
            _ => 1.0,
        },
        FeedingAdjustment::Maintain => 1.0,
    }
}

fn narrative(score: &AssessmentScoreResult, factor: f64, seeded: bool) -> String {
    let header = format!(
        "Overall score {} (GI {}, vital {}, intake {}), risk {}.",
        score.overall_score, score.gi_score, score.vital_score, score.intake_score, score.risk_level
    );

    let body = if seeded {
        "No previous plan: totals seeded from today's actual intake.".to_string()
    } else {
        match score.feeding_adjustment {
            FeedingAdjustment::Advance if factor > 1.0 => format!(
                "GI tolerance good and intake below goal: advancing volume by {:.0}%.",
                (factor - 1.0) * 100.0
            ),
            FeedingAdjustment::Advance => {
                "GI tolerance good and intake at goal: continuing current volume.".to_string()
            }
            FeedingAdjustment::Maintain => {
                "Tolerance acceptable: maintaining current regimen and monitoring.".to_string()
            }
            FeedingAdjustment::Reduce => format!(
                "Signs of feeding intolerance: reducing volume to {:.0}% of previous.",
                factor * 100.0
            ),
            FeedingAdjustment::Hold => {
                "Severe intolerance: holding feeds; reassess GI status before restarting."
                    .to_string()
            }
        }
    };

    format!("{header} {body}")
}

/// Produce the next plan with the default policy.
#[must_use]
pub fn generate_adjusted_plan(
    assessment: &DailyAssessment,
    previous: Option<&AdjustedPlan>,
    requirements: &NutritionRequirements,
) -> AdjustedPlan {
    generate_adjusted_plan_with_policy(assessment, previous, requirements, &PolicyConfig::default())
}

/// Produce the next plan.
///
/// Without a previous plan the totals are seeded from actual intake. With one,
/// item volumes and totals are scaled by [`scale_factor`], then energy and
/// protein are capped at `policy.requirement_cap` of the requirement.
#[must_use]
pub fn generate_adjusted_plan_with_policy(
    assessment: &DailyAssessment,
    previous: Option<&AdjustedPlan>,
    requirements: &NutritionRequirements,
    policy: &PolicyConfig,
) -> AdjustedPlan {
    let score = score_assessment_with_policy(assessment, Some(requirements), policy);
    plan_from_score(assessment, &score, previous, requirements, policy)
}

/// Produce the next plan from an already scored assessment.
///
/// `score` must come from `assessment` and `requirements`; the plan copies its
/// adjustment, adjustments and warnings as given.
#[must_use]
pub fn plan_from_score(
    assessment: &DailyAssessment,
    score: &AssessmentScoreResult,
    previous: Option<&AdjustedPlan>,
    requirements: &NutritionRequirements,
    policy: &PolicyConfig,
) -> AdjustedPlan {
    let Some(previous) = previous else {
        let intake = &assessment.intake;
        return AdjustedPlan {
            date: assessment.date,
            nutrition_type: NutritionType::Enteral,
            items: Vec::new(),
            total_energy_kcal: intake.estimated_energy_kcal,
            total_protein_g: intake.estimated_protein_g,
            total_volume_ml: intake.nutrition_volume_ml(),
            requirements: *requirements,
            feeding_adjustment: score.feeding_adjustment,
            adjustments: score.adjustments.clone(),
            rationale: narrative(score, 1.0, true),
            warnings: score.warnings.clone(),
        };
    };

    let factor = scale_factor(score.feeding_adjustment, score.energy_ratio, policy);

    let items = previous
        .items
        .iter()
        .map(|item| PlanItem {
            volume_ml: (item.volume_ml * factor).round().max(0.0),
            ..item.clone()
        })
        .collect();

    let energy_cap = requirements.energy_kcal * policy.requirement_cap;
    let protein_cap = requirements.protein_g * policy.requirement_cap;

    let scaled_energy = previous.total_energy_kcal * factor;
    let total_energy_kcal = scaled_energy.min(energy_cap).max(0.0).round();
    let total_protein_g = round_to((previous.total_protein_g * factor).min(protein_cap).max(0.0), 1);
    let total_volume_ml = (previous.total_volume_ml * factor).max(0.0).round();

    let mut warnings = score.warnings.clone();
    if scaled_energy > energy_cap {
        warnings.push(format!(
            "Energy total capped at {:.0} kcal ({:.0}% of requirement)",
            energy_cap,
            policy.requirement_cap * 100.0
        ));
    }

    AdjustedPlan {
        date: assessment.date,
        nutrition_type: previous.nutrition_type,
        items,
        total_energy_kcal,
        total_protein_g,
        total_volume_ml,
        requirements: *requirements,
        feeding_adjustment: score.feeding_adjustment,
        adjustments: score.adjustments.clone(),
        rationale: narrative(score, factor, false),
        warnings,
    }
}
