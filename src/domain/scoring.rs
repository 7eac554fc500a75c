//! Daily assessment scoring.
//!
//! Three independent 0-100 sub-scores (GI, vitals, intake) start at 100 and
//! accumulate deductions. The composite drives the risk level; the GI score
//! alone drives the feeding adjustment.

use serde::{Deserialize, Serialize};

use super::assessment::{
    BowelSounds, ConsciousnessLevel, DailyAssessment, RespiratoryStatus, Severity,
    StoolConsistency,
};
use super::requirements::NutritionRequirements;
use crate::config::PolicyConfig;

/// Overall clinical risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// Classify an overall score: ≥80 low, ≥60 moderate, ≥40 high, else critical.
    #[must_use]
    pub fn from_score(overall: u8) -> Self {
        match overall {
            80.. => Self::Low,
            60..=79 => Self::Moderate,
            40..=59 => Self::High,
            _ => Self::Critical,
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - continue current plan",
            Self::Moderate => "Moderate risk - review at next round",
            Self::High => "High risk - dietitian review advised",
            Self::Critical => "Critical - immediate physician review",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Recommended change to the feeding rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedingAdjustment {
    Advance,
    Maintain,
    Reduce,
    Hold,
}

impl FeedingAdjustment {
    /// Map a GI score (0-100): ≥80 advance, ≥50 maintain, ≥30 reduce, else hold.
    #[must_use]
    pub fn from_gi_score(gi_score: u8) -> Self {
        match gi_score {
            80.. => Self::Advance,
            50..=79 => Self::Maintain,
            30..=49 => Self::Reduce,
            _ => Self::Hold,
        }
    }
}

impl std::fmt::Display for FeedingAdjustment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Advance => write!(f, "advance"),
            Self::Maintain => write!(f, "maintain"),
            Self::Reduce => write!(f, "reduce"),
            Self::Hold => write!(f, "hold"),
        }
    }
}

/// Kind of plan change a finding suggests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    Advance,
    Maintain,
    Reduce,
    Hold,
    /// Switch formula (e.g. to a peptide or fibre formula)
    Switch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentSeverity {
    Info,
    Warning,
    Critical,
}

/// A single suggested change with the finding that triggered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanAdjustment {
    pub adjustment_type: AdjustmentType,
    pub reason: String,
    /// Plan field affected ("volume", "formula", "energy", "protein")
    pub field: String,
    pub severity: AdjustmentSeverity,
}

impl PlanAdjustment {
    fn new(
        adjustment_type: AdjustmentType,
        reason: impl Into<String>,
        field: &str,
        severity: AdjustmentSeverity,
    ) -> Self {
        Self {
            adjustment_type,
            reason: reason.into(),
            field: field.to_string(),
            severity,
        }
    }
}

/// Scored view of one [`DailyAssessment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentScoreResult {
    pub overall_score: u8,
    pub gi_score: u8,
    pub vital_score: u8,
    pub intake_score: u8,
    pub risk_level: RiskLevel,
    pub warnings: Vec<String>,
    pub feeding_adjustment: FeedingAdjustment,
    pub adjustments: Vec<PlanAdjustment>,
    /// Actual / required energy, when a requirement profile was supplied
    pub energy_ratio: Option<f64>,
    /// Actual / required protein, when a requirement profile was supplied
    pub protein_ratio: Option<f64>,
}

/// Deductions from one scorer.
#[derive(Debug, Default)]
struct SubScore {
    deduction: i32,
    warnings: Vec<String>,
    adjustments: Vec<PlanAdjustment>,
}

impl SubScore {
    fn deduct(&mut self, points: i32) {
        self.deduction += points;
    }

    fn warn(&mut self, points: i32, warning: String) {
        self.deduction += points;
        self.warnings.push(warning);
    }

    fn score(&self) -> u8 {
        // Clamped to 0..=100 so the cast is lossless.
        (100 - self.deduction).clamp(0, 100) as u8
    }
}

fn score_gi(assessment: &DailyAssessment) -> SubScore {
    let gi = &assessment.gi;
    let mut s = SubScore::default();

    let grv = gi.gastric_residual_ml;
    if grv > 500.0 {
        s.warn(40, format!("Gastric residual {grv:.0} mL exceeds 500 mL"));
        s.adjustments.push(PlanAdjustment::new(
            AdjustmentType::Hold,
            format!("Gastric residual {grv:.0} mL > 500 mL: hold feeds and reassess"),
            "volume",
            AdjustmentSeverity::Critical,
        ));
    } else if grv > 300.0 {
        s.warn(25, format!("Gastric residual {grv:.0} mL exceeds 300 mL"));
        s.adjustments.push(PlanAdjustment::new(
            AdjustmentType::Reduce,
            format!("Gastric residual {grv:.0} mL > 300 mL: reduce feeding rate"),
            "volume",
            AdjustmentSeverity::Warning,
        ));
    } else if grv > 200.0 {
        s.warn(10, format!("Gastric residual {grv:.0} mL elevated (> 200 mL)"));
    }

    match gi.vomiting {
        Severity::Severe => {
            s.warn(30, format!("Severe vomiting ({} episodes)", gi.vomiting_episodes));
            s.adjustments.push(PlanAdjustment::new(
                AdjustmentType::Hold,
                "Severe vomiting: hold feeds, consider prokinetic",
                "volume",
                AdjustmentSeverity::Critical,
            ));
        }
        Severity::Moderate => {
            s.warn(15, format!("Moderate vomiting ({} episodes)", gi.vomiting_episodes));
            s.adjustments.push(PlanAdjustment::new(
                AdjustmentType::Reduce,
                "Moderate vomiting: reduce feeding rate",
                "volume",
                AdjustmentSeverity::Warning,
            ));
        }
        Severity::Mild => s.deduct(5),
        Severity::None => {}
    }

    match gi.abdominal_distension {
        Severity::Severe => s.warn(25, "Severe abdominal distension".to_string()),
        Severity::Moderate => s.deduct(10),
        Severity::Mild | Severity::None => {}
    }

    match gi.diarrhea {
        Severity::Severe => {
            s.warn(20, "Severe diarrhea".to_string());
            s.adjustments.push(PlanAdjustment::new(
                AdjustmentType::Switch,
                "Severe diarrhea: consider peptide-based or soluble-fibre formula",
                "formula",
                AdjustmentSeverity::Warning,
            ));
        }
        Severity::Moderate => s.deduct(10),
        Severity::Mild | Severity::None => {}
    }

    match gi.bowel_sounds {
        BowelSounds::Absent => {
            s.warn(20, "Bowel sounds absent".to_string());
            s.adjustments.push(PlanAdjustment::new(
                AdjustmentType::Hold,
                "Absent bowel sounds: suspect ileus, hold enteral feeds",
                "volume",
                AdjustmentSeverity::Critical,
            ));
        }
        BowelSounds::Reduced => s.deduct(5),
        BowelSounds::Present => {}
    }

    if gi.stool_consistency == StoolConsistency::Watery && gi.stool_count > 3 {
        s.warn(15, format!("Watery stool x{}", gi.stool_count));
    }

    if gi.constipation {
        s.warn(5, "Constipation reported".to_string());
    }

    s
}

fn score_vitals(assessment: &DailyAssessment) -> SubScore {
    let v = &assessment.vitals;
    let mut s = SubScore::default();

    let temp = v.temperature_c;
    if temp > 39.0 {
        s.warn(15, format!("High fever {temp:.1}°C"));
    } else if temp > 38.0 {
        s.warn(5, format!("Fever {temp:.1}°C"));
    } else if temp < 35.0 {
        s.warn(15, format!("Hypothermia {temp:.1}°C"));
    }

    let hr = v.heart_rate;
    if !(40.0..=130.0).contains(&hr) {
        s.warn(15, format!("Heart rate {hr:.0} bpm outside 40-130"));
    } else if hr > 110.0 {
        s.deduct(5);
    }

    let spo2 = v.spo2;
    if spo2 < 90.0 {
        s.warn(20, format!("SpO2 {spo2:.0}% below 90%"));
    } else if spo2 < 94.0 {
        s.deduct(5);
    }

    match assessment.consciousness {
        ConsciousnessLevel::Coma => s.warn(25, "Comatose".to_string()),
        ConsciousnessLevel::Stupor => s.warn(15, "Stuporous".to_string()),
        ConsciousnessLevel::Drowsy => s.deduct(5),
        ConsciousnessLevel::Alert => {}
    }

    if assessment.respiratory_status == RespiratoryStatus::Ventilator {
        s.deduct(10);
    }

    match assessment.edema {
        Severity::Severe => s.warn(10, "Severe edema".to_string()),
        Severity::Moderate => s.deduct(5),
        Severity::Mild | Severity::None => {}
    }

    if let Some(rate) = assessment.urine_rate_ml_kg_hr() {
        if rate < 0.5 {
            s.warn(15, format!("Oliguria: urine output {rate:.2} mL/kg/hr"));
        }
    }

    s
}

fn ratio(actual: f64, required: f64) -> Option<f64> {
    (required > 0.0).then(|| actual / required)
}

fn percent(ratio: f64) -> i64 {
    // Display only; ratios are bounded in practice.
    (ratio * 100.0).round() as i64
}

fn score_intake(
    assessment: &DailyAssessment,
    requirements: &NutritionRequirements,
) -> (SubScore, Option<f64>, Option<f64>) {
    let intake = &assessment.intake;
    let mut s = SubScore::default();

    let energy_ratio = ratio(intake.estimated_energy_kcal, requirements.energy_kcal);
    if let Some(r) = energy_ratio {
        let pct = percent(r);
        if r < 0.5 {
            s.warn(40, format!("Energy intake {pct}% of target"));
            s.adjustments.push(PlanAdjustment::new(
                AdjustmentType::Advance,
                format!("Energy intake only {pct}% of target: advance feeds or add supplemental route"),
                "energy",
                AdjustmentSeverity::Critical,
            ));
        } else if r < 0.8 {
            s.deduct(20);
            s.adjustments.push(PlanAdjustment::new(
                AdjustmentType::Advance,
                format!("Energy intake {pct}% of target: advance toward goal"),
                "energy",
                AdjustmentSeverity::Warning,
            ));
        } else if r > 1.2 {
            s.deduct(15);
            s.adjustments.push(PlanAdjustment::new(
                AdjustmentType::Reduce,
                format!("Energy intake {pct}% of target: risk of overfeeding"),
                "energy",
                AdjustmentSeverity::Warning,
            ));
        }
    }

    let protein_ratio = ratio(intake.estimated_protein_g, requirements.protein_g);
    if let Some(r) = protein_ratio {
        let pct = percent(r);
        if r < 0.5 {
            s.warn(30, format!("Protein intake {pct}% of target"));
            s.adjustments.push(PlanAdjustment::new(
                AdjustmentType::Advance,
                format!("Protein intake only {pct}% of target: add protein supplement"),
                "protein",
                AdjustmentSeverity::Critical,
            ));
        } else if r < 0.8 {
            s.deduct(15);
            s.adjustments.push(PlanAdjustment::new(
                AdjustmentType::Advance,
                format!("Protein intake {pct}% of target: increase protein"),
                "protein",
                AdjustmentSeverity::Warning,
            ));
        }
    }

    (s, energy_ratio, protein_ratio)
}

/// Score an assessment with the default policy weights.
///
/// With `requirements = None` the intake sub-score is skipped and reported as 100.
#[must_use]
pub fn score_assessment(
    assessment: &DailyAssessment,
    requirements: Option<&NutritionRequirements>,
) -> AssessmentScoreResult {
    score_assessment_with_policy(assessment, requirements, &PolicyConfig::default())
}

/// Score an assessment using the composite weights from `policy`.
#[must_use]
pub fn score_assessment_with_policy(
    assessment: &DailyAssessment,
    requirements: Option<&NutritionRequirements>,
    policy: &PolicyConfig,
) -> AssessmentScoreResult {
    let gi = score_gi(assessment);
    let vitals = score_vitals(assessment);
    let (intake, energy_ratio, protein_ratio) = match requirements {
        Some(req) => score_intake(assessment, req),
        None => (SubScore::default(), None, None),
    };

    let (gi_score, vital_score, intake_score) = (gi.score(), vitals.score(), intake.score());
    let [w_gi, w_vital, w_intake] = policy.score_weights;
    let composite = f64::from(gi_score) * w_gi
        + f64::from(vital_score) * w_vital
        + f64::from(intake_score) * w_intake;
    let overall_score = composite.round().clamp(0.0, 100.0) as u8;

    let mut warnings = gi.warnings;
    warnings.extend(vitals.warnings);
    warnings.extend(intake.warnings);

    let mut adjustments = gi.adjustments;
    adjustments.extend(intake.adjustments);

    AssessmentScoreResult {
        overall_score,
        gi_score,
        vital_score,
        intake_score,
        risk_level: RiskLevel::from_score(overall_score),
        warnings,
        feeding_adjustment: FeedingAdjustment::from_gi_score(gi_score),
        adjustments,
        energy_ratio,
        protein_ratio,
    }
}
