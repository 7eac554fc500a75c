//! Daily bedside assessment record.
//!
//! One snapshot per round: vitals, neurological and respiratory state, GI
//! tolerance findings, and what the patient actually received.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Graded clinical finding (vomiting, diarrhea, distension, edema).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    None,
    Mild,
    Moderate,
    Severe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConsciousnessLevel {
    #[default]
    Alert,
    Drowsy,
    Stupor,
    Coma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RespiratoryStatus {
    #[default]
    RoomAir,
    NasalCannula,
    HighFlow,
    NonInvasive,
    /// Invasive mechanical ventilation
    Ventilator,
}

/// What the bedside nurse did with the aspirated gastric residual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GastricResidualAction {
    Continue,
    Reduce,
    Hold,
    /// Residual not checked
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BowelSounds {
    #[default]
    Present,
    Reduced,
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoolConsistency {
    /// No stool this period
    #[default]
    None,
    Hard,
    Formed,
    Soft,
    Loose,
    Watery,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    /// Core temperature in °C
    pub temperature_c: f64,
    /// Beats per minute
    pub heart_rate: f64,
    pub systolic_bp: f64,
    pub diastolic_bp: f64,
    /// Breaths per minute
    pub respiratory_rate: f64,
    /// Oxygen saturation in %
    pub spo2: f64,
}

impl Default for VitalSigns {
    fn default() -> Self {
        Self {
            temperature_c: 36.8,
            heart_rate: 80.0,
            systolic_bp: 120.0,
            diastolic_bp: 75.0,
            respiratory_rate: 16.0,
            spo2: 98.0,
        }
    }
}

/// Gastrointestinal tolerance findings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct GiAssessment {
    /// Gastric residual volume in mL
    pub gastric_residual_ml: f64,
    pub gastric_residual_action: GastricResidualAction,
    pub vomiting: Severity,
    pub vomiting_episodes: u32,
    pub diarrhea: Severity,
    pub abdominal_distension: Severity,
    pub bowel_sounds: BowelSounds,
    pub stool_count: u32,
    pub stool_consistency: StoolConsistency,
    pub constipation: bool,
}

/// Intake delivered over the assessment period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ActualIntake {
    pub enteral_ml: f64,
    pub parenteral_ml: f64,
    pub oral_ml: f64,
    pub iv_fluid_ml: f64,
    pub estimated_energy_kcal: f64,
    pub estimated_protein_g: f64,
}

impl ActualIntake {
    /// Nutritional volume (enteral + parenteral + oral); IV fluids excluded.
    #[must_use]
    pub fn nutrition_volume_ml(&self) -> f64 {
        self.enteral_ml + self.parenteral_ml + self.oral_ml
    }
}

/// A dated bedside assessment. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAssessment {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub vitals: VitalSigns,
    pub consciousness: ConsciousnessLevel,
    pub respiratory_status: RespiratoryStatus,
    pub gi: GiAssessment,
    pub intake: ActualIntake,
    pub body_weight_kg: f64,
    /// Urine output over 24 h in mL
    pub urine_output_ml: f64,
    pub edema: Severity,
    pub notes: String,
}

impl DailyAssessment {
    /// Assessment with unremarkable findings, to be filled in by the caller.
    #[must_use]
    pub fn new(date: NaiveDate, time: NaiveTime, body_weight_kg: f64) -> Self {
        Self {
            date,
            time,
            vitals: VitalSigns::default(),
            consciousness: ConsciousnessLevel::Alert,
            respiratory_status: RespiratoryStatus::RoomAir,
            gi: GiAssessment::default(),
            intake: ActualIntake::default(),
            body_weight_kg,
            // 1 mL/kg/h keeps the oliguria rule quiet by default
            urine_output_ml: body_weight_kg * 24.0,
            edema: Severity::None,
            notes: String::new(),
        }
    }

    /// Urine output rate in mL/kg/h, `None` when weight is not positive.
    #[must_use]
    pub fn urine_rate_ml_kg_hr(&self) -> Option<f64> {
        (self.body_weight_kg > 0.0).then(|| self.urine_output_ml / self.body_weight_kg / 24.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urine_rate() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("Valid date");
        let time = NaiveTime::from_hms_opt(8, 0, 0).expect("Valid time");
        let mut assessment = DailyAssessment::new(date, time, 50.0);
        assessment.urine_output_ml = 600.0;
        assert_eq!(assessment.urine_rate_ml_kg_hr(), Some(0.5));

        assessment.body_weight_kg = 0.0;
        assert_eq!(assessment.urine_rate_ml_kg_hr(), None);
    }

    #[test]
    fn test_nutrition_volume_excludes_iv_fluids() {
        let intake = ActualIntake {
            enteral_ml: 800.0,
            parenteral_ml: 200.0,
            oral_ml: 100.0,
            iv_fluid_ml: 500.0,
            ..ActualIntake::default()
        };
        assert_eq!(intake.nutrition_volume_ml(), 1100.0);
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&RespiratoryStatus::NasalCannula).expect("Should serialize");
        assert_eq!(json, "\"nasal_cannula\"");
    }
}
