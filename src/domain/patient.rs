//! Patient biometrics and age classification.
//!
//! Age categories drive the pediatric requirement tables and the weaning
//! phase durations, so the classification rules live next to the patient type.

use serde::{Deserialize, Serialize};

/// Biological sex used by the BMR equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Ward / patient type the patient is admitted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PatientType {
    /// Adult intensive care
    #[default]
    AdultIcu,
    /// Pediatric intensive care
    Picu,
    /// Neonatal intensive care
    Nicu,
    /// General pediatric ward
    GeneralPediatric,
    /// General (adult) ward
    General,
}

impl PatientType {
    /// Whether this ward belongs to the fixed pediatric set.
    #[must_use]
    pub fn is_pediatric_ward(self) -> bool {
        matches!(self, Self::Picu | Self::Nicu | Self::GeneralPediatric)
    }

    /// Parse a ward code. Unknown codes fall back to [`PatientType::AdultIcu`].
    #[must_use]
    pub fn parse(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "picu" => Self::Picu,
            "nicu" => Self::Nicu,
            "pediatric" | "general_pediatric" | "peds" => Self::GeneralPediatric,
            "general" | "ward" => Self::General,
            _ => Self::AdultIcu,
        }
    }
}

/// Developmental age bucket used by the pediatric tables.
///
/// Variants are declared youngest first; the derived ordering is relied on
/// by the requirement tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeCategory {
    Preterm,
    Neonate,
    Infant,
    Toddler,
    Preschool,
    SchoolAge,
    Adolescent,
}

impl AgeCategory {
    /// All categories, youngest first.
    pub const ALL: [AgeCategory; 7] = [
        Self::Preterm,
        Self::Neonate,
        Self::Infant,
        Self::Toddler,
        Self::Preschool,
        Self::SchoolAge,
        Self::Adolescent,
    ];
}

impl std::fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Preterm => "preterm",
            Self::Neonate => "neonate",
            Self::Infant => "infant",
            Self::Toddler => "toddler",
            Self::Preschool => "preschool",
            Self::SchoolAge => "school-age",
            Self::Adolescent => "adolescent",
        };
        f.write_str(label)
    }
}

/// Gestational age below which a patient is classified preterm.
pub const PRETERM_GESTATIONAL_WEEKS: f64 = 37.0;

/// Upper month bounds (exclusive) for each post-term category, evaluated in order.
/// Anything at or above the last bound is [`AgeCategory::Adolescent`].
const AGE_MONTH_RULES: [(f64, AgeCategory); 5] = [
    (1.0, AgeCategory::Neonate),
    (12.0, AgeCategory::Infant),
    (36.0, AgeCategory::Toddler),
    (72.0, AgeCategory::Preschool),
    (144.0, AgeCategory::SchoolAge),
];

/// Patient biometrics and admission context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// Patient identifier (opaque to the engine)
    pub id: Option<String>,

    /// Body weight in kg
    pub weight_kg: f64,

    /// Height / length in cm
    pub height_cm: f64,

    /// Age in completed years
    pub age_years: f64,

    /// Age in months, when charted (infants)
    pub age_months: Option<f64>,

    /// Gestational age at birth in weeks (neonates)
    pub gestational_age_weeks: Option<f64>,

    pub gender: Gender,

    pub patient_type: PatientType,
}

impl Patient {
    /// Create an adult ICU patient with the given biometrics.
    #[must_use]
    pub fn new(weight_kg: f64, height_cm: f64, age_years: f64, gender: Gender) -> Self {
        Self {
            id: None,
            weight_kg,
            height_cm,
            age_years,
            age_months: None,
            gestational_age_weeks: None,
            gender,
            patient_type: PatientType::AdultIcu,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_patient_type(mut self, patient_type: PatientType) -> Self {
        self.patient_type = patient_type;
        self
    }

    #[must_use]
    pub fn with_age_months(mut self, months: f64) -> Self {
        self.age_months = Some(months);
        self
    }

    #[must_use]
    pub fn with_gestational_age(mut self, weeks: f64) -> Self {
        self.gestational_age_weeks = Some(weeks);
        self
    }

    /// Age in months, falling back to `age_years * 12` when not charted.
    #[must_use]
    pub fn effective_age_months(&self) -> f64 {
        self.age_months.unwrap_or(self.age_years * 12.0)
    }

    /// Check biometrics against plausible clinical ranges.
    ///
    /// The calculators never call this; out-of-range input flows through the
    /// arithmetic unchanged. Callers use it for form validation.
    ///
    /// # Errors
    /// Returns every range violation found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(0.3..=350.0).contains(&self.weight_kg) {
            errors.push(format!("Weight {} kg out of range [0.3, 350]", self.weight_kg));
        }
        if !(20.0..=250.0).contains(&self.height_cm) {
            errors.push(format!("Height {} cm out of range [20, 250]", self.height_cm));
        }
        if !(0.0..=120.0).contains(&self.age_years) {
            errors.push(format!("Age {} years out of range [0, 120]", self.age_years));
        }
        if let Some(weeks) = self.gestational_age_weeks {
            if !(22.0..=44.0).contains(&weeks) {
                errors.push(format!("Gestational age {weeks} weeks out of range [22, 44]"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// True when the patient follows the pediatric requirement path.
#[must_use]
pub fn is_pediatric_patient(patient: &Patient) -> bool {
    patient.age_years < 18.0 || patient.patient_type.is_pediatric_ward()
}

/// Classify a patient into an [`AgeCategory`].
///
/// Rules are evaluated top to bottom and the first match wins:
/// 1. gestational age below 37 weeks ⇒ preterm, regardless of age
/// 2. age in months (charted, else years × 12) against [`AGE_MONTH_RULES`]
/// 3. otherwise adolescent
#[must_use]
pub fn get_age_category(patient: &Patient) -> AgeCategory {
    if patient
        .gestational_age_weeks
        .is_some_and(|weeks| weeks < PRETERM_GESTATIONAL_WEEKS)
    {
        return AgeCategory::Preterm;
    }

    let months = patient.effective_age_months();
    AGE_MONTH_RULES
        .iter()
        .find(|(bound, _)| months < *bound)
        .map_or(AgeCategory::Adolescent, |(_, category)| *category)
}
