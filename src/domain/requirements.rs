//! Nutrient requirement calculation for adult and pediatric patients.
//!
//! Adults: Harris-Benedict BMR × activity × stress, macronutrients split by
//! route. Pediatrics: per-kg targets by age category × stress.
//! Electrolytes and trace elements are fixed per-kg multipliers on both paths.

use serde::{Deserialize, Serialize};

use super::patient::{get_age_category, is_pediatric_patient, AgeCategory, Gender, Patient};
use super::round_to;

/// Delivery route of the feeding regimen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NutritionType {
    #[default]
    Enteral,
    Parenteral,
}

/// Physical activity level for the adult energy equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    #[default]
    Bedrest,
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    #[must_use]
    pub fn factor(self) -> f64 {
        match self {
            Self::Bedrest => 1.0,
            Self::Sedentary => 1.1,
            Self::Light => 1.2,
            Self::Moderate => 1.3,
            Self::Active => 1.4,
            Self::VeryActive => 1.5,
        }
    }

    /// Parse free text. Unrecognized values degrade to [`ActivityLevel::Bedrest`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "bedrest" | "bed_rest" => Self::Bedrest,
            "sedentary" => Self::Sedentary,
            "light" => Self::Light,
            "moderate" => Self::Moderate,
            "active" => Self::Active,
            "very_active" | "veryactive" => Self::VeryActive,
            _ => Self::Bedrest,
        }
    }
}

/// Metabolic stress level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StressLevel {
    Mild,
    #[default]
    Moderate,
    Severe,
    Critical,
}

impl StressLevel {
    /// Stress multiplier on adult total energy.
    #[must_use]
    pub fn adult_factor(self) -> f64 {
        match self {
            Self::Mild => 1.1,
            Self::Moderate => 1.2,
            Self::Severe => 1.4,
            Self::Critical => 1.6,
        }
    }

    /// Stress multiplier on pediatric per-kg energy and protein targets.
    #[must_use]
    pub fn pediatric_factor(self) -> f64 {
        match self {
            Self::Mild => 1.0,
            Self::Moderate => 1.1,
            Self::Severe => 1.3,
            Self::Critical => 1.5,
        }
    }

    /// Parse free text. Unrecognized values degrade to [`StressLevel::Moderate`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "mild" | "low" => Self::Mild,
            "moderate" => Self::Moderate,
            "severe" | "high" => Self::Severe,
            "critical" => Self::Critical,
            _ => Self::Moderate,
        }
    }
}

/// Clinical condition driving a requirement adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicalCondition {
    RenalFailure,
    LiverFailure,
    HeartFailure,
    Diabetes,
    InflammatoryBowelDisease,
    Trauma,
    Surgery,
    /// Anything not in the adjustment table; requirements pass through unchanged.
    Unrecognized,
}

impl ClinicalCondition {
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "renal_failure" | "renal" | "ckd" | "aki" => Self::RenalFailure,
            "liver_failure" | "hepatic_failure" | "liver" => Self::LiverFailure,
            "heart_failure" | "chf" | "cardiac" => Self::HeartFailure,
            "diabetes" | "dm" => Self::Diabetes,
            "ibd" | "inflammatory_bowel_disease" => Self::InflammatoryBowelDisease,
            "trauma" => Self::Trauma,
            "surgery" | "post_op" | "postoperative" => Self::Surgery,
            _ => Self::Unrecognized,
        }
    }
}

/// Daily nutrient targets.
///
/// Units: energy kcal; macronutrients g; electrolytes mEq; iron, zinc,
/// copper, manganese mg; iodine, selenium µg. All values are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct NutritionRequirements {
    pub energy_kcal: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbohydrate_g: f64,

    pub sodium_meq: f64,
    pub potassium_meq: f64,
    pub calcium_meq: f64,
    pub magnesium_meq: f64,
    pub phosphorus_meq: f64,
    pub chloride_meq: f64,

    pub iron_mg: f64,
    pub zinc_mg: f64,
    pub copper_mg: f64,
    pub manganese_mg: f64,
    pub iodine_ug: f64,
    pub selenium_ug: f64,
}

impl NutritionRequirements {
    /// Apply the reporting precision: energy integer, macronutrients and
    /// electrolytes one decimal, trace elements two decimals.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            energy_kcal: self.energy_kcal.round(),
            protein_g: round_to(self.protein_g, 1),
            fat_g: round_to(self.fat_g, 1),
            carbohydrate_g: round_to(self.carbohydrate_g, 1),
            sodium_meq: round_to(self.sodium_meq, 1),
            potassium_meq: round_to(self.potassium_meq, 1),
            calcium_meq: round_to(self.calcium_meq, 1),
            magnesium_meq: round_to(self.magnesium_meq, 1),
            phosphorus_meq: round_to(self.phosphorus_meq, 1),
            chloride_meq: round_to(self.chloride_meq, 1),
            iron_mg: round_to(self.iron_mg, 2),
            zinc_mg: round_to(self.zinc_mg, 2),
            copper_mg: round_to(self.copper_mg, 2),
            manganese_mg: round_to(self.manganese_mg, 2),
            iodine_ug: round_to(self.iodine_ug, 2),
            selenium_ug: round_to(self.selenium_ug, 2),
        }
    }

    /// All sixteen targets in declaration order.
    #[must_use]
    pub fn values(&self) -> [f64; 16] {
        [
            self.energy_kcal,
            self.protein_g,
            self.fat_g,
            self.carbohydrate_g,
            self.sodium_meq,
            self.potassium_meq,
            self.calcium_meq,
            self.magnesium_meq,
            self.phosphorus_meq,
            self.chloride_meq,
            self.iron_mg,
            self.zinc_mg,
            self.copper_mg,
            self.manganese_mg,
            self.iodine_ug,
            self.selenium_ug,
        ]
    }
}

/// Per-kg requirement band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerKgRange {
    pub min: f64,
    pub max: f64,
    pub target: f64,
}

const fn per_kg(min: f64, max: f64, target: f64) -> PerKgRange {
    PerKgRange { min, max, target }
}

/// Energy kcal/kg/day by age category.
pub const ENERGY_REQUIREMENTS: [(AgeCategory, PerKgRange); 7] = [
    (AgeCategory::Preterm, per_kg(110.0, 135.0, 120.0)),
    (AgeCategory::Neonate, per_kg(100.0, 120.0, 110.0)),
    (AgeCategory::Infant, per_kg(90.0, 110.0, 100.0)),
    (AgeCategory::Toddler, per_kg(75.0, 90.0, 82.0)),
    (AgeCategory::Preschool, per_kg(65.0, 80.0, 72.0)),
    (AgeCategory::SchoolAge, per_kg(50.0, 70.0, 60.0)),
    (AgeCategory::Adolescent, per_kg(30.0, 50.0, 40.0)),
];

/// Protein g/kg/day by age category.
pub const PROTEIN_REQUIREMENTS: [(AgeCategory, PerKgRange); 7] = [
    (AgeCategory::Preterm, per_kg(3.5, 4.5, 4.0)),
    (AgeCategory::Neonate, per_kg(2.5, 3.5, 3.0)),
    (AgeCategory::Infant, per_kg(2.0, 3.0, 2.5)),
    (AgeCategory::Toddler, per_kg(1.5, 2.5, 2.0)),
    (AgeCategory::Preschool, per_kg(1.5, 2.0, 1.8)),
    (AgeCategory::SchoolAge, per_kg(1.2, 1.8, 1.5)),
    (AgeCategory::Adolescent, per_kg(1.0, 1.5, 1.2)),
];

fn lookup(table: &[(AgeCategory, PerKgRange); 7], category: AgeCategory) -> PerKgRange {
    table
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, range)| *range)
        // Every category has a row; the fallback is the oldest bucket.
        .unwrap_or(table[6].1)
}

/// Energy band for an age category.
#[must_use]
pub fn energy_per_kg(category: AgeCategory) -> PerKgRange {
    lookup(&ENERGY_REQUIREMENTS, category)
}

/// Protein band for an age category.
#[must_use]
pub fn protein_per_kg(category: AgeCategory) -> PerKgRange {
    lookup(&PROTEIN_REQUIREMENTS, category)
}

/// Per-kg electrolyte and trace element multipliers.
#[derive(Debug, Clone, Copy)]
struct Micronutrients {
    sodium: f64,
    potassium: f64,
    calcium: f64,
    magnesium: f64,
    phosphorus: f64,
    chloride: f64,
    iron: f64,
    zinc: f64,
    copper: f64,
    manganese: f64,
    iodine: f64,
    selenium: f64,
}

const ADULT_MICRONUTRIENTS: Micronutrients = Micronutrients {
    sodium: 1.5,
    potassium: 1.0,
    calcium: 0.5,
    magnesium: 0.3,
    phosphorus: 0.8,
    chloride: 1.2,
    iron: 0.1,
    zinc: 0.05,
    copper: 0.01,
    manganese: 0.005,
    iodine: 1.5,
    selenium: 1.0,
};

const PEDIATRIC_MICRONUTRIENTS: Micronutrients = Micronutrients {
    sodium: 3.0,
    potassium: 2.5,
    calcium: 1.5,
    magnesium: 0.4,
    phosphorus: 1.2,
    chloride: 3.0,
    iron: 1.0,
    zinc: 0.4,
    copper: 0.02,
    manganese: 0.01,
    iodine: 1.0,
    selenium: 2.0,
};

/// Basal metabolic rate (kcal/day) by the Harris-Benedict equation.
#[must_use]
pub fn calculate_basal_metabolic_rate(patient: &Patient) -> f64 {
    let (w, h, a) = (patient.weight_kg, patient.height_cm, patient.age_years);
    match patient.gender {
        Gender::Male => 66.5 + 13.75 * w + 5.003 * h - 6.775 * a,
        Gender::Female => 655.1 + 9.563 * w + 1.85 * h - 4.676 * a,
    }
}

/// Pediatric BMR (kcal/day) by the Schofield weight-and-height equations.
///
/// `height_cm` is converted to metres. Result is rounded to one decimal.
#[must_use]
pub fn calculate_schofield_bmr(weight_kg: f64, height_cm: f64, age_years: f64, gender: Gender) -> f64 {
    let w = weight_kg;
    let h = height_cm / 100.0;

    let bmr = match (gender, age_years) {
        (Gender::Male, a) if a < 3.0 => 0.167 * w + 1517.4 * h - 617.6,
        (Gender::Male, a) if a < 10.0 => 19.59 * w + 130.3 * h + 414.9,
        (Gender::Male, _) => 16.25 * w + 137.2 * h + 515.5,
        (Gender::Female, a) if a < 3.0 => 16.252 * w + 1023.2 * h - 413.5,
        (Gender::Female, a) if a < 10.0 => 16.969 * w + 161.8 * h + 371.2,
        (Gender::Female, _) => 8.365 * w + 465.0 * h + 200.0,
    };

    round_to(bmr, 1)
}

/// Adult total energy expenditure (kcal/day), unrounded.
#[must_use]
pub fn calculate_total_energy_requirement(
    patient: &Patient,
    activity: ActivityLevel,
    stress: StressLevel,
) -> f64 {
    calculate_basal_metabolic_rate(patient) * activity.factor() * stress.adult_factor()
}

/// Compute the daily requirement profile for a patient.
///
/// Dispatches to the pediatric path when [`is_pediatric_patient`] holds.
#[must_use]
pub fn calculate_nutrition_requirements(
    patient: &Patient,
    nutrition_type: NutritionType,
    activity: ActivityLevel,
    stress: StressLevel,
) -> NutritionRequirements {
    if is_pediatric_patient(patient) {
        pediatric_requirements(patient, nutrition_type, stress)
    } else {
        adult_requirements(patient, nutrition_type, activity, stress)
    }
}

fn adult_requirements(
    patient: &Patient,
    nutrition_type: NutritionType,
    activity: ActivityLevel,
    stress: StressLevel,
) -> NutritionRequirements {
    let energy = calculate_total_energy_requirement(patient, activity, stress);

    let (protein_per_kg, fat_fraction) = match nutrition_type {
        NutritionType::Enteral => (1.5, 0.30),
        NutritionType::Parenteral => (1.2, 0.25),
    };

    let protein = patient.weight_kg * protein_per_kg;
    build_profile(patient.weight_kg, energy, protein, fat_fraction, &ADULT_MICRONUTRIENTS)
}

fn pediatric_requirements(
    patient: &Patient,
    nutrition_type: NutritionType,
    stress: StressLevel,
) -> NutritionRequirements {
    let category = get_age_category(patient);
    let factor = stress.pediatric_factor();

    let energy = patient.weight_kg * energy_per_kg(category).target * factor;
    let protein = patient.weight_kg * protein_per_kg(category).target * factor;

    let fat_fraction = match nutrition_type {
        NutritionType::Enteral => 0.35,
        NutritionType::Parenteral => 0.30,
    };

    build_profile(patient.weight_kg, energy, protein, fat_fraction, &PEDIATRIC_MICRONUTRIENTS)
}

fn build_profile(
    weight: f64,
    energy: f64,
    protein: f64,
    fat_fraction: f64,
    micro: &Micronutrients,
) -> NutritionRequirements {
    let fat = energy * fat_fraction / 9.0;
    let carbohydrate = ((energy - protein * 4.0 - fat * 9.0) / 4.0).max(0.0);

    NutritionRequirements {
        energy_kcal: energy,
        protein_g: protein,
        fat_g: fat,
        carbohydrate_g: carbohydrate,
        sodium_meq: weight * micro.sodium,
        potassium_meq: weight * micro.potassium,
        calcium_meq: weight * micro.calcium,
        magnesium_meq: weight * micro.magnesium,
        phosphorus_meq: weight * micro.phosphorus,
        chloride_meq: weight * micro.chloride,
        iron_mg: weight * micro.iron,
        zinc_mg: weight * micro.zinc,
        copper_mg: weight * micro.copper,
        manganese_mg: weight * micro.manganese,
        iodine_ug: weight * micro.iodine,
        selenium_ug: weight * micro.selenium,
    }
    .rounded()
}

/// Return a copy of `requirements` adjusted for a clinical condition.
///
/// The input is never modified; an unrecognized condition yields an equal copy.
#[must_use]
pub fn adjust_requirements_for_condition(
    requirements: &NutritionRequirements,
    condition: ClinicalCondition,
) -> NutritionRequirements {
    let mut adjusted = *requirements;

    match condition {
        ClinicalCondition::RenalFailure => {
            adjusted.protein_g *= 0.8;
            adjusted.potassium_meq *= 0.5;
            adjusted.phosphorus_meq *= 0.5;
        }
        ClinicalCondition::LiverFailure => {
            adjusted.protein_g *= 0.8;
            adjusted.sodium_meq *= 0.5;
        }
        ClinicalCondition::HeartFailure => {
            adjusted.sodium_meq *= 0.5;
            adjusted.energy_kcal *= 0.9;
        }
        ClinicalCondition::Diabetes => {
            adjusted.carbohydrate_g *= 0.8;
            adjusted.fat_g *= 1.1;
        }
        ClinicalCondition::InflammatoryBowelDisease => {
            adjusted.protein_g *= 1.2;
            adjusted.energy_kcal *= 1.1;
        }
        ClinicalCondition::Trauma | ClinicalCondition::Surgery => {
            adjusted.protein_g *= 1.3;
            adjusted.energy_kcal *= 1.2;
        }
        ClinicalCondition::Unrecognized => return adjusted,
    }

    adjusted.rounded()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::patient::PatientType;

    fn adult_male() -> Patient {
        Patient::new(70.0, 170.0, 60.0, Gender::Male)
    }

    #[test]
    fn test_harris_benedict_male() {
        let expected = 66.5 + 13.75 * 70.0 + 5.003 * 170.0 - 6.775 * 60.0;
        assert_eq!(calculate_basal_metabolic_rate(&adult_male()), expected);
    }

    #[test]
    fn test_harris_benedict_female() {
        let patient = Patient::new(60.0, 160.0, 45.0, Gender::Female);
        let expected = 655.1 + 9.563 * 60.0 + 1.85 * 160.0 - 4.676 * 45.0;
        assert_eq!(calculate_basal_metabolic_rate(&patient), expected);
    }

    #[test]
    fn test_schofield_bands() {
        // 2-year-old boy, 12 kg, 86 cm
        let expected = round_to(0.167 * 12.0 + 1517.4 * 0.86 - 617.6, 1);
        assert_eq!(calculate_schofield_bmr(12.0, 86.0, 2.0, Gender::Male), expected);

        let girl = calculate_schofield_bmr(25.0, 125.0, 8.0, Gender::Female);
        assert_eq!(girl, round_to(16.969 * 25.0 + 161.8 * 1.25 + 371.2, 1));

        let teen = calculate_schofield_bmr(50.0, 160.0, 14.0, Gender::Female);
        assert_eq!(teen, round_to(8.365 * 50.0 + 465.0 * 1.6 + 200.0, 1));
    }

    #[test]
    fn test_unknown_levels_fall_back() {
        assert_eq!(ActivityLevel::parse("marathon"), ActivityLevel::Bedrest);
        assert_eq!(ActivityLevel::parse("very-active"), ActivityLevel::VeryActive);
        assert_eq!(StressLevel::parse("extreme"), StressLevel::Moderate);
        assert_eq!(StressLevel::parse("CRITICAL"), StressLevel::Critical);
    }

    #[test]
    fn test_total_energy_uses_both_factors() {
        let bmr = calculate_basal_metabolic_rate(&adult_male());
        let total = calculate_total_energy_requirement(
            &adult_male(),
            ActivityLevel::Light,
            StressLevel::Severe,
        );
        assert!((total - bmr * 1.2 * 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_adult_enteral_profile() {
        let req = calculate_nutrition_requirements(
            &adult_male(),
            NutritionType::Enteral,
            ActivityLevel::Bedrest,
            StressLevel::Moderate,
        );
        let energy = (calculate_basal_metabolic_rate(&adult_male()) * 1.2).round();

        assert_eq!(req.energy_kcal, energy);
        assert_eq!(req.protein_g, 105.0);
        assert_eq!(req.sodium_meq, 105.0);
        assert_eq!(req.iron_mg, 7.0);
        assert_eq!(req.manganese_mg, 0.35);
        assert_eq!(req.iodine_ug, 105.0);
        // Macro energy should add back up to the total within rounding.
        let macro_energy = req.protein_g * 4.0 + req.fat_g * 9.0 + req.carbohydrate_g * 4.0;
        assert!((macro_energy - req.energy_kcal).abs() < 2.0);
    }

    #[test]
    fn test_adult_parenteral_uses_lower_protein_and_fat() {
        let enteral = calculate_nutrition_requirements(
            &adult_male(),
            NutritionType::Enteral,
            ActivityLevel::Bedrest,
            StressLevel::Moderate,
        );
        let parenteral = calculate_nutrition_requirements(
            &adult_male(),
            NutritionType::Parenteral,
            ActivityLevel::Bedrest,
            StressLevel::Moderate,
        );
        assert_eq!(parenteral.protein_g, 84.0);
        assert!(parenteral.fat_g < enteral.fat_g);
        assert!(parenteral.carbohydrate_g > enteral.carbohydrate_g);
    }

    #[test]
    fn test_pediatric_path_uses_category_tables() {
        let infant = Patient::new(6.0, 65.0, 0.0, Gender::Female)
            .with_age_months(6.0)
            .with_patient_type(PatientType::Picu);

        let req = calculate_nutrition_requirements(
            &infant,
            NutritionType::Enteral,
            ActivityLevel::Bedrest,
            StressLevel::Mild,
        );
        assert_eq!(req.energy_kcal, 600.0);
        assert_eq!(req.protein_g, 15.0);
        assert_eq!(req.sodium_meq, 18.0);

        let stressed = calculate_nutrition_requirements(
            &infant,
            NutritionType::Enteral,
            ActivityLevel::Bedrest,
            StressLevel::Critical,
        );
        assert_eq!(stressed.energy_kcal, 900.0);
        // Electrolytes do not scale with stress.
        assert_eq!(stressed.sodium_meq, req.sodium_meq);
    }

    #[test]
    fn test_targets_decrease_with_age() {
        for pair in AgeCategory::ALL.windows(2) {
            assert!(energy_per_kg(pair[0]).target > energy_per_kg(pair[1]).target);
            assert!(protein_per_kg(pair[0]).target > protein_per_kg(pair[1]).target);
        }
    }

    #[test]
    fn test_condition_adjustments() {
        let base = calculate_nutrition_requirements(
            &adult_male(),
            NutritionType::Enteral,
            ActivityLevel::Bedrest,
            StressLevel::Moderate,
        );

        let renal = adjust_requirements_for_condition(&base, ClinicalCondition::RenalFailure);
        assert_eq!(renal.protein_g, round_to(base.protein_g * 0.8, 1));
        assert_eq!(renal.potassium_meq, round_to(base.potassium_meq * 0.5, 1));
        assert_eq!(renal.energy_kcal, base.energy_kcal);

        let trauma = adjust_requirements_for_condition(&base, ClinicalCondition::parse("trauma"));
        assert_eq!(trauma.energy_kcal, (base.energy_kcal * 1.2).round());

        let heart = adjust_requirements_for_condition(&base, ClinicalCondition::HeartFailure);
        assert_eq!(heart.sodium_meq, round_to(base.sodium_meq * 0.5, 1));
    }

    #[test]
    fn test_unrecognized_condition_returns_equal_copy() {
        let base = calculate_nutrition_requirements(
            &adult_male(),
            NutritionType::Enteral,
            ActivityLevel::Bedrest,
            StressLevel::Moderate,
        );
        let snapshot = base;
        let adjusted =
            adjust_requirements_for_condition(&base, ClinicalCondition::parse("sprained ankle"));
        assert_eq!(adjusted, base);
        assert_eq!(base, snapshot);
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use crate::domain::patient::PatientType;
    use proptest::prelude::*;

    fn gender() -> impl Strategy<Value = Gender> {
        prop_oneof![Just(Gender::Male), Just(Gender::Female)]
    }

    proptest! {
        /// Harris-Benedict must be reproduced exactly for either branch
        #[test]
        fn bmr_matches_harris_benedict(
            weight in 30.0..200.0f64,
            height in 120.0..210.0f64,
            age in 18.0..100.0f64,
            gender in gender(),
        ) {
            let patient = Patient::new(weight, height, age, gender);
            let expected = match gender {
                Gender::Male => 66.5 + 13.75 * weight + 5.003 * height - 6.775 * age,
                Gender::Female => 655.1 + 9.563 * weight + 1.85 * height - 4.676 * age,
            };
            prop_assert_eq!(calculate_basal_metabolic_rate(&patient), expected);
        }

        /// Adult profiles are strictly positive across physiologic ranges
        #[test]
        fn adult_requirements_positive(
            weight in 40.0..150.0f64,
            height in 140.0..200.0f64,
            age in 18.0..90.0f64,
            gender in gender(),
            parenteral in any::<bool>(),
        ) {
            let route = if parenteral { NutritionType::Parenteral } else { NutritionType::Enteral };
            let req = calculate_nutrition_requirements(
                &Patient::new(weight, height, age, gender),
                route,
                ActivityLevel::Bedrest,
                StressLevel::Mild,
            );
            for value in req.values() {
                prop_assert!(value > 0.0, "non-positive field in {:?}", req);
            }
        }

        /// Pediatric profiles are strictly positive for any positive biometrics
        #[test]
        fn pediatric_requirements_positive(
            weight in 1.0..80.0f64,
            height in 35.0..180.0f64,
            months in 0.0..216.0f64,
            gender in gender(),
        ) {
            let patient = Patient::new(weight, height, months / 12.0, gender)
                .with_age_months(months)
                .with_patient_type(PatientType::Picu);
            let req = calculate_nutrition_requirements(
                &patient,
                NutritionType::Enteral,
                ActivityLevel::Bedrest,
                StressLevel::Moderate,
            );
            for value in req.values() {
                prop_assert!(value > 0.0, "non-positive field in {:?}", req);
            }
        }
    }
}
