//! Enteral feeding advancement protocol.
//!
//! A day-by-day ramp from a starting fraction of the target volume up to
//! 100 %, with a rate per hour for the pump and bedside notes.

use serde::{Deserialize, Serialize};

use super::requirements::NutritionRequirements;
use super::round_to;

/// Hard cap on ramp length.
pub const MAX_PROTOCOL_DAYS: u32 = 14;

pub const DEFAULT_INFUSION_HOURS: f64 = 20.0;

const STANDARD_START_PERCENT: f64 = 25.0;
const STANDARD_DAILY_INCREASE: f64 = 25.0;
const HIGH_RISK_START_PERCENT: f64 = 15.0;
const HIGH_RISK_DAILY_INCREASE: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingProtocolOptions {
    /// Full daily volume at 100 %
    pub target_volume_ml: f64,
    /// kcal per mL of the formula
    pub energy_density: f64,
    pub infusion_hours: f64,
    pub start_percent: f64,
    pub daily_increase: f64,
    /// Pump rate ceiling in mL/h, defaults to the target rate
    pub max_rate_ml_hr: Option<f64>,
    /// Refeeding risk
    pub is_high_risk: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProtocolStep {
    pub day: u32,
    pub percent: f64,
    pub volume_ml: f64,
    pub rate_ml_hr: f64,
    pub energy_kcal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingProtocol {
    pub target_volume_ml: f64,
    pub target_energy_kcal: f64,
    pub infusion_hours: f64,
    pub is_high_risk: bool,
    pub steps: Vec<ProtocolStep>,
    pub notes: Vec<String>,
}

impl FeedingProtocol {
    /// Days until the target volume is reached.
    #[must_use]
    pub fn days_to_target(&self) -> u32 {
        self.steps.last().map_or(0, |s| s.day)
    }
}

fn step(day: u32, percent: f64, opts: &FeedingProtocolOptions) -> ProtocolStep {
    let volume_ml = (opts.target_volume_ml * percent / 100.0).round();
    let rate_ml_hr = if opts.infusion_hours > 0.0 {
        let ceiling = opts
            .max_rate_ml_hr
            .unwrap_or(opts.target_volume_ml / opts.infusion_hours);
        round_to((volume_ml / opts.infusion_hours).min(ceiling), 1)
    } else {
        0.0
    };

    ProtocolStep {
        day,
        percent,
        volume_ml,
        rate_ml_hr,
        energy_kcal: (volume_ml * opts.energy_density).round(),
    }
}

fn protocol_notes(opts: &FeedingProtocolOptions, target_energy_kcal: f64) -> Vec<String> {
    let mut notes = vec![
        format!(
            "Target: {:.0} mL/day ({:.0} kcal/day)",
            opts.target_volume_ml, target_energy_kcal
        ),
        format!("Infuse over {:.0} hours per day", opts.infusion_hours),
        "Check gastric residual every 4-6 h; hold advancement if GRV > 500 mL, reduce rate if GRV > 300 mL".to_string(),
        "If diarrhea develops, hold advancement and review formula and medications before reducing".to_string(),
    ];

    if opts.is_high_risk {
        notes.push("Refeeding risk: give thiamine 100 mg daily before and during the first days of feeding".to_string());
        notes.push("Monitor phosphate, potassium and magnesium daily for the first 3 days; replace as needed".to_string());
        notes.push("Restrict fluids and watch for edema and fluid overload while advancing".to_string());
    }

    notes
}

/// Build a daily ramp. The options are only read.
///
/// Percent starts at `start_percent` and grows by `daily_increase` per day.
/// The first day at or above 100 % is emitted at exactly 100 % and ends the
/// ramp; a non-advancing ramp stops at [`MAX_PROTOCOL_DAYS`].
#[must_use]
pub fn generate_feeding_protocol(opts: &FeedingProtocolOptions) -> FeedingProtocol {
    let mut steps = Vec::new();
    let mut percent = opts.start_percent;

    for day in 1..=MAX_PROTOCOL_DAYS {
        if percent >= 100.0 {
            steps.push(step(day, 100.0, opts));
            break;
        }
        steps.push(step(day, percent, opts));
        percent += opts.daily_increase;
    }

    let target_energy_kcal = (opts.target_volume_ml * opts.energy_density).round();

    FeedingProtocol {
        target_volume_ml: opts.target_volume_ml,
        target_energy_kcal,
        infusion_hours: opts.infusion_hours,
        is_high_risk: opts.is_high_risk,
        notes: protocol_notes(opts, target_energy_kcal),
        steps,
    }
}

/// Derive ramp options from a requirement profile, then build the ramp.
///
/// High-risk patients start at 15 % and advance 15 % a day; others 25 %.
#[must_use]
pub fn create_protocol_from_requirements(
    requirements: &NutritionRequirements,
    energy_density: f64,
    is_high_risk: bool,
) -> FeedingProtocol {
    let target_volume_ml = if energy_density > 0.0 {
        (requirements.energy_kcal / energy_density).round()
    } else {
        0.0
    };
    let (start_percent, daily_increase) = if is_high_risk {
        (HIGH_RISK_START_PERCENT, HIGH_RISK_DAILY_INCREASE)
    } else {
        (STANDARD_START_PERCENT, STANDARD_DAILY_INCREASE)
    };

    generate_feeding_protocol(&FeedingProtocolOptions {
        target_volume_ml,
        energy_density,
        infusion_hours: DEFAULT_INFUSION_HOURS,
        start_percent,
        daily_increase,
        max_rate_ml_hr: None,
        is_high_risk,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_options() -> FeedingProtocolOptions {
        FeedingProtocolOptions {
            target_volume_ml: 1600.0,
            energy_density: 1.0,
            infusion_hours: 20.0,
            start_percent: 25.0,
            daily_increase: 25.0,
            max_rate_ml_hr: None,
            is_high_risk: false,
        }
    }

    #[test]
    fn test_standard_ramp_has_four_steps() {
        let opts = standard_options();
        let snapshot = opts.clone();
        let protocol = generate_feeding_protocol(&opts);

        assert_eq!(protocol.steps.len(), 4);
        let percents: Vec<f64> = protocol.steps.iter().map(|s| s.percent).collect();
        assert_eq!(percents, vec![25.0, 50.0, 75.0, 100.0]);
        assert_eq!(protocol.days_to_target(), 4);
        assert_eq!(opts, snapshot);

        let first = protocol.steps[0];
        assert_eq!(first.volume_ml, 400.0);
        assert_eq!(first.rate_ml_hr, 20.0);
        assert_eq!(first.energy_kcal, 400.0);

        let last = protocol.steps[3];
        assert_eq!(last.volume_ml, 1600.0);
        assert_eq!(last.rate_ml_hr, 80.0);
        assert_eq!(protocol.target_energy_kcal, 1600.0);
    }

    #[test]
    fn test_final_step_clamped_to_100() {
        let opts = FeedingProtocolOptions {
            start_percent: 30.0,
            daily_increase: 30.0,
            ..standard_options()
        };
        let protocol = generate_feeding_protocol(&opts);
        let percents: Vec<f64> = protocol.steps.iter().map(|s| s.percent).collect();
        assert_eq!(percents, vec![30.0, 60.0, 90.0, 100.0]);
    }

    #[test]
    fn test_start_at_full_is_single_step() {
        let opts = FeedingProtocolOptions {
            start_percent: 120.0,
            ..standard_options()
        };
        let protocol = generate_feeding_protocol(&opts);
        assert_eq!(protocol.steps.len(), 1);
        assert_eq!(protocol.steps[0].percent, 100.0);
        assert_eq!(protocol.steps[0].day, 1);
    }

    #[test]
    fn test_stalled_ramp_stops_at_day_cap() {
        let opts = FeedingProtocolOptions {
            daily_increase: 0.0,
            ..standard_options()
        };
        let protocol = generate_feeding_protocol(&opts);
        assert_eq!(protocol.steps.len(), MAX_PROTOCOL_DAYS as usize);
    }

    #[test]
    fn test_max_rate_caps_pump() {
        let opts = FeedingProtocolOptions {
            max_rate_ml_hr: Some(50.0),
            ..standard_options()
        };
        let protocol = generate_feeding_protocol(&opts);
        assert_eq!(protocol.steps[0].rate_ml_hr, 20.0);
        assert_eq!(protocol.steps[3].rate_ml_hr, 50.0);
    }

    #[test]
    fn test_high_risk_notes() {
        let standard = generate_feeding_protocol(&standard_options());
        let risky = generate_feeding_protocol(&FeedingProtocolOptions {
            is_high_risk: true,
            ..standard_options()
        });
        assert_eq!(standard.notes.len(), 4);
        assert_eq!(risky.notes.len(), 7);
        assert!(risky.notes.iter().any(|n| n.contains("thiamine")));
    }

    #[test]
    fn test_from_requirements() {
        let requirements = NutritionRequirements {
            energy_kcal: 1800.0,
            ..NutritionRequirements::default()
        };

        let standard = create_protocol_from_requirements(&requirements, 1.5, false);
        assert_eq!(standard.target_volume_ml, 1200.0);
        assert_eq!(standard.infusion_hours, 20.0);
        assert_eq!(standard.steps[0].percent, 25.0);
        assert_eq!(standard.steps.len(), 4);

        let risky = create_protocol_from_requirements(&requirements, 1.5, true);
        assert_eq!(risky.steps[0].percent, 15.0);
        // 15, 30, 45, 60, 75, 90, then 100
        assert_eq!(risky.steps.len(), 7);
        assert!(risky.is_high_risk);
    }
}
