//! Weaning plan state machine.
//!
//! A plan walks the patient from trophic tube feeds to full oral intake:
//!
//! ```text
//! trophic → advancing → full_enteral → oral_introduction → oral_transition → full_oral → completed
//! ```
//!
//! Each phase carries a route split (enteral/oral/parenteral %), a target
//! duration that depends on the age category, and the criteria for moving on
//! or holding. Plans are values: advancing returns a new plan.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::patient::{get_age_category, AgeCategory, Patient};
use super::round_to;
use super::tolerance::{ToleranceTrend, TrendDirection};
use crate::{NutriguardError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaningPhase {
    /// Pre-state before a plan is generated
    Assessment,
    Trophic,
    Advancing,
    FullEnteral,
    OralIntroduction,
    OralTransition,
    FullOral,
    Completed,
}

impl WeaningPhase {
    /// Phases a generated plan may contain, in order.
    pub const SEQUENCE: [WeaningPhase; 6] = [
        WeaningPhase::Trophic,
        WeaningPhase::Advancing,
        WeaningPhase::FullEnteral,
        WeaningPhase::OralIntroduction,
        WeaningPhase::OralTransition,
        WeaningPhase::FullOral,
    ];

    /// Successor in the fixed sequence. Completed is terminal.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Assessment => Self::Trophic,
            Self::Trophic => Self::Advancing,
            Self::Advancing => Self::FullEnteral,
            Self::FullEnteral => Self::OralIntroduction,
            Self::OralIntroduction => Self::OralTransition,
            Self::OralTransition => Self::FullOral,
            Self::FullOral | Self::Completed => Self::Completed,
        }
    }

    fn index(self) -> Option<usize> {
        Self::SEQUENCE.iter().position(|p| *p == self)
    }
}

impl std::fmt::Display for WeaningPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Assessment => "assessment",
            Self::Trophic => "trophic",
            Self::Advancing => "advancing",
            Self::FullEnteral => "full_enteral",
            Self::OralIntroduction => "oral_introduction",
            Self::OralTransition => "oral_transition",
            Self::FullOral => "full_oral",
            Self::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Route split for each phase: (enteral, oral, parenteral) %.
const ROUTE_PERCENTAGES: [(u8, u8, u8); 6] = [
    (20, 0, 80),
    (60, 0, 40),
    (100, 0, 0),
    (80, 20, 0),
    (50, 50, 0),
    (0, 100, 0),
];

const DEFAULT_DURATIONS: [u32; 6] = [3, 5, 7, 7, 7, 5];

/// Age-specific duration overrides, checked before [`DEFAULT_DURATIONS`].
const DURATION_OVERRIDES: [(AgeCategory, [u32; 6]); 3] = [
    (AgeCategory::Preterm, [7, 10, 14, 14, 14, 7]),
    (AgeCategory::Neonate, [5, 7, 10, 10, 10, 7]),
    (AgeCategory::Infant, [4, 6, 7, 10, 10, 5]),
];

const ADVANCE_CRITERIA: [&[&str]; 6] = [
    &[
        "Tolerance score >= 7 for 2 consecutive days",
        "Gastric residual < 200 mL",
        "No vomiting",
    ],
    &[
        "Reaching 60% of goal volume without intolerance",
        "Stable abdominal examination",
        "Stool pattern normal",
    ],
    &[
        "Full enteral volume tolerated for 48 h",
        "Parenteral nutrition discontinued",
        "Stable weight",
    ],
    &[
        "Safe swallow assessment",
        "Alert and able to protect airway",
        "Oral intake without aspiration signs",
    ],
    &[
        "Oral intake >= 50% of target",
        "Stable or rising weight",
        "No respiratory compromise during feeds",
    ],
    &[
        "Oral intake meets >= 90% of requirements",
        "Weight stable for 1 week",
        "Tube removal approved",
    ],
];

const HOLD_CRITERIA: [&[&str]; 6] = [
    &[
        "Gastric residual > 500 mL",
        "Severe vomiting or abdominal distension",
        "Hemodynamic instability",
    ],
    &[
        "Gastric residual > 300 mL",
        "Moderate to severe vomiting",
        "Diarrhea > 3 watery stools/day",
    ],
    &[
        "Recurrent intolerance at full volume",
        "Electrolyte derangement",
    ],
    &[
        "Coughing or desaturation with oral feeds",
        "Failed swallow assessment",
    ],
    &[
        "Weight loss > 2% in a week",
        "Oral intake falling below 30% of target",
    ],
    &[
        "Weight loss on oral intake alone",
        "Dehydration",
    ],
];

/// Configuration of one phase in a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaningPhaseConfig {
    pub phase: WeaningPhase,
    pub enteral_percent: u8,
    pub oral_percent: u8,
    pub parenteral_percent: u8,
    pub duration_days: u32,
    pub advance_criteria: Vec<String>,
    pub hold_criteria: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaningMilestone {
    pub phase: WeaningPhase,
    pub target_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub criteria: Vec<String>,
    pub met: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaningPlan {
    pub patient_id: Option<String>,
    pub phases: Vec<WeaningPhaseConfig>,
    pub current_phase: WeaningPhase,
    pub milestones: Vec<WeaningMilestone>,
    pub created_date: NaiveDate,
    pub target_completion_date: NaiveDate,
    pub is_active: bool,
}

impl WeaningPlan {
    #[must_use]
    pub fn total_duration_days(&self) -> u32 {
        self.phases.iter().map(|p| p.duration_days).sum()
    }

    /// Config of the phase the patient is in, if it belongs to this plan.
    #[must_use]
    pub fn current_config(&self) -> Option<&WeaningPhaseConfig> {
        self.phases.iter().find(|p| p.phase == self.current_phase)
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.current_phase == WeaningPhase::Completed
    }
}

/// Derived progress view; recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaningProgress {
    pub current_phase: WeaningPhase,
    pub completed_phases: usize,
    pub total_phases: usize,
    pub expected_phases: usize,
    pub days_elapsed: i64,
    pub days_remaining: i64,
    pub is_on_track: bool,
    pub next_milestone: Option<WeaningMilestone>,
    pub percent_complete: f64,
}

/// Recommendation on whether to move to the next phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaningReadiness {
    pub should_advance: bool,
    pub current_phase: WeaningPhase,
    pub next_phase: WeaningPhase,
    pub reasons: Vec<String>,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Build the configuration for one phase at a given age category.
///
/// # Errors
///
/// `UnsupportedPhase` for `Assessment` and `Completed`, which carry no
/// route split.
pub fn get_phase_config(phase: WeaningPhase, category: AgeCategory) -> Result<WeaningPhaseConfig> {
    let idx = phase
        .index()
        .ok_or(NutriguardError::UnsupportedPhase(phase))?;

    let durations = DURATION_OVERRIDES
        .iter()
        .find(|(c, _)| *c == category)
        .map_or(&DEFAULT_DURATIONS, |(_, d)| d);
    let (enteral, oral, parenteral) = ROUTE_PERCENTAGES[idx];

    Ok(WeaningPhaseConfig {
        phase,
        enteral_percent: enteral,
        oral_percent: oral,
        parenteral_percent: parenteral,
        duration_days: durations[idx],
        advance_criteria: to_strings(ADVANCE_CRITERIA[idx]),
        hold_criteria: to_strings(HOLD_CRITERIA[idx]),
    })
}

fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Generate a plan from `start_phase` through full oral feeding.
///
/// Each phase gets a milestone dated at the cumulative end of that phase.
///
/// # Errors
///
/// `UnsupportedPhase` when `start_phase` is `Assessment` or `Completed`.
pub fn generate_default_weaning_plan(
    patient: &Patient,
    start_phase: WeaningPhase,
    today: NaiveDate,
) -> Result<WeaningPlan> {
    let start = start_phase
        .index()
        .ok_or(NutriguardError::UnsupportedPhase(start_phase))?;
    let category = get_age_category(patient);

    let phases = WeaningPhase::SEQUENCE[start..]
        .iter()
        .map(|&phase| get_phase_config(phase, category))
        .collect::<Result<Vec<_>>>()?;

    let mut cumulative = 0u32;
    let milestones = phases
        .iter()
        .map(|config| {
            cumulative += config.duration_days;
            WeaningMilestone {
                phase: config.phase,
                target_date: add_days(today, cumulative),
                completed_date: None,
                criteria: config.advance_criteria.clone(),
                met: false,
            }
        })
        .collect();

    Ok(WeaningPlan {
        patient_id: patient.id.clone(),
        phases,
        current_phase: start_phase,
        milestones,
        created_date: today,
        target_completion_date: add_days(today, cumulative),
        is_active: true,
    })
}

/// Progress of a plan as of `today`.
#[must_use]
pub fn calculate_weaning_progress(plan: &WeaningPlan, today: NaiveDate) -> WeaningProgress {
    let total_phases = plan.phases.len();
    let completed_phases = plan.milestones.iter().filter(|m| m.met).count();
    let total_duration = plan.total_duration_days();

    let days_elapsed = (today - plan.created_date).num_days().max(0);
    let days_remaining = (plan.target_completion_date - today).num_days().max(0);

    let expected_phases = if total_duration == 0 {
        0
    } else {
        let fraction = days_elapsed as f64 / f64::from(total_duration);
        ((fraction * total_phases as f64).floor() as usize).min(total_phases)
    };

    let percent_complete = if total_phases == 0 {
        0.0
    } else {
        round_to(completed_phases as f64 / total_phases as f64 * 100.0, 1)
    };

    WeaningProgress {
        current_phase: plan.current_phase,
        completed_phases,
        total_phases,
        expected_phases,
        days_elapsed,
        days_remaining,
        is_on_track: completed_phases >= expected_phases,
        next_milestone: plan.milestones.iter().find(|m| !m.met).cloned(),
        percent_complete,
    }
}

/// Complete the current phase and move to the next one.
///
/// Unmet milestones of the current phase are stamped with `today`. Moving
/// past full oral completes and deactivates the plan. The input is untouched.
#[must_use]
pub fn advance_plan_phase(plan: &WeaningPlan, today: NaiveDate) -> WeaningPlan {
    let mut next = plan.clone();
    if next.is_completed() {
        return next;
    }

    for milestone in next
        .milestones
        .iter_mut()
        .filter(|m| m.phase == plan.current_phase && !m.met)
    {
        milestone.met = true;
        milestone.completed_date = Some(today);
    }

    next.current_phase = plan.current_phase.next();
    if next.is_completed() {
        next.is_active = false;
    }
    next
}

/// Decide whether the tolerance trend supports advancing the plan.
#[must_use]
pub fn assess_weaning_readiness(plan: &WeaningPlan, trend: &ToleranceTrend) -> WeaningReadiness {
    let mut reasons = Vec::new();

    if !plan.is_active {
        reasons.push("Weaning plan is not active".to_string());
    }
    if plan.is_completed() {
        reasons.push("Weaning plan already completed".to_string());
    }
    if trend.trend == TrendDirection::Worsening {
        reasons.push("Tolerance trend is worsening".to_string());
    }
    if !trend.ready_to_advance {
        reasons.push(format!(
            "Tolerance not yet sufficient: {} consecutive good day(s), average score {:.1}",
            trend.consecutive_good_days, trend.average_score
        ));
    }

    let should_advance = reasons.is_empty();
    if should_advance {
        reasons.push(format!(
            "Tolerance stable: {} consecutive good day(s), average score {:.1}",
            trend.consecutive_good_days, trend.average_score
        ));
    }

    WeaningReadiness {
        should_advance,
        current_phase: plan.current_phase,
        next_phase: plan.current_phase.next(),
        reasons,
    }
}
