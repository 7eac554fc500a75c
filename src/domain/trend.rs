//! Multi-day round history: chart series and overall trend.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::assessment::DailyAssessment;
use super::round_to;
use super::scoring::{AssessmentScoreResult, FeedingAdjustment, RiskLevel};
use super::tolerance::{half_split_trend, TrendDirection};

/// Overall-score movement (points) between halves that counts as a trend.
const OVERALL_TREND_THRESHOLD: f64 = 5.0;

/// An assessment with the score it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub assessment: DailyAssessment,
    pub result: AssessmentScoreResult,
}

impl AssessmentRecord {
    #[must_use]
    pub fn new(assessment: DailyAssessment, result: AssessmentScoreResult) -> Self {
        Self { assessment, result }
    }
}

/// One chart point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSeriesPoint {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub overall_score: u8,
    pub gi_score: u8,
    pub vital_score: u8,
    pub intake_score: u8,
    pub risk_level: RiskLevel,
    pub feeding_adjustment: FeedingAdjustment,
    pub energy_kcal: f64,
    pub protein_g: f64,
    pub body_weight_kg: f64,
}

impl From<&AssessmentRecord> for RoundSeriesPoint {
    fn from(record: &AssessmentRecord) -> Self {
        let a = &record.assessment;
        let r = &record.result;
        Self {
            date: a.date,
            time: a.time,
            overall_score: r.overall_score,
            gi_score: r.gi_score,
            vital_score: r.vital_score,
            intake_score: r.intake_score,
            risk_level: r.risk_level,
            feeding_adjustment: r.feeding_adjustment,
            energy_kcal: a.intake.estimated_energy_kcal,
            protein_g: a.intake.estimated_protein_g,
            body_weight_kg: a.body_weight_kg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Oldest first
    pub series: Vec<RoundSeriesPoint>,
    pub trend: TrendDirection,
    pub average_overall: f64,
    pub days_covered: usize,
    pub latest_risk: Option<RiskLevel>,
    pub hold_count: usize,
    /// Last minus first body weight, with at least two points
    pub weight_change_kg: Option<f64>,
}

/// Summarize a patient's scored rounds. Input order does not matter.
#[must_use]
pub fn summarize_rounds(records: &[AssessmentRecord]) -> RoundSummary {
    let mut series: Vec<RoundSeriesPoint> = records.iter().map(RoundSeriesPoint::from).collect();
    series.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));

    let newest_first: Vec<f64> = series
        .iter()
        .rev()
        .map(|p| f64::from(p.overall_score))
        .collect();
    let trend = half_split_trend(&newest_first, OVERALL_TREND_THRESHOLD);

    let average_overall = if series.is_empty() {
        0.0
    } else {
        round_to(newest_first.iter().sum::<f64>() / series.len() as f64, 1)
    };

    let days_covered = series.iter().map(|p| p.date).collect::<BTreeSet<_>>().len();
    let hold_count = series
        .iter()
        .filter(|p| p.feeding_adjustment == FeedingAdjustment::Hold)
        .count();

    let weight_change_kg = match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() >= 2 => {
            Some(round_to(last.body_weight_kg - first.body_weight_kg, 2))
        }
        _ => None,
    };

    RoundSummary {
        trend,
        average_overall,
        days_covered,
        latest_risk: series.last().map(|p| p.risk_level),
        hold_count,
        weight_change_kg,
        series,
    }
}
