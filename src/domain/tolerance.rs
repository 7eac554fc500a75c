//! Feeding tolerance scoring (0-10) and trend detection over the series.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::assessment::{
    BowelSounds, GastricResidualAction, GiAssessment, Severity, StoolConsistency,
};
use super::round_to;
use super::scoring::FeedingAdjustment;

/// Score at or above which a day counts as well tolerated.
pub const GOOD_TOLERANCE_SCORE: u8 = 7;

/// Minimum run of good days before advancing.
pub const GOOD_DAYS_TO_ADVANCE: u32 = 2;

/// One GI tolerance observation with its derived score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToleranceEntry {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub gastric_residual_ml: f64,
    pub gastric_residual_action: GastricResidualAction,
    pub vomiting: Severity,
    pub abdominal_distension: Severity,
    pub bowel_sounds: BowelSounds,
    pub stool_count: u32,
    pub stool_consistency: StoolConsistency,
    pub score: u8,
    pub feeding_adjustment: FeedingAdjustment,
}

impl ToleranceEntry {
    /// Build a scored entry from the GI section of a daily assessment.
    #[must_use]
    pub fn from_gi_assessment(date: NaiveDate, time: NaiveTime, gi: &GiAssessment) -> Self {
        let mut entry = Self {
            date,
            time,
            gastric_residual_ml: gi.gastric_residual_ml,
            gastric_residual_action: gi.gastric_residual_action,
            vomiting: gi.vomiting,
            abdominal_distension: gi.abdominal_distension,
            bowel_sounds: gi.bowel_sounds,
            stool_count: gi.stool_count,
            stool_consistency: gi.stool_consistency,
            score: 0,
            feeding_adjustment: FeedingAdjustment::Hold,
        };
        entry.score = calculate_tolerance_score(&entry);
        entry.feeding_adjustment = determine_feeding_adjustment(entry.score);
        entry
    }
}

/// Direction of a scored series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Stable,
    Worsening,
}

/// Summary of a tolerance series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToleranceTrend {
    pub average_score: f64,
    pub trend: TrendDirection,
    pub consecutive_good_days: u32,
    pub ready_to_advance: bool,
    pub entry_count: usize,
}

/// Score one observation from 10 downward, clamped to 0..=10.
#[must_use]
pub fn calculate_tolerance_score(entry: &ToleranceEntry) -> u8 {
    let mut score: i32 = 10;

    score -= match entry.gastric_residual_action {
        GastricResidualAction::Hold => 4,
        GastricResidualAction::Reduce => 2,
        GastricResidualAction::Continue if entry.gastric_residual_ml > 0.0 => 1,
        GastricResidualAction::Continue | GastricResidualAction::None => 0,
    };

    score -= match entry.vomiting {
        Severity::None => 0,
        Severity::Mild => 1,
        Severity::Moderate => 3,
        Severity::Severe => 5,
    };

    score -= match entry.abdominal_distension {
        Severity::None => 0,
        Severity::Mild => 1,
        Severity::Moderate => 2,
        Severity::Severe => 4,
    };

    score -= match entry.bowel_sounds {
        BowelSounds::Present => 0,
        BowelSounds::Reduced => 1,
        BowelSounds::Absent => 2,
    };

    if entry.stool_consistency == StoolConsistency::Watery {
        score -= if entry.stool_count > 3 { 2 } else { 1 };
    }

    score.clamp(0, 10) as u8
}

/// Map a 0-10 tolerance score: ≥8 advance, ≥5 maintain, ≥3 reduce, else hold.
#[must_use]
pub fn determine_feeding_adjustment(score: u8) -> FeedingAdjustment {
    match score {
        8.. => FeedingAdjustment::Advance,
        5..=7 => FeedingAdjustment::Maintain,
        3..=4 => FeedingAdjustment::Reduce,
        _ => FeedingAdjustment::Hold,
    }
}

fn newest_first(a: &ToleranceEntry, b: &ToleranceEntry) -> Ordering {
    b.date.cmp(&a.date).then_with(|| b.time.cmp(&a.time))
}

fn mean(scores: &[u8]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64
}

/// Classify a newest-first series by comparing the newer half to the older half.
///
/// Fewer than three points is always stable.
pub(crate) fn half_split_trend(newest_first: &[f64], threshold: f64) -> TrendDirection {
    if newest_first.len() < 3 {
        return TrendDirection::Stable;
    }
    let mid = newest_first.len() / 2;
    let avg = |xs: &[f64]| xs.iter().sum::<f64>() / xs.len() as f64;
    let diff = avg(&newest_first[..mid]) - avg(&newest_first[mid..]);

    if diff > threshold {
        TrendDirection::Improving
    } else if diff < -threshold {
        TrendDirection::Worsening
    } else {
        TrendDirection::Stable
    }
}

/// Summarize a tolerance series. The input slice is not reordered.
#[must_use]
pub fn analyze_tolerance_trend(entries: &[ToleranceEntry]) -> ToleranceTrend {
    let mut sorted: Vec<&ToleranceEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| newest_first(a, b));

    let scores: Vec<u8> = sorted.iter().map(|e| e.score).collect();
    let average_score = round_to(mean(&scores), 1);

    let as_f64: Vec<f64> = scores.iter().map(|&s| f64::from(s)).collect();
    let trend = half_split_trend(&as_f64, 1.0);

    let consecutive_good_days = scores
        .iter()
        .take_while(|&&s| s >= GOOD_TOLERANCE_SCORE)
        .count() as u32;

    let ready_to_advance = !scores.is_empty()
        && consecutive_good_days >= GOOD_DAYS_TO_ADVANCE
        && average_score >= f64::from(GOOD_TOLERANCE_SCORE);

    ToleranceTrend {
        average_score,
        trend,
        consecutive_good_days,
        ready_to_advance,
        entry_count: entries.len(),
    }
}
