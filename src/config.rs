//! Clinical policy constants.
//!
//! The composite score weights and the plan scaling constants are unit
//! policy, not physiology. Defaults reproduce the reference behaviour;
//! deployments may override them through the environment.

use serde::{Deserialize, Serialize};

/// Tunable scoring and plan-adjustment policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Composite weights, order: (gi, vital, intake).
    pub score_weights: [f64; 3],

    /// Scale factor applied to the previous plan on a reduce recommendation
    pub reduce_factor: f64,

    /// Gain on the energy shortfall when advancing: `1 + (1 - ratio) * gain`
    pub advance_gain: f64,

    /// Upper bound on the advance scale factor
    pub advance_ceiling: f64,

    /// Energy ratio below which advancing scales up instead of holding steady
    pub advance_threshold: f64,

    /// Plan totals are capped at this fraction of the requirement
    pub requirement_cap: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            score_weights: [0.4, 0.3, 0.3],
            reduce_factor: 0.75,
            advance_gain: 0.5,
            advance_ceiling: 1.25,
            advance_threshold: 0.8,
            requirement_cap: 1.1,
        }
    }
}

fn positive(name: &str, raw: Option<String>) -> Option<f64> {
    let raw = raw?;
    match raw.trim().parse::<f64>() {
        Ok(x) if x.is_finite() && x > 0.0 => Some(x),
        _ => {
            tracing::warn!("Ignoring invalid {}={:?}", name, raw);
            None
        }
    }
}

impl PolicyConfig {
    /// Load overrides from the environment (best-effort).
    ///
    /// Supported:
    /// - NUTRIGUARD_SCORE_WEIGHTS="gi,vital,intake"
    /// - NUTRIGUARD_REDUCE_FACTOR, in (0, 1]
    /// - NUTRIGUARD_ADVANCE_GAIN
    /// - NUTRIGUARD_ADVANCE_CEILING, at least 1
    /// - NUTRIGUARD_REQUIREMENT_CAP
    ///
    /// Invalid values are logged and ignored.
    #[must_use]
    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Apply overrides read through `lookup` on top of the defaults.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let read = |name: &str| positive(name, lookup(name));

        if let Some(v) = lookup("NUTRIGUARD_SCORE_WEIGHTS") {
            if let Some(weights) = parse_weights(&v) {
                cfg.score_weights = weights;
            } else {
                tracing::warn!("Ignoring invalid NUTRIGUARD_SCORE_WEIGHTS={:?}", v);
            }
        }

        if let Some(x) = read("NUTRIGUARD_REDUCE_FACTOR") {
            // Above 1 a reduction would grow the plan.
            if x <= 1.0 {
                cfg.reduce_factor = x;
            } else {
                tracing::warn!("Ignoring NUTRIGUARD_REDUCE_FACTOR={} above 1", x);
            }
        }
        if let Some(x) = read("NUTRIGUARD_ADVANCE_GAIN") {
            cfg.advance_gain = x;
        }
        if let Some(x) = read("NUTRIGUARD_ADVANCE_CEILING") {
            // Below 1 an advance would shrink the plan.
            if x >= 1.0 {
                cfg.advance_ceiling = x;
            } else {
                tracing::warn!("Ignoring NUTRIGUARD_ADVANCE_CEILING={} below 1", x);
            }
        }
        if let Some(x) = read("NUTRIGUARD_REQUIREMENT_CAP") {
            cfg.requirement_cap = x;
        }

        cfg
    }
}

/// Parse "gi,vital,intake" into weights normalized to sum to 1.
fn parse_weights(raw: &str) -> Option<[f64; 3]> {
    let parts: Vec<f64> = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;

    let [a, b, c] = <[f64; 3]>::try_from(parts).ok()?;
    if ![a, b, c].iter().all(|w| w.is_finite() && *w >= 0.0) {
        return None;
    }

    let sum = a + b + c;
    (sum > 0.0).then(|| [a / sum, b / sum, c / sum])
}
