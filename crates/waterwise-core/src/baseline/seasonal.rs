//! Seasonal baseline: additive Holt-Winters with a weekly season.
//!
//! The season is keyed by the weekday of each sample's date rather than by
//! position, so gaps and duplicate days in the log still land in the right
//! bucket. The forecast is for the calendar day after the last sample.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{check_history, mean_or_policy, BaselineEstimator, EmptyHistoryPolicy, UsageSample};
use crate::error::ComputeError;
use crate::numeric::{mean, round2};

/// Days per season.
pub const SEASON_LENGTH: usize = 7;

/// Two full seasons are needed to initialise level, trend and season.
const MIN_SAMPLES: usize = 2 * SEASON_LENGTH;

/// Holt-Winters smoothing factors, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingFactors {
    /// Level
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Trend
    #[serde(default = "default_beta")]
    pub beta: f64,
    /// Season
    #[serde(default = "default_gamma")]
    pub gamma: f64,
}

fn default_alpha() -> f64 {
    0.5
}
fn default_beta() -> f64 {
    0.1
}
fn default_gamma() -> f64 {
    0.3
}

impl Default for SmoothingFactors {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            beta: default_beta(),
            gamma: default_gamma(),
        }
    }
}

impl SmoothingFactors {
    /// # Errors
    /// Returns [`ComputeError::InvalidInput`] naming the first factor outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ComputeError> {
        for (field, value) in [("alpha", self.alpha), ("beta", self.beta), ("gamma", self.gamma)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ComputeError::invalid(field, format!("{value} is outside [0, 1]")));
            }
        }
        Ok(())
    }
}

/// Seasonal forecasting strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalForecaster {
    factors: SmoothingFactors,
    empty_history: EmptyHistoryPolicy,
}

impl Default for SeasonalForecaster {
    fn default() -> Self {
        Self {
            factors: SmoothingFactors::default(),
            empty_history: EmptyHistoryPolicy::default(),
        }
    }
}

fn weekday_slot(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

impl SeasonalForecaster {
    /// # Errors
    /// Returns [`ComputeError::InvalidInput`] for out-of-range smoothing factors.
    pub fn new(
        factors: SmoothingFactors,
        empty_history: EmptyHistoryPolicy,
    ) -> Result<Self, ComputeError> {
        factors.validate()?;
        Ok(Self {
            factors,
            empty_history,
        })
    }

    pub fn factors(&self) -> SmoothingFactors {
        self.factors
    }

    /// Unrounded, unclamped one-step forecast. `history` has at least
    /// [`MIN_SAMPLES`] entries.
    fn forecast(&self, history: &[UsageSample]) -> f64 {
        let SmoothingFactors { alpha, beta, gamma } = self.factors;
        let values: Vec<f64> = history.iter().map(|s| s.liters).collect();

        let first = mean(&values[..SEASON_LENGTH]).unwrap_or(0.0);
        let second = mean(&values[SEASON_LENGTH..MIN_SAMPLES]).unwrap_or(first);

        let mut level = first;
        let mut trend = (second - first) / SEASON_LENGTH as f64;

        let mut season = [0.0_f64; SEASON_LENGTH];
        let mut counts = [0_u32; SEASON_LENGTH];
        for sample in &history[..SEASON_LENGTH] {
            let slot = weekday_slot(sample.date);
            season[slot] += sample.liters - first;
            counts[slot] += 1;
        }
        for (value, count) in season.iter_mut().zip(counts) {
            if count > 0 {
                *value /= f64::from(count);
            }
        }

        for sample in &history[SEASON_LENGTH..] {
            let slot = weekday_slot(sample.date);
            let previous_level = level;
            level = alpha * (sample.liters - season[slot]) + (1.0 - alpha) * (level + trend);
            trend = beta * (level - previous_level) + (1.0 - beta) * trend;
            season[slot] = gamma * (sample.liters - level) + (1.0 - gamma) * season[slot];
        }

        // history is non-empty here; the last day of the calendar has no successor
        let last = history[history.len() - 1].date;
        let next = last.succ_opt().unwrap_or(last);
        level + trend + season[weekday_slot(next)]
    }
}

impl BaselineEstimator for SeasonalForecaster {
    fn name(&self) -> &str {
        "seasonal"
    }

    fn estimate_baseline(&self, history: &[UsageSample]) -> Result<f64, ComputeError> {
        check_history(history)?;

        if history.len() < MIN_SAMPLES {
            let values: Vec<f64> = history.iter().map(|s| s.liters).collect();
            let baseline = mean_or_policy(&values, self.empty_history)?;
            debug!(
                samples = history.len(),
                required = MIN_SAMPLES,
                baseline,
                "seasonal baseline fell back to plain mean"
            );
            return Ok(baseline);
        }

        let baseline = round2(self.forecast(history).max(0.0));
        debug!(samples = history.len(), baseline, "seasonal baseline");
        Ok(baseline)
    }
}
