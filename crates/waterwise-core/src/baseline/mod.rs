//! Baseline usage estimation.
//!
//! A baseline is the liters a household is expected to use on the next day,
//! derived from its own history. Two interchangeable strategies implement
//! [`BaselineEstimator`]:
//!
//! - [`RollingMean`]: trailing mean of the last `window` observations
//! - [`SeasonalForecaster`]: additive Holt-Winters with a weekday season
//!
//! Both are pure: they read a snapshot of the history and return a single
//! value rounded to two decimals.

mod rolling;
mod seasonal;

pub use rolling::{estimate_baseline, RollingMean, DEFAULT_WINDOW};
pub use seasonal::{SeasonalForecaster, SmoothingFactors};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ComputeError;
use crate::numeric::{mean, round2};

/// One historical observation fed to an estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageSample {
    pub date: NaiveDate,
    pub liters: f64,
}

impl UsageSample {
    pub fn new(date: NaiveDate, liters: f64) -> Self {
        Self { date, liters }
    }
}

/// What an estimator does when there is no history at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyHistoryPolicy {
    /// Baseline of `0.0`, which in turn yields a reward of `0.0`.
    #[default]
    Zero,
    /// Fail with [`ComputeError::InsufficientData`].
    Fail,
}

impl EmptyHistoryPolicy {
    fn resolve(self) -> Result<f64, ComputeError> {
        match self {
            EmptyHistoryPolicy::Zero => Ok(0.0),
            EmptyHistoryPolicy::Fail => Err(ComputeError::InsufficientData {
                required: 1,
                available: 0,
            }),
        }
    }
}

/// Which estimator the configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    #[default]
    RollingMean,
    Seasonal,
}

/// Every baseline strategy implements this trait.
///
/// Implementations must be deterministic for a given history and must never
/// return a negative value when all inputs are non-negative.
pub trait BaselineEstimator: Send + Sync {
    /// Strategy identifier (e.g. "rolling_mean").
    fn name(&self) -> &str;

    /// Expected usage for the observation following `history`.
    ///
    /// `history` is in log order, oldest first.
    fn estimate_baseline(&self, history: &[UsageSample]) -> Result<f64, ComputeError>;
}

/// Validate every sample before any arithmetic runs.
fn check_history(history: &[UsageSample]) -> Result<(), ComputeError> {
    for (idx, sample) in history.iter().enumerate() {
        crate::numeric::check_usage(&format!("history[{idx}]"), sample.liters)?;
    }
    Ok(())
}

/// Mean of everything, rounded, with the empty-history policy applied.
fn mean_or_policy(values: &[f64], policy: EmptyHistoryPolicy) -> Result<f64, ComputeError> {
    match mean(values) {
        Some(m) => Ok(round2(m)),
        None => policy.resolve(),
    }
}
