//! Reward scoring for usage below the baseline.
//!
//! The reward is linear in the liters saved and capped at a percentage of
//! the baseline:
//!
//! ```text
//! reward = min((expected - actual) * rate, expected * max_discount_percent / 100)
//! ```
//!
//! Usage at or above the baseline earns nothing, and so does any baseline
//! at or below zero.

use serde::{Deserialize, Serialize};

use crate::error::ComputeError;
use crate::numeric::{check_usage, round2};

/// Reward points per liter saved.
pub const DEFAULT_REWARD_RATE: f64 = 0.01;

/// Upper bound of the reward as a percentage of the baseline.
pub const DEFAULT_MAX_DISCOUNT_PERCENT: f64 = 30.0;

/// Parameters of the reward calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardPolicy {
    #[serde(default = "default_rate")]
    pub rate: f64,
    #[serde(default = "default_max_discount_percent")]
    pub max_discount_percent: f64,
}

fn default_rate() -> f64 {
    DEFAULT_REWARD_RATE
}
fn default_max_discount_percent() -> f64 {
    DEFAULT_MAX_DISCOUNT_PERCENT
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            rate: DEFAULT_REWARD_RATE,
            max_discount_percent: DEFAULT_MAX_DISCOUNT_PERCENT,
        }
    }
}

impl RewardPolicy {
    /// # Errors
    /// Returns [`ComputeError::InvalidInput`] for a negative or non-finite
    /// rate, or a cap outside `[0, 100]`.
    pub fn validate(&self) -> Result<(), ComputeError> {
        if !self.rate.is_finite() || self.rate < 0.0 {
            return Err(ComputeError::invalid(
                "rate",
                format!("{} must be a non-negative number", self.rate),
            ));
        }
        if !(0.0..=100.0).contains(&self.max_discount_percent) {
            return Err(ComputeError::invalid(
                "max_discount_percent",
                format!("{} is outside [0, 100]", self.max_discount_percent),
            ));
        }
        Ok(())
    }

    /// Largest reward this policy can give for `expected` liters.
    pub fn cap(&self, expected: f64) -> f64 {
        (expected * self.max_discount_percent / 100.0).max(0.0)
    }
}

/// Reward for using `actual` liters against a baseline of `expected`.
///
/// # Errors
/// Returns [`ComputeError::InvalidInput`] if `actual` is negative or not
/// finite, if `expected` is not finite, or if `policy` is invalid.
pub fn calculate_reward(
    actual: f64,
    expected: f64,
    policy: &RewardPolicy,
) -> Result<f64, ComputeError> {
    check_usage("actual", actual)?;
    if !expected.is_finite() {
        return Err(ComputeError::invalid(
            "expected",
            format!("{expected} is not a finite number"),
        ));
    }
    policy.validate()?;

    if actual >= expected {
        return Ok(0.0);
    }

    let raw = (expected - actual) * policy.rate;
    Ok(round2(raw.min(policy.cap(expected))))
}
