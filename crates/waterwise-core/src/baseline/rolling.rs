//! Trailing moving-average baseline.

use tracing::debug;

use super::{mean_or_policy, BaselineEstimator, EmptyHistoryPolicy, UsageSample};
use crate::error::ComputeError;
use crate::numeric::check_usage;

/// Number of trailing days averaged when nothing else is configured.
pub const DEFAULT_WINDOW: usize = 7;

/// Expected usage as the mean of the last `window` values of `history`.
///
/// With fewer than `window` values the mean of all of them is used. An empty
/// history is resolved by `empty_history`. The result is rounded to two
/// decimals.
///
/// # Errors
/// [`ComputeError::InvalidInput`] for a zero window or a negative/non-finite
/// value, [`ComputeError::InsufficientData`] for an empty history under
/// [`EmptyHistoryPolicy::Fail`].
pub fn estimate_baseline(
    history: &[f64],
    window: usize,
    empty_history: EmptyHistoryPolicy,
) -> Result<f64, ComputeError> {
    if window == 0 {
        return Err(ComputeError::invalid("window", "must be at least 1"));
    }
    for (idx, liters) in history.iter().enumerate() {
        check_usage(&format!("history[{idx}]"), *liters)?;
    }

    let start = history.len().saturating_sub(window);
    mean_or_policy(&history[start..], empty_history)
}

/// Rolling-mean strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingMean {
    window: usize,
    empty_history: EmptyHistoryPolicy,
}

impl RollingMean {
    /// # Errors
    /// Returns [`ComputeError::InvalidInput`] when `window` is zero.
    pub fn new(window: usize, empty_history: EmptyHistoryPolicy) -> Result<Self, ComputeError> {
        if window == 0 {
            return Err(ComputeError::invalid("window", "must be at least 1"));
        }
        Ok(Self {
            window,
            empty_history,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn empty_history(&self) -> EmptyHistoryPolicy {
        self.empty_history
    }
}

impl Default for RollingMean {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            empty_history: EmptyHistoryPolicy::default(),
        }
    }
}

impl BaselineEstimator for RollingMean {
    fn name(&self) -> &str {
        "rolling_mean"
    }

    fn estimate_baseline(&self, history: &[UsageSample]) -> Result<f64, ComputeError> {
        let values: Vec<f64> = history.iter().map(|s| s.liters).collect();
        let baseline = estimate_baseline(&values, self.window, self.empty_history)?;
        debug!(
            window = self.window,
            samples = values.len(),
            baseline,
            "rolling mean baseline"
        );
        Ok(baseline)
    }
}
