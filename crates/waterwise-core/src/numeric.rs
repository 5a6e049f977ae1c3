//! Small numeric helpers shared by the estimators and the reward calculator.

use crate::error::ComputeError;

/// Round to two decimal places, halves to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Arithmetic mean, `None` for an empty slice.
///
/// Values are summed in ascending order so the result depends only on the
/// multiset, not on the order the slice holds them in.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(sorted.iter().sum::<f64>() / sorted.len() as f64)
}

/// Reject negative, NaN and infinite liters.
pub(crate) fn check_usage(field: &str, liters: f64) -> Result<(), ComputeError> {
    if !liters.is_finite() {
        return Err(ComputeError::invalid(field, format!("{liters} is not a finite number")));
    }
    if liters < 0.0 {
        return Err(ComputeError::invalid(field, format!("{liters} is negative")));
    }
    Ok(())
}
