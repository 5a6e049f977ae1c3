//! Usage records and the user input they are derived from.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::baseline::UsageSample;
use crate::error::ComputeError;
use crate::numeric::check_usage;

/// What the user enters for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageInput {
    pub date: NaiveDate,
    /// Liters consumed
    pub actual_usage: f64,
    pub household_size: u32,
}

impl UsageInput {
    pub fn new(date: NaiveDate, actual_usage: f64, household_size: u32) -> Self {
        Self {
            date,
            actual_usage,
            household_size,
        }
    }

    /// # Errors
    /// Returns [`ComputeError::InvalidInput`] for negative/non-finite usage
    /// or an empty household.
    pub fn validate(&self) -> Result<(), ComputeError> {
        check_usage("actual_usage", self.actual_usage)?;
        if self.household_size == 0 {
            return Err(ComputeError::invalid("household_size", "must be at least 1"));
        }
        Ok(())
    }
}

/// One row of the ledger. Every field except the input ones is derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Ledger row id; `0` until the record has been appended.
    pub id: i64,
    pub date: NaiveDate,
    pub actual_usage: f64,
    pub household_size: u32,
    /// Baseline at creation time, never recomputed
    pub expected_usage: f64,
    pub reward_score: f64,
    /// Percentage of the baseline saved, 0-100
    pub efficiency_score: f64,
    /// Consecutive rewarded records ending with this one
    pub streak: u32,
    pub recorded_at: DateTime<Utc>,
}

impl UsageRecord {
    pub fn sample(&self) -> UsageSample {
        UsageSample::new(self.date, self.actual_usage)
    }

    pub fn earned_reward(&self) -> bool {
        self.reward_score > 0.0
    }

    /// Liters per household member.
    pub fn per_person_usage(&self) -> f64 {
        self.actual_usage / f64::from(self.household_size.max(1))
    }
}
