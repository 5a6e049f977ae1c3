//! Daily analysis: baseline, reward and the display metrics derived from them.
//!
//! [`Analyzer`] ties a [`BaselineEstimator`] to a [`RewardPolicy`]. It never
//! mutates the history it is given; [`Analyzer::record`] is the only entry
//! point that touches the ledger, and it only appends.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::baseline::{BaselineEstimator, RollingMean, UsageSample};
use crate::error::{ComputeError, Result};
use crate::numeric::round2;
use crate::record::{UsageInput, UsageRecord};
use crate::reward::{calculate_reward, RewardPolicy};
use crate::storage::Ledger;

/// Verdict shown to the user after an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    /// Usage came in under the baseline and earned a reward.
    Saviour,
    /// Usage met or exceeded the baseline.
    OverBaseline,
}

impl Feedback {
    pub fn for_reward(reward: f64) -> Self {
        if reward > 0.0 {
            Feedback::Saviour
        } else {
            Feedback::OverBaseline
        }
    }

    pub fn headline(&self, reward: f64) -> String {
        match self {
            Feedback::Saviour => {
                format!("Amazing! You are a Water Saviour! Reward points earned: {reward}")
            }
            Feedback::OverBaseline => {
                "Usage exceeded the expected level. Try reducing usage to earn rewards.".to_string()
            }
        }
    }

    pub fn encouragement(&self) -> &'static str {
        match self {
            Feedback::Saviour => "You are contributing to water conservation. Keep it up!",
            Feedback::OverBaseline => {
                "Small changes can save big amounts of water. Try again tomorrow!"
            }
        }
    }
}

/// Outcome of analysing one day of usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub record: UsageRecord,
    pub feedback: Feedback,
    pub per_person_usage: f64,
}

/// Percentage of `expected` that was saved, clamped to `[0, 100]`.
pub fn efficiency_score(actual: f64, expected: f64) -> f64 {
    if expected <= 0.0 {
        return 0.0;
    }
    round2((100.0 * (expected - actual) / expected).clamp(0.0, 100.0))
}

/// Streak after a record that did (or did not) earn a reward.
pub fn next_streak(previous: Option<&UsageRecord>, rewarded: bool) -> u32 {
    if !rewarded {
        return 0;
    }
    previous.map_or(0, |p| p.streak).saturating_add(1)
}

/// Baseline estimator plus reward policy.
pub struct Analyzer {
    estimator: Box<dyn BaselineEstimator>,
    policy: RewardPolicy,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            estimator: Box::new(RollingMean::default()),
            policy: RewardPolicy::default(),
        }
    }
}

impl Analyzer {
    /// # Errors
    /// Returns [`ComputeError::InvalidInput`] if `policy` is invalid.
    pub fn new(
        estimator: Box<dyn BaselineEstimator>,
        policy: RewardPolicy,
    ) -> std::result::Result<Self, ComputeError> {
        policy.validate()?;
        Ok(Self { estimator, policy })
    }

    pub fn estimator_name(&self) -> &str {
        self.estimator.name()
    }

    pub fn policy(&self) -> &RewardPolicy {
        &self.policy
    }

    /// Baseline for the day after the last record of `history`.
    pub fn expected_for(&self, history: &[UsageRecord]) -> std::result::Result<f64, ComputeError> {
        let samples: Vec<UsageSample> = history.iter().map(UsageRecord::sample).collect();
        self.estimator.estimate_baseline(&samples)
    }

    /// Derive the record for `input` against `history` without storing it.
    ///
    /// `history` is the ledger as it stood before this record, oldest first.
    pub fn analyze(
        &self,
        history: &[UsageRecord],
        input: UsageInput,
    ) -> std::result::Result<Analysis, ComputeError> {
        input.validate()?;

        let expected = self.expected_for(history)?;
        let reward = calculate_reward(input.actual_usage, expected, &self.policy)?;
        let feedback = Feedback::for_reward(reward);

        let record = UsageRecord {
            id: 0,
            date: input.date,
            actual_usage: input.actual_usage,
            household_size: input.household_size,
            expected_usage: expected,
            reward_score: reward,
            efficiency_score: efficiency_score(input.actual_usage, expected),
            streak: next_streak(history.last(), reward > 0.0),
            recorded_at: Utc::now(),
        };
        debug!(
            estimator = self.estimator.name(),
            expected,
            reward,
            streak = record.streak,
            "analysed usage"
        );

        Ok(Analysis {
            per_person_usage: round2(record.per_person_usage()),
            record,
            feedback,
        })
    }

    /// Analyse `input` against the current ledger and append the result.
    ///
    /// # Errors
    /// Returns an error if the ledger cannot be read or written, or if the
    /// analysis rejects its input. Nothing is appended on error.
    pub fn record(&self, ledger: &Ledger, input: UsageInput) -> Result<Analysis> {
        let history = ledger.records()?;
        let mut analysis = self.analyze(&history, input)?;
        analysis.record.id = ledger.append(&analysis.record)?;
        info!(
            id = analysis.record.id,
            date = %analysis.record.date,
            reward = analysis.record.reward_score,
            "recorded usage"
        );
        Ok(analysis)
    }
}
