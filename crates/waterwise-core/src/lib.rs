//! # Waterwise Core Library
//!
//! This library provides the core logic of Waterwise, a single-household
//! water usage tracker. The CLI binary is a thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Baseline**: pure estimators of tomorrow's expected usage, behind the
//!   [`BaselineEstimator`] trait (rolling mean or seasonal forecast)
//! - **Reward**: a bounded linear reward for using less than the baseline
//! - **Analysis**: combines both and derives display metrics (efficiency,
//!   streak) for a new record
//! - **Storage**: SQLite append-only ledger and TOML configuration
//!
//! ## Key Components
//!
//! - [`estimate_baseline`] / [`calculate_reward`]: the numeric core
//! - [`Analyzer`]: one analysis step over a history snapshot
//! - [`Ledger`]: usage record persistence
//! - [`Config`]: application configuration management

pub mod analysis;
pub mod baseline;
pub mod error;
pub mod numeric;
pub mod record;
pub mod reward;
pub mod storage;

pub use analysis::{Analysis, Analyzer, Feedback};
pub use baseline::{
    estimate_baseline, BaselineEstimator, EmptyHistoryPolicy, EstimatorKind, RollingMean,
    SeasonalForecaster, SmoothingFactors, UsageSample,
};
pub use error::{ComputeError, ConfigError, CoreError, DatabaseError};
pub use record::{UsageInput, UsageRecord};
pub use reward::{calculate_reward, RewardPolicy};
pub use storage::{Config, Ledger, LedgerSummary};
