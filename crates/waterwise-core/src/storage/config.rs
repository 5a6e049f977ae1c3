//! TOML-based application configuration.
//!
//! Stores the estimator and reward parameters:
//! - Baseline strategy, rolling window and empty-history policy
//! - Seasonal smoothing factors
//! - Reward rate and cap
//!
//! Configuration is stored at `~/.config/waterwise/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::analysis::Analyzer;
use crate::baseline::{
    BaselineEstimator, EmptyHistoryPolicy, EstimatorKind, RollingMean, SeasonalForecaster,
    SmoothingFactors, DEFAULT_WINDOW,
};
use crate::error::{ComputeError, ConfigError, Result};
use crate::reward::RewardPolicy;

/// Baseline estimator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineConfig {
    #[serde(default)]
    pub strategy: EstimatorKind,
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default)]
    pub empty_history: EmptyHistoryPolicy,
    #[serde(default)]
    pub seasonal: SmoothingFactors,
}

fn default_window() -> usize {
    DEFAULT_WINDOW
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            strategy: EstimatorKind::default(),
            window: default_window(),
            empty_history: EmptyHistoryPolicy::default(),
            seasonal: SmoothingFactors::default(),
        }
    }
}

impl BaselineConfig {
    /// Build the configured strategy.
    ///
    /// # Errors
    /// Returns [`ComputeError::InvalidInput`] for a zero window or
    /// out-of-range smoothing factors.
    pub fn estimator(&self) -> std::result::Result<Box<dyn BaselineEstimator>, ComputeError> {
        let estimator: Box<dyn BaselineEstimator> = match self.strategy {
            EstimatorKind::RollingMean => {
                Box::new(RollingMean::new(self.window, self.empty_history)?)
            }
            EstimatorKind::Seasonal => {
                Box::new(SeasonalForecaster::new(self.seasonal, self.empty_history)?)
            }
        };
        Ok(estimator)
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/waterwise/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub baseline: BaselineConfig,
    #[serde(default)]
    pub reward: RewardPolicy,
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(format!("'{value}': {e}")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without persisting it.
    ///
    /// The updated configuration must still build a valid [`Analyzer`];
    /// otherwise `self` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// or is out of range.
    pub fn update(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.analyzer().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value is invalid,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.update(key, value)?;
        self.save()
    }

    /// Analyzer for the configured estimator and reward policy.
    ///
    /// # Errors
    /// Returns [`ComputeError::InvalidInput`] for out-of-range parameters.
    pub fn analyzer(&self) -> std::result::Result<Analyzer, ComputeError> {
        Analyzer::new(self.baseline.estimator()?, self.reward)
    }
}
