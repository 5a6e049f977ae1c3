//! Core error types for waterwise-core.
//!
//! The numeric core only ever fails with a [`ComputeError`]. Storage and
//! configuration failures are wrapped into [`CoreError`] alongside it so
//! callers can match on a single type.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for waterwise-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Estimator or reward calculator rejected its input
    #[error(transparent)]
    Compute(#[from] ComputeError),

    /// Ledger-related errors
    #[error("Ledger error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of the pure numeric transforms.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputeError {
    /// The estimator has nothing to average and the policy forbids a fallback.
    #[error("Insufficient data: {available} observation(s) available, at least {required} required")]
    InsufficientData { required: usize, available: usize },

    /// A value outside its domain (negative usage, zero window, ...).
    #[error("Invalid value for '{field}': {message}")]
    InvalidInput { field: String, message: String },
}

impl ComputeError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ComputeError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Ledger-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open the ledger file
    #[error("Failed to open ledger at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Ledger migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row could not be decoded
    #[error("Corrupt row {id}: {message}")]
    CorruptRow { id: i64, message: String },

    /// Database is locked
    #[error("Ledger is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-separated key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
