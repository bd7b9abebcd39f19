//! Core error types for repflow-core.
//!
//! This module defines the error hierarchy using thiserror. Validation
//! errors are raised before a session is constructed; invalid-state errors
//! indicate a caller bug rather than a runtime condition.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for repflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Invalid-state errors (caller bugs)
    #[error("Invalid state: {0}")]
    InvalidState(#[from] InvalidStateError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database is locked
    #[error("Database is locked")]
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors, raised before a session state machine is built.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A workout with no exercises has no valid progression
    #[error("Workout '{workout}' has no exercises")]
    NoExercises { workout: String },

    /// Every exercise needs at least one set
    #[error("Exercise '{exercise}' has a zero sets target")]
    ZeroSets { exercise: String },

    /// Invalid field value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Caller-bug errors from the session duration tracker.
#[derive(Error, Debug)]
pub enum InvalidStateError {
    /// Operation requires an authenticated actor
    #[error("No authenticated actor")]
    NotAuthenticated,

    /// Operation requires an active session
    #[error("No active session")]
    NoActiveSession,

    /// Only one session may be active per tracker
    #[error("A session is already active")]
    SessionAlreadyActive,

    /// Operation not valid in the current status
    #[error("Operation '{operation}' not valid while {status}")]
    WrongStatus { operation: String, status: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            rusqlite::Error::QueryReturnedNoRows => {
                DatabaseError::NotFound("query returned no rows".into())
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
