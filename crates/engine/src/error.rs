//! Error types for engine operations.

use database::{DatabaseError, Status, ValidationError};
use thiserror::Error;

/// Errors that can occur while authenticating or acting on complaints.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// Unknown official or wrong password. Deliberately does not say which.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No live challenge matches the phone and code.
    #[error("Invalid OTP")]
    InvalidCode,

    /// The challenge exists but is past its expiry.
    #[error("OTP has expired")]
    OtpExpired,

    /// No user owns the phone number.
    #[error("User not found. Please register first.")]
    NotRegistered,

    /// The session's role may not perform the operation.
    #[error("Access denied")]
    AccessDenied,

    /// Referenced record is absent (or outside the caller's scope).
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    /// Status would move backwards.
    #[error("cannot move complaint from {from} to {to}")]
    InvalidTransition { from: Status, to: Status },

    /// Concurrent modification or duplicate record.
    #[error("{0}")]
    Conflict(String),

    /// Password hashing failure.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Store failure; the in-flight transaction was rolled back.
    #[error("store error: {0}")]
    Store(DatabaseError),
}

impl EngineError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        EngineError::Validation(message.into())
    }

    /// True for failures of the authentication class.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidCredentials | EngineError::InvalidCode | EngineError::OtpExpired
        )
    }
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Validation(err.to_string())
    }
}

impl From<DatabaseError> for EngineError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, id } => EngineError::NotFound { entity, id },
            DatabaseError::Conflict { entity, id } => {
                EngineError::Conflict(format!("{} {} was modified concurrently", entity, id))
            }
            other => EngineError::Store(other),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
