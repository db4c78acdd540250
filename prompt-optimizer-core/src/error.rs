use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown task category: {0}")]
    UnknownCategory(String),

    #[error("Candidate set is empty")]
    EmptyCandidateSet,

    #[error("No candidate produced a scorable response")]
    NoScoredCandidates,

    #[error("Baseline unavailable: original prompt response failed ({last_error})")]
    BaselineUnavailable { last_error: GenerationErrorKind },

    #[error("Run cancelled during {0}")]
    Cancelled(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        CoreError::Validation(err.to_string())
    }
}

/// Failure modes of the external text generator.
///
/// The orchestrator treats all three identically for retry purposes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("rate limited by generator{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<Duration> },

    #[error("generator timed out")]
    Timeout,

    #[error("generator service error: {0}")]
    ServiceError(String),
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(delay) => format!(", retry after {:?}", delay),
        None => String::new(),
    }
}

impl GenerationError {
    pub fn kind(&self) -> GenerationErrorKind {
        match self {
            GenerationError::RateLimited { .. } => GenerationErrorKind::RateLimited,
            GenerationError::Timeout => GenerationErrorKind::Timeout,
            GenerationError::ServiceError(_) => GenerationErrorKind::ServiceError,
        }
    }

    pub fn service(message: impl Into<String>) -> Self {
        GenerationError::ServiceError(message.into())
    }
}

/// Payload-free projection of [`GenerationError`], used when reporting the
/// last generator failure of a fatal run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationErrorKind {
    RateLimited,
    Timeout,
    ServiceError,
}

impl fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationErrorKind::RateLimited => write!(f, "rate_limited"),
            GenerationErrorKind::Timeout => write!(f, "timeout"),
            GenerationErrorKind::ServiceError => write!(f, "service_error"),
        }
    }
}
