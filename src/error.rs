//! Error taxonomy for the meal-logging workflow.
//!
//! Validation failures are local and recoverable: they block a dispatch
//! and surface a message without a state transition. Service failures
//! are classified by phase and always resolve to a `Failed` state.

use reqwest::StatusCode;
use thiserror::Error;

/// Local input validation failures. These never reach the network layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Meal name or ingredient rows are missing after trimming.
    #[error("Please fill in all fields")]
    MissingFields,

    /// Selected file is not an image.
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
}

/// Remote analysis service failures, classified by phase.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Transport or connection failure before a response arrived.
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not decode to the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Service answered with a non-success status.
    #[error("Service rejected request with status {0}")]
    ServerRejected(StatusCode),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
