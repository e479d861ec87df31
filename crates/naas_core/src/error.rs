//! Engine-level errors

use thiserror::Error;

/// Errors raised when validating or updating the engine configuration
///
/// Validation never coerces: an out-of-range or malformed value rejects
/// the whole candidate config and the previous one stays in effect.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error rate outside the [0, 100] percent range
    #[error("error rate must be within [0, 100], got {0}")]
    InvalidErrorRate(f64),

    /// The error catalog is empty
    #[error("error catalog must contain at least one definition")]
    EmptyCatalog,

    /// A catalog entry is missing its code or message
    #[error("error definition {index} is invalid: {reason}")]
    InvalidErrorDefinition { index: usize, reason: String },

    /// Delay policy bounds or probability are out of range
    #[error("invalid delay policy: {0}")]
    InvalidDelayPolicy(String),

    /// A structured route pattern failed to compile
    #[error("invalid route pattern: {0}")]
    InvalidRoutePattern(String),
}

impl ConfigError {
    /// Create an invalid-definition error for the catalog entry at `index`
    pub fn invalid_definition(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidErrorDefinition {
            index,
            reason: reason.into(),
        }
    }
}

/// Faults surfaced to the adapter while deciding a request
///
/// Neither variant is retried by the engine; continuation is the host's
/// concern. Config problems are not a request fault and use [`ConfigError`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// A custom hook returned an error; processing for the request aborts
    #[error("custom hook failed: {0}")]
    Hook(#[source] anyhow::Error),

    /// Unexpected fault during eligibility, delay, selection or emit
    #[error("chaos processing failed: {0}")]
    Processing(String),
}
