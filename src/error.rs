use thiserror::Error;

use crate::ValidationError;

/// Message carried by the cancellation of a superseded classification.
pub const SUPERSEDED_CLASSIFICATION: &str = "New process will be initiated";

/// Unified error type for every engine entry point.
///
/// [`EngineError::Cancelled`] and [`EngineError::Superseded`] are ordinary
/// control flow: a newer call took over, or someone aborted. Use
/// [`EngineError::is_cancellation`] to filter them out before reporting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("rule #{index} is invalid: {source}")]
    Validation {
        index: usize,
        #[source]
        source: ValidationError,
    },

    #[error("operation cancelled: {0}")]
    Cancelled(String),

    #[error("rule update superseded by a newer one")]
    Superseded,

    #[error("unexpected failure: {0}")]
    Unexpected(String),

    #[error("engine has been torn down")]
    TornDown,
}

impl EngineError {
    /// Whether this error only means a newer or explicit request won.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, EngineError::Cancelled(_) | EngineError::Superseded)
    }
}

/// Errors raised while loading engine settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid setting '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}
