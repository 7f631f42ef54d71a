use thiserror::Error;

use crate::model::ModelError;

/// Request-level failures surfaced to the caller.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("language model is not loaded")]
    ModelUnavailable,

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

/// Reasons a perplexity could not be computed. Never leaves the calculator.
#[derive(Debug, Error)]
pub enum ComputationFailure {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("language model returned an undefined loss")]
    UndefinedLoss,
}
