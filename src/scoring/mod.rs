//! Congruence scoring: perplexity of a text under the language model, mapped to a 1-10 score.
//!
//! - [`calculate_perplexity`] never fails; anything it cannot evaluate is `+∞`.
//! - [`perplexity_to_score`] is a monotonic log-linear map saturating at both anchors.
//! - [`ScoringService`] combines both behind the [`ModelHandle`](crate::lifecycle::ModelHandle).

/// Scoring errors.
pub mod error;
/// Perplexity to score mapping.
pub mod mapper;
/// Perplexity computation.
pub mod perplexity;
/// Per-request scoring.
pub mod service;
/// Scoring result types.
pub mod types;


pub use error::{ComputationFailure, ScoringError};
pub use mapper::{perplexity_for_wire, perplexity_to_score, round2};
pub use perplexity::calculate_perplexity;
pub use service::ScoringService;
pub use types::ScoreResult;
