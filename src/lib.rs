//! Congruence library crate (used by the server binary and integration tests).
//!
//! Rates how coherent a short Spanish text is by its perplexity under a GPT-2 causal
//! language model, mapped onto a 1-10 scale.
//!
//! # Public API Surface
//!
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`LanguageModel`], [`Gpt2LanguageModel`], [`ModelConfig`] - Model provider
//! - [`ModelHandle`], [`load_model_handle`] - Startup model lifecycle
//! - [`calculate_perplexity`], [`perplexity_to_score`], [`ScoringService`] - Scoring pipeline
//! - [`gateway`] - Axum router and handlers
//! - [`EvaluationClient`] - HTTP client that ranks candidate texts by score
//!
//! ## Test/Mock Support
//! [`MockLanguageModel`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod client;
pub mod config;
pub mod constants;
pub mod gateway;
pub mod lifecycle;
pub mod model;
pub mod scoring;

pub use client::{Candidate, ClientError, EvaluationClient, RankedCandidate, RankingReport};
pub use config::{Config, ConfigError};
pub use constants::{
    CONGRUENCE_STATUS_HEADER, DEFAULT_MAX_TOKENS, DEFAULT_MODEL_ID, PERPLEXITY_SENTINEL,
    PPL_FLOOR_FOR_SCORE_1, PPL_TARGET_FOR_SCORE_10,
};
pub use lifecycle::{ModelHandle, ModelState, load_model_handle};
#[cfg(any(test, feature = "mock"))]
pub use model::MockLanguageModel;
pub use model::{Gpt2LanguageModel, LanguageModel, ModelConfig, ModelError};
pub use scoring::{
    ScoreResult, ScoringError, ScoringService, calculate_perplexity, perplexity_to_score,
};
