//! Cross-cutting, shared constants.
//!
//! The two perplexity anchors define the usable range of the congruence score. Everything
//! at or below [`PPL_TARGET_FOR_SCORE_10`] is rated as fully coherent, everything at or above
//! [`PPL_FLOOR_FOR_SCORE_1`] as incoherent. Keep them in sync with any client that interprets
//! the score.

/// Hub identifier of the Spanish GPT-2 model scored against by default.
pub const DEFAULT_MODEL_ID: &str = "PlanTL-GOB-ES/gpt2-base-bne";

/// Hub revision used when none is configured.
pub const DEFAULT_MODEL_REVISION: &str = "main";

/// Maximum number of tokens fed to the model per request.
pub const DEFAULT_MAX_TOKENS: usize = 512;

/// Perplexity at or below which the score saturates at [`MAX_SCORE`].
pub const PPL_TARGET_FOR_SCORE_10: f64 = 30.0;

/// Perplexity at or above which the score saturates at [`MIN_SCORE`].
pub const PPL_FLOOR_FOR_SCORE_1: f64 = 700.0;

/// Best attainable congruence score.
pub const MAX_SCORE: f64 = 10.0;

/// Worst attainable congruence score.
pub const MIN_SCORE: f64 = 1.0;

/// Wire value emitted in place of an infinite or undefined perplexity.
pub const PERPLEXITY_SENTINEL: f64 = -1.0;

pub const CONGRUENCE_STATUS_HEADER: &str = "X-Congruence-Status";
pub const CONGRUENCE_STATUS_HEALTHY: &str = "healthy";
pub const CONGRUENCE_STATUS_READY: &str = "ready";
pub const CONGRUENCE_STATUS_UNLOADED: &str = "unloaded";
pub const CONGRUENCE_STATUS_SCORED: &str = "scored";
pub const CONGRUENCE_STATUS_ERROR: &str = "error";

pub const CONGRUENCE_STATUS_INVALID_INPUT: &str = "invalid_input";
