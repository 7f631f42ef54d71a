use serde::{Deserialize, Serialize};

use crate::constants::PERPLEXITY_SENTINEL;
use crate::scoring::mapper::{perplexity_for_wire, perplexity_to_score};

/// Outcome of one evaluation, as returned by `POST /evaluate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub evaluated_text: String,
    pub congruence_score: f64,
    pub computed_perplexity: f64,
}

impl ScoreResult {
    /// Builds the result for `text` from its raw perplexity.
    pub fn from_perplexity(text: impl Into<String>, perplexity: f64) -> Self {
        Self {
            evaluated_text: text.into(),
            congruence_score: perplexity_to_score(perplexity),
            computed_perplexity: perplexity_for_wire(perplexity),
        }
    }

    /// Whether the perplexity could not be computed.
    pub fn is_undefined(&self) -> bool {
        self.computed_perplexity == PERPLEXITY_SENTINEL
    }
}
