use tracing::info;

use crate::lifecycle::ModelHandle;
use crate::scoring::error::ScoringError;
use crate::scoring::perplexity::calculate_perplexity;
use crate::scoring::types::ScoreResult;

/// Scores texts against the model held by a [`ModelHandle`].
///
/// Stateless apart from the handle; evaluated texts are not retained.
#[derive(Debug, Clone)]
pub struct ScoringService {
    handle: ModelHandle,
    max_tokens: usize,
}

impl ScoringService {
    pub fn new(handle: ModelHandle, max_tokens: usize) -> Self {
        Self { handle, max_tokens }
    }

    pub fn handle(&self) -> &ModelHandle {
        &self.handle
    }

    pub fn is_ready(&self) -> bool {
        self.handle.is_ready()
    }

    pub fn model_id(&self) -> Option<&str> {
        self.handle.model_id()
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Scores `text`. Blocking: runs one forward pass.
    ///
    /// Fails with [`ScoringError::ModelUnavailable`] while unloaded, whatever the text, and
    /// with [`ScoringError::InvalidInput`] for blank text. Computation failures do not fail
    /// the request; they yield the minimum score and the sentinel perplexity.
    pub fn evaluate(&self, text: &str) -> Result<ScoreResult, ScoringError> {
        let model = self.handle.model().ok_or(ScoringError::ModelUnavailable)?;

        if text.trim().is_empty() {
            return Err(ScoringError::InvalidInput {
                reason: "text must not be empty".to_string(),
            });
        }

        let perplexity = calculate_perplexity(text, model.as_ref(), self.max_tokens);
        let result = ScoreResult::from_perplexity(text, perplexity);

        info!(
            text_len = text.len(),
            perplexity = result.computed_perplexity,
            score = result.congruence_score,
            "Evaluated text"
        );

        Ok(result)
    }
}
