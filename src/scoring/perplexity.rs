use tracing::{debug, warn};

use crate::model::LanguageModel;
use crate::scoring::error::ComputationFailure;

/// Perplexity of `text` under `model`, or `+∞` when it cannot be evaluated.
///
/// Blank text is `+∞` without touching the model. Tokenization and inference failures are
/// logged and collapse to `+∞`, as does a NaN result.
pub fn calculate_perplexity(text: &str, model: &dyn LanguageModel, max_tokens: usize) -> f64 {
    if text.trim().is_empty() {
        debug!("Blank text, perplexity is undefined");
        return f64::INFINITY;
    }

    match try_perplexity(text, model, max_tokens) {
        Ok(perplexity) if perplexity.is_nan() => {
            warn!(model_id = model.model_id(), "Perplexity is NaN, treating as infinite");
            f64::INFINITY
        }
        Ok(perplexity) => perplexity,
        Err(e) => {
            warn!(
                model_id = model.model_id(),
                error = %e,
                "Perplexity computation failed, treating as infinite"
            );
            f64::INFINITY
        }
    }
}

fn try_perplexity(
    text: &str,
    model: &dyn LanguageModel,
    max_tokens: usize,
) -> Result<f64, ComputationFailure> {
    let mut token_ids = model.encode(text, max_tokens)?;
    token_ids.truncate(max_tokens);

    if token_ids.is_empty() {
        debug!("Text produced no tokens, perplexity is undefined");
        return Ok(f64::INFINITY);
    }

    let loss = model.mean_loss(&token_ids)?;
    if loss.is_nan() {
        return Err(ComputationFailure::UndefinedLoss);
    }

    let perplexity = f64::from(loss).exp();
    debug!(token_count = token_ids.len(), loss, perplexity, "Computed perplexity");

    Ok(perplexity)
}
