use crate::constants::{
    MAX_SCORE, MIN_SCORE, PERPLEXITY_SENTINEL, PPL_FLOOR_FOR_SCORE_1, PPL_TARGET_FOR_SCORE_10,
};

/// Maps a perplexity to a congruence score in `[1.0, 10.0]`, rounded to 2 decimals.
///
/// Log-linear between the anchors: `score(30) = 10`, `score(700) = 1`. Infinite and NaN
/// perplexities score the minimum.
pub fn perplexity_to_score(perplexity: f64) -> f64 {
    if perplexity.is_nan() || perplexity.is_infinite() || perplexity >= PPL_FLOOR_FOR_SCORE_1 {
        return MIN_SCORE;
    }
    if perplexity <= PPL_TARGET_FOR_SCORE_10 {
        return MAX_SCORE;
    }

    let log_floor = PPL_FLOOR_FOR_SCORE_1.ln();
    let log_span = log_floor - PPL_TARGET_FOR_SCORE_10.ln();
    let score = MIN_SCORE + (MAX_SCORE - MIN_SCORE) * (log_floor - perplexity.ln()) / log_span;

    round2(score.clamp(MIN_SCORE, MAX_SCORE))
}

/// Perplexity as reported to callers: rounded to 2 decimals, or `-1.0` when undefined.
pub fn perplexity_for_wire(perplexity: f64) -> f64 {
    if perplexity.is_finite() {
        round2(perplexity)
    } else {
        PERPLEXITY_SENTINEL
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
