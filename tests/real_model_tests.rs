//! Scoring with the real Spanish GPT-2.
//!
//! Downloads the model from the Hugging Face Hub (or reads `CONGRUENCE_MODEL_DIR`).
//! Run with `cargo test --test real_model_tests -- --ignored`.

use congruence::config::Config;
use congruence::lifecycle::load_model_handle;
use congruence::model::ModelConfig;
use congruence::scoring::ScoringService;

async fn real_service() -> ScoringService {
    let config = Config::from_env().expect("config should load");
    let handle = load_model_handle(ModelConfig::from_config(&config)).await;
    assert!(handle.is_ready(), "model should load from the hub or CONGRUENCE_MODEL_DIR");
    ScoringService::new(handle, config.max_tokens)
}

#[tokio::test]
#[ignore = "requires network access or a local model directory"]
async fn test_real_model_scores_coherent_sentence_high() {
    let service = real_service().await;

    let result = tokio::task::spawn_blocking(move || service.evaluate("El gato come pescado."))
        .await
        .unwrap()
        .unwrap();

    assert!(result.congruence_score >= 7.0, "got {result:?}");
    assert!(result.computed_perplexity > 0.0 && result.computed_perplexity < 700.0);
}

#[tokio::test]
#[ignore = "requires network access or a local model directory"]
async fn test_real_model_scores_gibberish_low() {
    let service = real_service().await;

    let result = tokio::task::spawn_blocking(move || {
        service.evaluate("pescado pescado pescado xyz #@!")
    })
    .await
    .unwrap()
    .unwrap();

    assert!(result.congruence_score <= 3.0, "got {result:?}");
}
