//! Deterministic language model for tests.
//!
//! Tokenizes on whitespace (one id per word, starting at 1) and returns a configured loss, so
//! tests can drive the scoring pipeline to any perplexity without model files.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::model::LanguageModel;
use crate::model::error::ModelError;

#[derive(Debug, Clone, PartialEq)]
enum MockBehavior {
    /// Every sequence has this loss.
    FixedLoss(f32),
    /// Texts containing `needle` get `matched`, all others `otherwise`.
    LossByContent {
        needle: String,
        matched: f32,
        otherwise: f32,
    },
    FailTokenization,
    FailInference,
    /// Tokenization succeeds but yields no ids.
    EmptyTokenization,
}

#[derive(Debug)]
pub struct MockLanguageModel {
    model_id: String,
    behavior: MockBehavior,
    encode_calls: AtomicUsize,
    loss_calls: AtomicUsize,
}

impl MockLanguageModel {
    pub const MODEL_ID: &'static str = "mock/gpt2";

    /// Leading id marking a text that matched the content needle.
    const MATCH_MARKER: u32 = 0;

    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            model_id: Self::MODEL_ID.to_string(),
            behavior,
            encode_calls: AtomicUsize::new(0),
            loss_calls: AtomicUsize::new(0),
        }
    }

    /// Every sequence scores `loss` (perplexity `e^loss`).
    pub fn with_loss(loss: f32) -> Self {
        Self::with_behavior(MockBehavior::FixedLoss(loss))
    }

    /// Every sequence scores the given perplexity.
    pub fn with_perplexity(perplexity: f64) -> Self {
        Self::with_loss(perplexity.ln() as f32)
    }

    /// Texts containing `needle` score `matched` perplexity, others `otherwise`.
    pub fn with_perplexity_by_content(
        needle: impl Into<String>,
        matched: f64,
        otherwise: f64,
    ) -> Self {
        Self::with_behavior(MockBehavior::LossByContent {
            needle: needle.into(),
            matched: matched.ln() as f32,
            otherwise: otherwise.ln() as f32,
        })
    }

    pub fn failing_tokenization() -> Self {
        Self::with_behavior(MockBehavior::FailTokenization)
    }

    pub fn failing_inference() -> Self {
        Self::with_behavior(MockBehavior::FailInference)
    }

    pub fn empty_tokenization() -> Self {
        Self::with_behavior(MockBehavior::EmptyTokenization)
    }

    pub fn encode_calls(&self) -> usize {
        self.encode_calls.load(Ordering::SeqCst)
    }

    pub fn loss_calls(&self) -> usize {
        self.loss_calls.load(Ordering::SeqCst)
    }
}

impl LanguageModel for MockLanguageModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn encode(&self, text: &str, max_tokens: usize) -> Result<Vec<u32>, ModelError> {
        self.encode_calls.fetch_add(1, Ordering::SeqCst);

        let marker = match &self.behavior {
            MockBehavior::FailTokenization => {
                return Err(ModelError::TokenizationFailed {
                    reason: "mock tokenizer failure".to_string(),
                });
            }
            MockBehavior::EmptyTokenization => return Ok(Vec::new()),
            MockBehavior::LossByContent { needle, .. } if text.contains(needle.as_str()) => {
                Some(Self::MATCH_MARKER)
            }
            _ => None,
        };

        let words = text
            .split_whitespace()
            .enumerate()
            .map(|(idx, _)| idx as u32 + 1);

        Ok(marker.into_iter().chain(words).take(max_tokens).collect())
    }

    fn mean_loss(&self, token_ids: &[u32]) -> Result<f32, ModelError> {
        self.loss_calls.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::FixedLoss(loss) => Ok(*loss),
            MockBehavior::LossByContent { matched, otherwise, .. } => {
                if token_ids.first() == Some(&Self::MATCH_MARKER) {
                    Ok(*matched)
                } else {
                    Ok(*otherwise)
                }
            }
            MockBehavior::FailInference => Err(ModelError::InferenceFailed {
                reason: format!("mock inference failure on {} tokens", token_ids.len()),
            }),
            MockBehavior::FailTokenization | MockBehavior::EmptyTokenization => {
                Err(ModelError::InferenceFailed {
                    reason: "mock inference reached without tokens".to_string(),
                })
            }
        }
    }
}
