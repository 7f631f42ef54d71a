//! Causal language model provider.
//!
//! - [`LanguageModel`] is the seam the scoring pipeline depends on: tokenize, then compute the
//!   mean self-supervised loss of a token sequence.
//! - [`Gpt2LanguageModel`] is the production implementation (GPT-2 on candle).
//! - [`MockLanguageModel`] is a deterministic stand-in for tests (`mock` feature).

/// Production language model (tokenizer + GPT-2).
pub mod causal;
/// Model location and token bound.
pub mod config;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Model file resolution and tokenizer loading.
pub mod files;
/// GPT-2 architecture.
pub mod gpt2;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use causal::Gpt2LanguageModel;
pub use config::ModelConfig;
pub use error::ModelError;
pub use files::{ModelFiles, TokenizerFiles, WeightsFile};
pub use gpt2::{Gpt2Config, Gpt2LmHeadModel};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockLanguageModel;

/// Tokenizer and inference capability for one fixed model.
///
/// Implementations are shared read-only across concurrent requests and must not mutate
/// weights. Both methods are blocking and may be CPU/accelerator bound.
pub trait LanguageModel: Send + Sync {
    /// Identifier of the loaded model.
    fn model_id(&self) -> &str;

    /// Converts `text` into token ids, keeping at most `max_tokens`.
    fn encode(&self, text: &str, max_tokens: usize) -> Result<Vec<u32>, ModelError>;

    /// Average next-token cross-entropy of `token_ids` predicting themselves.
    fn mean_loss(&self, token_ids: &[u32]) -> Result<f32, ModelError>;
}
