use candle_core::Device;
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::model::LanguageModel;
use crate::model::config::ModelConfig;
use crate::model::device::select_device;
use crate::model::error::ModelError;
use crate::model::files::{ModelFiles, load_tokenizer};
use crate::model::gpt2::Gpt2LmHeadModel;

/// Tokenizer + GPT-2 pair loaded for one model identifier.
pub struct Gpt2LanguageModel {
    model_id: String,
    tokenizer: Tokenizer,
    model: Gpt2LmHeadModel,
    max_tokens: usize,
    device: Device,
}

impl std::fmt::Debug for Gpt2LanguageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gpt2LanguageModel")
            .field("model_id", &self.model_id)
            .field("device", &format!("{:?}", self.device))
            .field("max_tokens", &self.max_tokens)
            .field("num_layers", &self.model.config().n_layer)
            .finish()
    }
}

impl Gpt2LanguageModel {
    /// Resolves the model files and loads tokenizer and weights.
    ///
    /// Blocking: may download from the Hub and maps the weights into memory.
    pub fn load(config: &ModelConfig) -> Result<Self, ModelError> {
        config.validate()?;

        let device = select_device()?;
        debug!(?device, "Selected compute device for language model");

        let files = ModelFiles::resolve(config)?;
        Self::from_files(&config.model_id, &files, config.max_tokens, device)
    }

    /// Loads tokenizer and weights from already resolved files.
    pub fn from_files(
        model_id: &str,
        files: &ModelFiles,
        max_tokens: usize,
        device: Device,
    ) -> Result<Self, ModelError> {
        info!(
            model_id,
            weights = %files.weights.path().display(),
            "Loading causal language model"
        );

        let model = Gpt2LmHeadModel::from_files(files, &device).map_err(|e| {
            ModelError::ModelLoadFailed {
                reason: format!("Failed to load GPT-2 weights: {}", e),
            }
        })?;

        let context_window = model.config().n_positions;
        let max_tokens = if max_tokens > context_window {
            warn!(
                max_tokens,
                context_window, "Token bound exceeds the model context window, clamping"
            );
            context_window
        } else {
            max_tokens
        };

        let tokenizer = load_tokenizer(&files.tokenizer, max_tokens)?;

        info!(
            model_id,
            num_layers = model.config().n_layer,
            hidden_size = model.config().n_embd,
            vocab_size = model.config().vocab_size,
            max_tokens,
            "Language model loaded successfully"
        );

        Ok(Self {
            model_id: model_id.to_string(),
            tokenizer,
            model,
            max_tokens,
            device,
        })
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

impl LanguageModel for Gpt2LanguageModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn encode(&self, text: &str, max_tokens: usize) -> Result<Vec<u32>, ModelError> {
        let encoding =
            self.tokenizer
                .encode(text, true)
                .map_err(|e| ModelError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let mut ids = encoding.get_ids().to_vec();
        ids.truncate(max_tokens.min(self.max_tokens));
        Ok(ids)
    }

    fn mean_loss(&self, token_ids: &[u32]) -> Result<f32, ModelError> {
        debug!(token_count = token_ids.len(), "Running causal LM forward pass");

        self.model
            .mean_loss(token_ids)
            .map_err(|e| ModelError::InferenceFailed {
                reason: e.to_string(),
            })
    }
}
