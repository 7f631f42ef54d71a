use std::path::PathBuf;

use crate::config::Config;
use crate::constants::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL_ID, DEFAULT_MODEL_REVISION};
use crate::model::error::ModelError;

/// Where to find the causal language model and how much of the input to feed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Hub identifier, also reported by the banner and readiness endpoints.
    pub model_id: String,
    /// Hub revision.
    pub revision: String,
    /// Local directory overriding the Hub download.
    pub model_dir: Option<PathBuf>,
    /// Token bound applied by the tokenizer and again before inference.
    pub max_tokens: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            revision: DEFAULT_MODEL_REVISION.to_string(),
            model_dir: None,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl ModelConfig {
    /// Creates a config for a Hub model at the default revision.
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            ..Default::default()
        }
    }

    /// Extracts the model settings from the server configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            model_id: config.model_id.clone(),
            revision: config.model_revision.clone(),
            model_dir: config.model_dir.clone(),
            max_tokens: config.max_tokens,
        }
    }

    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = Some(dir.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.model_id.trim().is_empty() {
            return Err(ModelError::InvalidConfig {
                reason: "model_id cannot be empty".to_string(),
            });
        }

        if self.max_tokens == 0 {
            return Err(ModelError::InvalidConfig {
                reason: "max_tokens must be at least 1".to_string(),
            });
        }

        if let Some(ref dir) = self.model_dir
            && !dir.is_dir()
        {
            return Err(ModelError::ModelNotFound { path: dir.clone() });
        }

        Ok(())
    }
}
