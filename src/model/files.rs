//! Model file resolution (local directory or Hub cache) and tokenizer construction.

use std::path::{Path, PathBuf};

use hf_hub::api::sync::{Api, ApiRepo};
use hf_hub::{Repo, RepoType};
use tokenizers::models::bpe::BPE;
use tokenizers::pre_tokenizers::byte_level::ByteLevel;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::model::config::ModelConfig;
use crate::model::error::ModelError;

pub const CONFIG_FILE: &str = "config.json";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const VOCAB_FILE: &str = "vocab.json";
pub const MERGES_FILE: &str = "merges.txt";
pub const SAFETENSORS_FILE: &str = "model.safetensors";
pub const PYTORCH_FILE: &str = "pytorch_model.bin";

/// Tokenizer sources, in order of preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizerFiles {
    /// A serialized `tokenizers` pipeline.
    Json(PathBuf),
    /// Raw byte-level BPE vocabulary and merges (GPT-2 layout).
    VocabMerges { vocab: PathBuf, merges: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeightsFile {
    SafeTensors(PathBuf),
    PyTorch(PathBuf),
}

impl WeightsFile {
    pub fn path(&self) -> &Path {
        match self {
            WeightsFile::SafeTensors(path) | WeightsFile::PyTorch(path) => path,
        }
    }
}

/// Paths to every file needed to build the tokenizer and the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub config_path: PathBuf,
    pub tokenizer: TokenizerFiles,
    pub weights: WeightsFile,
}

impl ModelFiles {
    /// Resolves files from the configured local directory, or downloads them from the Hub.
    pub fn resolve(config: &ModelConfig) -> Result<Self, ModelError> {
        match &config.model_dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::from_hub(&config.model_id, &config.revision),
        }
    }

    /// Resolves files inside a local model directory.
    pub fn from_dir(dir: &Path) -> Result<Self, ModelError> {
        if !dir.is_dir() {
            return Err(ModelError::ModelNotFound {
                path: dir.to_path_buf(),
            });
        }

        let config_path = dir.join(CONFIG_FILE);
        if !config_path.is_file() {
            return Err(ModelError::ModelNotFound { path: config_path });
        }

        let tokenizer = if dir.join(TOKENIZER_FILE).is_file() {
            TokenizerFiles::Json(dir.join(TOKENIZER_FILE))
        } else if dir.join(VOCAB_FILE).is_file() && dir.join(MERGES_FILE).is_file() {
            TokenizerFiles::VocabMerges {
                vocab: dir.join(VOCAB_FILE),
                merges: dir.join(MERGES_FILE),
            }
        } else {
            return Err(ModelError::ModelNotFound {
                path: dir.join(TOKENIZER_FILE),
            });
        };

        let weights = if dir.join(SAFETENSORS_FILE).is_file() {
            WeightsFile::SafeTensors(dir.join(SAFETENSORS_FILE))
        } else if dir.join(PYTORCH_FILE).is_file() {
            WeightsFile::PyTorch(dir.join(PYTORCH_FILE))
        } else {
            return Err(ModelError::ModelNotFound {
                path: dir.join(SAFETENSORS_FILE),
            });
        };

        debug!(dir = %dir.display(), ?tokenizer, ?weights, "Resolved local model files");

        Ok(Self {
            config_path,
            tokenizer,
            weights,
        })
    }

    /// Downloads (or reuses the cached copy of) the model files from the Hub.
    ///
    /// Blocking: performs synchronous network and disk I/O.
    pub fn from_hub(model_id: &str, revision: &str) -> Result<Self, ModelError> {
        info!(model_id, revision, "Fetching model files from the hub");

        let api = Api::new().map_err(|e| ModelError::ModelLoadFailed {
            reason: format!("failed to initialize hub client: {e}"),
        })?;
        let repo = api.repo(Repo::with_revision(
            model_id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));

        let config_path = fetch(&repo, CONFIG_FILE)?;

        let tokenizer = match fetch(&repo, TOKENIZER_FILE) {
            Ok(path) => TokenizerFiles::Json(path),
            Err(e) => {
                debug!(error = %e, "No tokenizer.json, falling back to vocab/merges");
                TokenizerFiles::VocabMerges {
                    vocab: fetch(&repo, VOCAB_FILE)?,
                    merges: fetch(&repo, MERGES_FILE)?,
                }
            }
        };

        let weights = match fetch(&repo, SAFETENSORS_FILE) {
            Ok(path) => WeightsFile::SafeTensors(path),
            Err(e) => {
                debug!(error = %e, "No safetensors weights, falling back to pytorch_model.bin");
                WeightsFile::PyTorch(fetch(&repo, PYTORCH_FILE)?)
            }
        };

        Ok(Self {
            config_path,
            tokenizer,
            weights,
        })
    }
}

fn fetch(repo: &ApiRepo, file: &str) -> Result<PathBuf, ModelError> {
    repo.get(file).map_err(|e| ModelError::DownloadFailed {
        file: file.to_string(),
        reason: e.to_string(),
    })
}

/// Builds the tokenizer with truncation enabled at `max_len` tokens.
pub fn load_tokenizer(files: &TokenizerFiles, max_len: usize) -> Result<Tokenizer, ModelError> {
    let mut tokenizer = match files {
        TokenizerFiles::Json(path) => {
            Tokenizer::from_file(path).map_err(|e| ModelError::ModelLoadFailed {
                reason: format!("failed to load {}: {}", path.display(), e),
            })?
        }
        TokenizerFiles::VocabMerges { vocab, merges } => {
            let bpe = BPE::from_file(&vocab.to_string_lossy(), &merges.to_string_lossy())
                .build()
                .map_err(|e| ModelError::ModelLoadFailed {
                    reason: format!("failed to build BPE from {}: {}", vocab.display(), e),
                })?;

            let mut tokenizer = Tokenizer::new(bpe);
            tokenizer.with_pre_tokenizer(Some(ByteLevel::default().add_prefix_space(false)));
            tokenizer.with_decoder(Some(ByteLevel::default()));
            tokenizer
        }
    };

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| ModelError::InvalidConfig {
            reason: format!("failed to configure truncation: {}", e),
        })?;

    Ok(tokenizer)
}
