use tracing::{error, info};

use crate::lifecycle::handle::ModelHandle;
use crate::model::{Gpt2LanguageModel, ModelConfig};

/// Loads the production model on a blocking worker.
///
/// Never fails: any error, including a panicked worker, is logged and yields
/// [`ModelHandle::Unloaded`].
pub async fn load_model_handle(config: ModelConfig) -> ModelHandle {
    let model_id = config.model_id.clone();
    info!(
        model_id = %model_id,
        revision = %config.revision,
        model_dir = ?config.model_dir,
        max_tokens = config.max_tokens,
        "Loading language model"
    );

    let result = tokio::task::spawn_blocking(move || {
        ModelHandle::load_with(&config.model_id, || Gpt2LanguageModel::load(&config))
    })
    .await;

    match result {
        Ok(handle) => handle,
        Err(e) => {
            error!(model_id = %model_id, error = %e, "Model loading task failed");
            ModelHandle::Unloaded
        }
    }
}
