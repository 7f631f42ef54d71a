use std::fmt;
use std::sync::Arc;

use tracing::{error, info};

use crate::constants::{CONGRUENCE_STATUS_READY, CONGRUENCE_STATUS_UNLOADED};
use crate::model::{LanguageModel, ModelError};

/// Availability of the language model.
#[derive(Clone, Default)]
pub enum ModelHandle {
    /// No model; every scoring request is refused.
    #[default]
    Unloaded,
    /// A loaded model, shared read-only across requests.
    Ready(Arc<dyn LanguageModel>),
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelHandle::Unloaded => f.write_str("Unloaded"),
            ModelHandle::Ready(model) => f.debug_tuple("Ready").field(&model.model_id()).finish(),
        }
    }
}

impl ModelHandle {
    pub fn ready<M: LanguageModel + 'static>(model: M) -> Self {
        ModelHandle::Ready(Arc::new(model))
    }

    /// Runs `load` once. A failure is logged and yields [`ModelHandle::Unloaded`].
    pub fn load_with<M, F>(model_id: &str, load: F) -> Self
    where
        M: LanguageModel + 'static,
        F: FnOnce() -> Result<M, ModelError>,
    {
        match load() {
            Ok(model) => {
                info!(model_id, "Language model ready");
                Self::ready(model)
            }
            Err(e) => {
                error!(
                    model_id,
                    error = %e,
                    "Failed to load language model; scoring requests will be refused"
                );
                ModelHandle::Unloaded
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelHandle::Ready(_))
    }

    /// Returns the model when [`ModelHandle::Ready`].
    pub fn model(&self) -> Option<&Arc<dyn LanguageModel>> {
        match self {
            ModelHandle::Ready(model) => Some(model),
            ModelHandle::Unloaded => None,
        }
    }

    pub fn model_id(&self) -> Option<&str> {
        self.model().map(|model| model.model_id())
    }

    pub fn state(&self) -> ModelState {
        match self {
            ModelHandle::Ready(_) => ModelState::Ready,
            ModelHandle::Unloaded => ModelState::Unloaded,
        }
    }
}

/// Payload-free view of a [`ModelHandle`], as reported by `/ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    Unloaded,
    Ready,
}

impl ModelState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelState::Unloaded => CONGRUENCE_STATUS_UNLOADED,
            ModelState::Ready => CONGRUENCE_STATUS_READY,
        }
    }
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
