use std::sync::Arc;

use crate::scoring::ScoringService;

#[derive(Clone)]
pub struct HandlerState {
    pub scoring: Arc<ScoringService>,

    /// Configured model identifier, reported even when the model failed to load.
    pub model_id: Arc<str>,
}

impl HandlerState {
    pub fn new(scoring: ScoringService, model_id: impl Into<Arc<str>>) -> Self {
        Self {
            scoring: Arc::new(scoring),
            model_id: model_id.into(),
        }
    }
}
