use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::constants::{
    CONGRUENCE_STATUS_ERROR, CONGRUENCE_STATUS_HEADER, CONGRUENCE_STATUS_INVALID_INPUT,
    CONGRUENCE_STATUS_UNLOADED,
};
use crate::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("the language model is not available or could not be loaded; try again later")]
    ModelUnavailable,

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<ScoringError> for GatewayError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::ModelUnavailable => GatewayError::ModelUnavailable,
            ScoringError::InvalidInput { reason } => GatewayError::InvalidRequest(reason),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, congruence_status) = match &self {
            GatewayError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, CONGRUENCE_STATUS_INVALID_INPUT)
            }
            GatewayError::ModelUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, CONGRUENCE_STATUS_UNLOADED)
            }
            GatewayError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, CONGRUENCE_STATUS_ERROR)
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            CONGRUENCE_STATUS_HEADER,
            HeaderValue::from_static(congruence_status),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
