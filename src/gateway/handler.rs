use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

use crate::constants::{CONGRUENCE_STATUS_HEADER, CONGRUENCE_STATUS_SCORED};
use crate::gateway::error::GatewayError;
use crate::gateway::payload::EvaluateRequest;
use crate::gateway::state::HandlerState;
use crate::scoring::ScoreResult;

#[instrument(skip(state, body), fields(text_len = tracing::field::Empty))]
pub async fn evaluate_handler(
    State(state): State<HandlerState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(body) = body.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    let request = parse_evaluate_request(&body)?;
    tracing::Span::current().record("text_len", request.text.len());

    debug!("Scoring request received");

    let scoring = Arc::clone(&state.scoring);
    let result = tokio::task::spawn_blocking(move || scoring.evaluate(&request.text))
        .await
        .map_err(|e| GatewayError::InternalError(format!("Scoring task failed: {}", e)))??;

    Ok(make_response(result))
}

/// Extracts the `text` field; blank text is left to the scoring service.
pub(crate) fn parse_evaluate_request(
    body: &serde_json::Value,
) -> Result<EvaluateRequest, GatewayError> {
    let text = body
        .get("text")
        .ok_or_else(|| GatewayError::InvalidRequest("Missing `text` field".to_string()))?
        .as_str()
        .ok_or_else(|| GatewayError::InvalidRequest("`text` must be a string".to_string()))?;

    Ok(EvaluateRequest {
        text: text.to_string(),
    })
}

pub(crate) fn make_response(result: ScoreResult) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONGRUENCE_STATUS_HEADER,
        HeaderValue::from_static(CONGRUENCE_STATUS_SCORED),
    );

    (StatusCode::OK, headers, Json(result)).into_response()
}
