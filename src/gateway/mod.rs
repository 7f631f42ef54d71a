//! HTTP gateway (Axum) for congruence scoring.
//!
//! This module is primarily used by the `congruence` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::evaluate_handler;
pub use payload::{BannerResponse, EvaluateRequest, HealthResponse, ReadyResponse};
pub use state::HandlerState;

use crate::constants::{
    CONGRUENCE_STATUS_HEADER, CONGRUENCE_STATUS_HEALTHY, CONGRUENCE_STATUS_READY,
    CONGRUENCE_STATUS_UNLOADED,
};
use crate::lifecycle::ModelState;

const BANNER_MESSAGE: &str = "Congruence scoring API for Spanish text. POST /evaluate with {\"text\": \"...\"} to get a 1-10 score.";

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/evaluate", post(evaluate_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tracing::instrument(skip(state))]
pub async fn root_handler(State(state): State<HandlerState>) -> Json<BannerResponse> {
    Json(BannerResponse {
        message: BANNER_MESSAGE,
        model: state.model_id.to_string(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONGRUENCE_STATUS_HEADER,
        HeaderValue::from_static(CONGRUENCE_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let model_state = state.scoring.handle().state();

    let (status_code, status_msg, header) = match model_state {
        ModelState::Ready => (StatusCode::OK, "ok", CONGRUENCE_STATUS_READY),
        ModelState::Unloaded => (
            StatusCode::SERVICE_UNAVAILABLE,
            "unavailable",
            CONGRUENCE_STATUS_UNLOADED,
        ),
    };

    let mut headers = HeaderMap::new();
    headers.insert(CONGRUENCE_STATUS_HEADER, HeaderValue::from_static(header));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            model: model_state.as_str(),
            model_id: state.model_id.to_string(),
        }),
    )
        .into_response()
}
