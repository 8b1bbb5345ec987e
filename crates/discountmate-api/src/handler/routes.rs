//! Route definitions
//!
//! - GET /health - readiness check
//! - POST /recommend - score a basket
//! - GET /metrics - Prometheus scrape endpoint
//! - POST /simulate_error - deliberate 500 for alerting drills

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use discountmate_core::BasketRequest;
use tower_http::trace::TraceLayer;

use super::{
    request_logging_middleware, track_metrics, ApiError, AppState, HealthResponse,
    RecommendPayload, RecommendResponse,
};

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/recommend", post(recommend))
        .route("/metrics", get(metrics))
        .route("/simulate_error", post(simulate_error))
        .route_layer(middleware::from_fn_with_state(state.clone(), track_metrics))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// POST /recommend
///
/// Malformed bodies are reported as 400 like any other invalid request.
pub async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendPayload>, JsonRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected recommend body");
        ApiError::bad_request(rejection.body_text())
    })?;

    let basket = BasketRequest::new(payload.total, payload.items, &payload.tier).map_err(|e| {
        tracing::debug!(error = %e, field = e.field(), "Invalid basket");
        ApiError::from(e)
    })?;

    let discount = state.model.predict(&basket);

    Ok(Json(RecommendResponse { discount }))
}

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state
        .metrics
        .encode_text()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, state.metrics.content_type())], body))
}

/// POST /simulate_error
pub async fn simulate_error(State(state): State<AppState>) -> ApiError {
    state.metrics.record_simulated_error();
    tracing::warn!(
        total = state.metrics.simulated_errors(),
        "Simulated failure requested"
    );
    ApiError::SimulatedFailure
}
