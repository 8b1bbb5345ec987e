//! HTTP handlers for the discount service
//!
//! - `routes`: router and endpoint handlers
//! - `middleware`: request metrics and request logging
//!
//! All bodies are JSON except `/metrics`, which serves the Prometheus text
//! exposition format.

pub mod middleware;
pub mod routes;

pub use middleware::{request_logging_middleware, track_metrics, REQUEST_ID_HEADER};
pub use routes::{create_router, health_check, metrics, recommend, simulate_error};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use discountmate_core::{DiscountModel, ValidationError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::metrics::ServiceMetrics;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Trained model, read-only for the life of the process
    pub model: Arc<DiscountModel>,
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(model: DiscountModel, metrics: ServiceMetrics) -> Self {
        Self {
            model: Arc::new(model),
            metrics: Arc::new(metrics),
        }
    }
}

/// Body of `POST /recommend`
///
/// Missing fields fall back to an empty single-item bronze basket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendPayload {
    #[serde(default)]
    pub total: f64,
    #[serde(default = "default_items")]
    pub items: i64,
    #[serde(default = "default_tier")]
    pub tier: String,
}

fn default_items() -> i64 {
    1
}

fn default_tier() -> String {
    "bronze".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub discount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Error body returned with every non-2xx JSON response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Request failed validation or could not be parsed
    BadRequest {
        detail: String,
        field: Option<&'static str>,
    },
    /// Deliberate failure from `/simulate_error`
    SimulatedFailure,
    Internal(String),
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        ApiError::BadRequest {
            detail: detail.into(),
            field: None,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "INVALID_REQUEST",
            ApiError::SimulatedFailure => "SIMULATED_FAILURE",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::SimulatedFailure | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        let (detail, field) = match self {
            ApiError::BadRequest { detail, field } => (detail.clone(), field.map(String::from)),
            ApiError::SimulatedFailure => ("simulated failure".to_string(), None),
            ApiError::Internal(msg) => (msg.clone(), None),
        };
        ErrorBody {
            code: self.error_code().to_string(),
            detail,
            field,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest {
            detail: err.to_string(),
            field: Some(err.field()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
