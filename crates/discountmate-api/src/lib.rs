//! DiscountMate recommendation service
//!
//! Trains the discount model once at startup and serves it over HTTP:
//!
//! - `GET /health` → `{"status": "ok"}`
//! - `POST /recommend` with `{"total": 220.0, "items": 5, "tier": "silver"}` →
//!   `{"discount": 0.27}`
//! - `GET /metrics` → Prometheus text exposition
//! - `POST /simulate_error` → 500, increments `dm_errors_total`
//!
//! ## Example
//!
//! ```rust,no_run
//! use discountmate_api::{build_state, config::ServiceConfig, serve};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServiceConfig::default();
//!     let state = build_state(&config)?;
//!     serve(&config, state).await
//! }
//! ```

pub mod config;
pub mod handler;
pub mod logging;
pub mod metrics;

pub use config::{ConfigError, ConfigOverrides, LogFormat, ServiceConfig};
pub use handler::{create_router, ApiError, AppState, RecommendPayload, RecommendResponse};
pub use metrics::ServiceMetrics;

use anyhow::Context;
use discountmate_core::DiscountModel;

/// Service version (from Cargo.toml)
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Train the model and set up metrics
pub fn build_state(config: &ServiceConfig) -> anyhow::Result<AppState> {
    let model = DiscountModel::train(&config.model).context("failed to train discount model")?;
    let metrics = ServiceMetrics::new().context("failed to register metrics")?;
    Ok(AppState::new(model, metrics))
}

/// Bind the listener and serve until Ctrl-C
pub async fn serve(config: &ServiceConfig, state: AppState) -> anyhow::Result<()> {
    let addr = config.server.socket_addr()?;
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(%addr, version = SERVICE_VERSION, "DiscountMate listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("DiscountMate stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
