// ============================================================
// Layer 1 — HTTP Adapter
// ============================================================
// Thin request/response front end over PredictUseCase.
//
//   GET  /         → 200 {"status": "ok"}
//   POST /predict  → 200 {"prediction": ["<=50K"]}
//                    400 body is not a JSON object
//                    422 validation failure (field + reason)
//                    500 inference failure
//
// Every per-request error is turned into a JSON response here;
// nothing propagates past the handlers.

pub mod error;
pub mod handlers;

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};

use crate::application::predict_use_case::PredictUseCase;

/// Settings for `serve`, converted from the CLI flags.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub addr:      SocketAddr,
    pub model_dir: String,
}

/// Shared, read-only state handed to every handler.
pub type AppState = Arc<PredictUseCase>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot bind {addr}"))?;

    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
