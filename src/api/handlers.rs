// ============================================================
// Layer 1 — HTTP Handlers
// ============================================================

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use super::{error::ApiError, AppState};
use crate::domain::IncomeLabel;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// One label per submitted record; always a single element here.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: Vec<IncomeLabel>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::warn!("Rejected request body: {rejection}");
        ApiError::MalformedBody(rejection.body_text())
    })?;

    let Value::Object(fields) = body else {
        return Err(ApiError::MalformedBody("expected a JSON object of field values".into()));
    };

    let result = state.execute(&fields).map_err(|err| {
        tracing::info!("Prediction request rejected: {err}");
        ApiError::from(err)
    })?;

    Ok(Json(PredictResponse { prediction: vec![result.label] }))
}
