// ============================================================
// Layer 1 — HTTP Error Responses
// ============================================================
// Maps per-request failures to a status code and a JSON body:
//
//   { "error": "missing_field", "field": "sex",
//     "detail": "missing required field 'sex'" }

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::predict_use_case::PredictError;
use crate::domain::{InferenceError, ValidationError};

#[derive(Debug)]
pub enum ApiError {
    MalformedBody(String),
    Validation(ValidationError),
    Inference(InferenceError),
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::Validation(e) => ApiError::Validation(e),
            PredictError::Inference(e) => ApiError::Inference(e),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MalformedBody(detail) => (
                StatusCode::BAD_REQUEST,
                ErrorBody { error: "malformed_body", field: None, value: None, detail },
            ),
            ApiError::Validation(err) => {
                let value = match &err {
                    ValidationError::InvalidCategory { value, .. } => Some(value.clone()),
                    _ => None,
                };
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorBody {
                        error: err.kind(),
                        field: Some(err.field().to_string()),
                        value,
                        detail: err.to_string(),
                    },
                )
            }
            ApiError::Inference(err) => {
                tracing::error!("Inference failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "inference_failed",
                        field: None,
                        value: None,
                        detail: err.to_string(),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
