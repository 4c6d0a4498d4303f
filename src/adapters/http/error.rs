use crate::utils::error::ManifestError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<&ManifestError> for ErrorResponse {
    fn from(err: &ManifestError) -> Self {
        Self {
            error: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

// 超過 body 上限維持 413，其餘格式問題一律 400
impl From<JsonRejection> for ManifestError {
    fn from(rejection: JsonRejection) -> Self {
        let status = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            StatusCode::PAYLOAD_TOO_LARGE
        } else {
            StatusCode::BAD_REQUEST
        };
        ManifestError::InvalidRequest {
            status: status.as_u16(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ManifestError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.is_client_error() {
            tracing::warn!("❌ Request failed ({}): {}", status, self);
        } else {
            tracing::error!("❌ Request failed ({}): {}", status, self);
        }

        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
