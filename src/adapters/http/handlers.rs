use super::error::ErrorResponse;
use super::AppState;
use crate::core::StopList;
use crate::utils::error::ManifestError;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrRequest {
    /// base64 data URL
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub extraction: String,
}

/// POST /ocr
///
/// Body `{"image": "<data-url>"}`, returns `{"stops": [...]}`.
///
/// # Errors
/// - 400: malformed body, data URL, base64 or image
/// - 404: no text or no delivery stops found
/// - 500: OCR backend failure
pub async fn ocr_handler(
    State(state): State<AppState>,
    payload: Result<Json<OcrRequest>, JsonRejection>,
) -> Result<Json<StopList>, ManifestError> {
    let Json(request) = payload?;
    tracing::debug!("OCR request received ({} chars)", request.image.len());

    let stops = state.engine.run(&request.image).await?;
    Ok(Json(StopList::from(stops)))
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let pipeline = state.engine.pipeline();
    Json(HealthResponse {
        status: "ok".to_string(),
        backend: pipeline.backend_name().to_string(),
        extraction: pipeline.extraction_mode().to_string(),
    })
}

/// Fallback for unknown routes, in the same JSON shape as other errors
pub async fn not_found_handler() -> (axum::http::StatusCode, Json<ErrorResponse>) {
    (
        axum::http::StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "not_found".to_string(),
            message: "Route not found".to_string(),
        }),
    )
}
