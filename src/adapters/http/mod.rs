pub mod error;
pub mod handlers;
pub mod server;

pub use error::ErrorResponse;
pub use handlers::{HealthResponse, OcrRequest};

use crate::adapters::ocr::build_backend;
use crate::config::ServiceConfig;
use crate::core::engine::ManifestEngine;
use crate::core::pipeline::OcrPipeline;
use crate::utils::error::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Request body limit, above the decoded image cap once base64 overhead is added
pub const MAX_BODY_SIZE: usize = 15 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ManifestEngine<OcrPipeline>>,
}

impl AppState {
    pub fn new(pipeline: OcrPipeline) -> Self {
        Self {
            engine: Arc::new(ManifestEngine::new(pipeline)),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let backend = build_backend(&config.ocr)?;
        let extractor = config.extraction.mode.build(config.extraction.consumption);
        tracing::info!(
            "🧭 Extraction mode: {} (data URL: {:?}, consumption: {:?})",
            extractor.mode_name(),
            config.extraction.data_url,
            config.extraction.consumption
        );

        Ok(Self::new(OcrPipeline::new(
            backend,
            extractor,
            config.extraction.data_url,
        )))
    }
}

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/ocr", post(handlers::ocr_handler))
        .route("/health", get(handlers::health_handler))
        .fallback(handlers::not_found_handler)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
