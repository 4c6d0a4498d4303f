use super::{router, AppState};
use crate::config::{CorsConfig, ServerConfig};
use crate::utils::error::{ManifestError, Result};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub fn build_cors(config: &CorsConfig) -> Result<CorsLayer> {
    let origin = if config.allows_any() {
        AllowOrigin::any()
    } else {
        let origins = config
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|e| ManifestError::InvalidConfigValueError {
                    field: "cors.allowed_origins".to_string(),
                    value: origin.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any))
}

pub async fn serve(server: &ServerConfig, cors: &CorsConfig, state: AppState) -> Result<()> {
    let app = router(state, build_cors(cors)?);

    let listener = tokio::net::TcpListener::bind(server.bind_address()).await?;
    tracing::info!("🚀 Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
