//! Questline API server entry point.

use std::sync::Arc;

use questline_api::config::ServerConfig;
use questline_api::error::AppError;
use questline_api::state::AppState;
use questline_core::clock::SystemClock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Questline API server");

    let config = ServerConfig::from_env()?;
    let catalog = config.load_catalog()?;

    let app_state = AppState::new(Arc::new(catalog), Arc::new(SystemClock));

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = questline_api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
