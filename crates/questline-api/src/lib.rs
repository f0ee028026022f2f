//! HTTP adapter for the phase-progression engine.
//!
//! The server keeps no session state: hosts send the state they persisted
//! after the previous turn and store whatever comes back.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the full application router.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/stage", routes::stage::router())
        .with_state(app_state)
}
