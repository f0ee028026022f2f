//! Routes for the phase-progression engine.

use axum::extract::{Path, State};
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use questline_narrative::application::command_handlers::{self, SessionStart, TurnResponse};
use questline_narrative::application::query_handlers::{
    self, CatalogView, PhaseView, ProgressView,
};
use questline_narrative::domain::commands::{ProcessTurn, TurnOrigin};
use questline_narrative::domain::directions::Participants;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /turns.
#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    /// Raw turn text.
    pub content: String,
    /// `protagonist` or `narrator`.
    pub origin: TurnOrigin,
    /// Names substituted into stage directions.
    #[serde(default)]
    pub participants: Participants,
    /// Progression state persisted after the previous turn.
    #[serde(default)]
    pub progression_state: Option<Value>,
    /// Session state persisted after the previous turn.
    #[serde(default)]
    pub session_state: Option<Value>,
}

/// Request body for POST /progress.
#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    /// Progression state to describe.
    #[serde(default)]
    pub progression_state: Option<Value>,
    /// Session state to describe.
    #[serde(default)]
    pub session_state: Option<Value>,
}

/// POST /sessions
#[instrument(skip(state))]
async fn start_session(State(state): State<AppState>) -> Json<SessionStart> {
    info!("handling start_session");
    Json(command_handlers::handle_start_session(&state.catalog))
}

/// POST /turns
#[instrument(skip(state, request), fields(origin = ?request.origin))]
async fn process_turn(
    State(state): State<AppState>,
    Json(request): Json<TurnRequest>,
) -> Json<TurnResponse> {
    let command = ProcessTurn {
        correlation_id: Uuid::new_v4(),
        content: request.content,
        origin: request.origin,
        participants: request.participants,
        progression_state: request.progression_state,
        session_state: request.session_state,
    };

    info!(correlation_id = %command.correlation_id, "handling process_turn command");

    let response = command_handlers::handle_turn(&command, &state.catalog, state.clock.as_ref());

    info!(
        correlation_id = %command.correlation_id,
        outcome = response.outcome,
        phase = response.progression_state.current_phase,
        "turn processed"
    );

    Json(response)
}

/// GET /phases
#[instrument(skip(state))]
async fn list_phases(State(state): State<AppState>) -> Json<CatalogView> {
    Json(query_handlers::list_phases(&state.catalog))
}

/// GET /phases/{phase}
#[instrument(skip(state))]
async fn get_phase(
    State(state): State<AppState>,
    Path(phase): Path<u32>,
) -> Result<Json<PhaseView>, ApiError> {
    let view = query_handlers::get_phase(&state.catalog, phase)?;
    Ok(Json(view))
}

/// POST /progress
#[instrument(skip(state, request))]
async fn describe_progress(
    State(state): State<AppState>,
    Json(request): Json<ProgressRequest>,
) -> Json<ProgressView> {
    Json(query_handlers::describe_progress(
        &state.catalog,
        request.progression_state.as_ref(),
        request.session_state.as_ref(),
    ))
}

/// Returns the router for the stage context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(start_session))
        .route("/turns", post(process_turn))
        .route("/phases", get(list_phases))
        .route("/phases/{phase}", get(get_phase))
        .route("/progress", post(describe_progress))
}
