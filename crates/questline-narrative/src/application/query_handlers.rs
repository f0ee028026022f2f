//! Query handlers for the phase-progression engine.
//!
//! Read-only views over the catalog and a host-supplied state, for hosts
//! that want to show an operator where the story stands.

use questline_core::error::DomainError;
use serde::Serialize;
use serde_json::Value;

use crate::domain::catalog::{PhaseCatalog, PhaseDefinition};
use crate::domain::heuristics::Discovery;
use crate::domain::journal::JournalEntry;
use crate::domain::pacing::PacingStage;
use crate::domain::progression::{ProgressionState, SessionState};

/// Number of discoveries listed in a progress view.
const RECENT_DISCOVERIES: usize = 10;

/// Read-only view of one phase.
#[derive(Debug, Serialize)]
pub struct PhaseView {
    /// 1-based phase number.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Objective labels.
    pub objectives: Vec<String>,
    /// Phrases that end the phase.
    pub transition_phrases: Vec<String>,
    /// Whether the phase is never exited.
    pub terminal: bool,
}

impl From<&PhaseDefinition> for PhaseView {
    fn from(phase: &PhaseDefinition) -> Self {
        Self {
            id: phase.id,
            name: phase.name.clone(),
            description: phase.description.clone(),
            objectives: phase.objectives.clone(),
            transition_phrases: phase.transition_phrases.clone(),
            terminal: phase.is_terminal(),
        }
    }
}

/// Read-only view of the whole catalog.
#[derive(Debug, Serialize)]
pub struct CatalogView {
    /// Hex SHA-256 of the catalog source.
    pub version_hash: String,
    /// Number of phases.
    pub phase_count: usize,
    /// Phases in order.
    pub phases: Vec<PhaseView>,
}

/// Where a session stands.
#[derive(Debug, Serialize)]
pub struct ProgressView {
    /// Current phase number.
    pub current_phase: u32,
    /// Number of phases in the catalog.
    pub phase_count: usize,
    /// The current phase, if it is inside the catalog.
    pub phase: Option<PhaseView>,
    /// Human-readable position, e.g. "Phase 2 of 8".
    pub position: String,
    /// Furthest phase ever reached.
    pub furthest_phase: u32,
    /// Protagonist turns in the current phase.
    pub messages_in_phase: u32,
    /// Pacing stage for the current counter.
    pub pacing_stage: PacingStage,
    /// Journal entries, oldest first.
    pub journal: Vec<JournalEntry>,
    /// Most recent discoveries, newest first.
    pub recent_discoveries: Vec<Discovery>,
}

/// Lists every phase in the catalog.
#[must_use]
pub fn list_phases(catalog: &PhaseCatalog) -> CatalogView {
    CatalogView {
        version_hash: catalog.version_hash().to_owned(),
        phase_count: catalog.len(),
        phases: catalog.phases().iter().map(PhaseView::from).collect(),
    }
}

/// Retrieves one phase by number.
///
/// # Errors
///
/// Returns `DomainError::PhaseNotFound` if `phase` is outside the catalog.
pub fn get_phase(catalog: &PhaseCatalog, phase: u32) -> Result<PhaseView, DomainError> {
    catalog
        .definition_at(phase)
        .map(PhaseView::from)
        .ok_or(DomainError::PhaseNotFound(phase))
}

/// Describes a session's progress from host-persisted state values.
#[must_use]
pub fn describe_progress(
    catalog: &PhaseCatalog,
    progression_state: Option<&Value>,
    session_state: Option<&Value>,
) -> ProgressView {
    let progression = ProgressionState::rehydrate(progression_state);
    let session = SessionState::rehydrate(session_state).record(progression.current_phase);

    let position = if session.furthest_phase > progression.current_phase {
        format!(
            "Phase {} of {} (furthest: phase {})",
            progression.current_phase,
            catalog.len(),
            session.furthest_phase
        )
    } else {
        format!("Phase {} of {}", progression.current_phase, catalog.len())
    };

    ProgressView {
        current_phase: progression.current_phase,
        phase_count: catalog.len(),
        phase: catalog
            .definition_at(progression.current_phase)
            .map(PhaseView::from),
        position,
        furthest_phase: session.furthest_phase,
        messages_in_phase: progression.messages_in_phase,
        pacing_stage: catalog.pacing().stage(progression.messages_in_phase),
        recent_discoveries: progression
            .discoveries
            .iter()
            .rev()
            .take(RECENT_DISCOVERIES)
            .cloned()
            .collect(),
        journal: progression.journal_entries,
    }
}
