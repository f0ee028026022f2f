//! Command handlers for the phase-progression engine.
//!
//! These functions sit between the host and the domain: rehydrate the opaque
//! state values, run the engine, and hand back what the host must persist.

use chrono::{DateTime, Utc};
use questline_core::clock::Clock;
use questline_core::event::{DomainEvent, EventMetadata};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::catalog::PhaseCatalog;
use crate::domain::commands::ProcessTurn;
use crate::domain::engine::{PhaseEngine, TurnOutcome};
use crate::domain::events::{
    DiscoveryRecorded, PhaseAdvanced, PhaseCompleted, ProgressionEvent, ProgressionEventKind,
};
use crate::domain::progression::{ProgressionState, SessionState};

/// Initial state handed to the host when a session starts.
#[derive(Debug, Serialize)]
pub struct SessionStart {
    /// Progression state for the first turn.
    pub progression_state: ProgressionState,
    /// Session state for the first turn.
    pub session_state: SessionState,
    /// Hash of the catalog the session runs against.
    pub catalog_version: String,
}

/// Serialized view of an event raised during a turn.
#[derive(Debug, Serialize)]
pub struct EventView {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Event type name.
    pub event_type: &'static str,
    /// Position within the turn.
    pub sequence_number: i64,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
    /// Event payload.
    pub payload: serde_json::Value,
}

impl From<&ProgressionEvent> for EventView {
    fn from(event: &ProgressionEvent) -> Self {
        let meta = event.metadata();
        Self {
            event_id: meta.event_id,
            event_type: event.event_type(),
            sequence_number: meta.sequence_number,
            occurred_at: meta.occurred_at,
            payload: event.to_payload(),
        }
    }
}

/// Everything the host needs after a turn.
#[derive(Debug, Serialize)]
pub struct TurnResponse {
    /// Stage directions to inject before generation. Only for protagonist
    /// turns.
    pub directions: Option<String>,
    /// Progression state to persist.
    pub progression_state: ProgressionState,
    /// Session state to persist.
    pub session_state: SessionState,
    /// `advanced`, `updated`, or `unchanged`.
    pub outcome: &'static str,
    /// Events raised by the turn, in order.
    pub events: Vec<EventView>,
}

/// Handles session start: returns fresh state for the first turn.
#[must_use]
pub fn handle_start_session(catalog: &PhaseCatalog) -> SessionStart {
    SessionStart {
        progression_state: ProgressionState::default(),
        session_state: SessionState::default(),
        catalog_version: catalog.version_hash().to_owned(),
    }
}

/// Handles one turn: rehydrates state, runs the engine, and synthesizes
/// directions for protagonist turns.
///
/// Never fails. A turn the engine cannot analyze comes back with the prior
/// state and outcome `unchanged`.
#[must_use]
pub fn handle_turn(
    command: &ProcessTurn,
    catalog: &PhaseCatalog,
    clock: &dyn Clock,
) -> TurnResponse {
    let prior = ProgressionState::rehydrate(command.progression_state.as_ref());
    let session = SessionState::rehydrate(command.session_state.as_ref());

    let mut engine = PhaseEngine::new(catalog, command.participants.clone());
    let outcome = engine.process_turn(&prior, &command.content, command.origin);

    let events = raise_events(&outcome, prior.current_phase, command.correlation_id, clock);
    let state = outcome.state().clone();

    let directions = if command.origin.is_protagonist() {
        engine.directions_for(&state)
    } else {
        None
    };

    let session = match outcome.applied() {
        Some(applied) => session.record(applied.next_phase),
        None => session,
    };

    let label = match &outcome {
        TurnOutcome::Advanced(_) => "advanced",
        TurnOutcome::Updated(_) => "updated",
        TurnOutcome::Unchanged { .. } => "unchanged",
    };

    TurnResponse {
        directions,
        progression_state: state,
        session_state: session,
        outcome: label,
        events: events.iter().map(EventView::from).collect(),
    }
}

fn raise_events(
    outcome: &TurnOutcome,
    from_phase: u32,
    correlation_id: Uuid,
    clock: &dyn Clock,
) -> Vec<ProgressionEvent> {
    let Some(applied) = outcome.applied() else {
        return Vec::new();
    };

    let mut kinds: Vec<ProgressionEventKind> = applied
        .new_discoveries
        .iter()
        .map(|discovery| {
            ProgressionEventKind::DiscoveryRecorded(DiscoveryRecorded {
                discovery: discovery.clone(),
            })
        })
        .collect();

    if let Some(entry) = &applied.journal_delta {
        kinds.push(ProgressionEventKind::PhaseCompleted(PhaseCompleted {
            entry: entry.clone(),
        }));
        kinds.push(ProgressionEventKind::PhaseAdvanced(PhaseAdvanced {
            from_phase,
            to_phase: applied.next_phase,
        }));
    }

    let occurred_at = clock.now();
    (1i64..)
        .zip(kinds)
        .map(|(sequence_number, kind)| ProgressionEvent {
            metadata: EventMetadata {
                // TODO: event_id uses Uuid::new_v4(), so replaying a turn
                // produces different ids. Derive it from correlation_id and
                // sequence_number (Uuid::new_v5) once hosts rely on ids.
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                correlation_id,
                sequence_number,
                occurred_at,
            },
            kind,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::domain::commands::TurnOrigin;
    use crate::domain::directions::Participants;
    use crate::domain::events::{
        DISCOVERY_RECORDED_EVENT_TYPE, PHASE_ADVANCED_EVENT_TYPE, PHASE_COMPLETED_EVENT_TYPE,
    };
    use questline_test_support::FixedClock;

    fn command(content: &str, origin: TurnOrigin, progression: serde_json::Value) -> ProcessTurn {
        ProcessTurn {
            correlation_id: Uuid::new_v4(),
            content: content.to_owned(),
            origin,
            participants: Participants {
                character: Some("Rhysand".to_owned()),
                user: Some("Feyre".to_owned()),
            },
            progression_state: Some(progression),
            session_state: Some(json!({ "furthestPhase": 1 })),
        }
    }

    #[test]
    fn test_handle_start_session_returns_fresh_state() {
        let catalog = PhaseCatalog::builtin().unwrap();

        let start = handle_start_session(&catalog);

        assert_eq!(start.progression_state, ProgressionState::default());
        assert_eq!(start.session_state.furthest_phase, 1);
        assert_eq!(start.catalog_version, catalog.version_hash());
    }

    #[test]
    fn test_protagonist_turn_receives_directions_with_names() {
        // Arrange
        let catalog = PhaseCatalog::builtin().unwrap();
        let clock = FixedClock::default();
        let cmd = command("Hello there.", TurnOrigin::Protagonist, json!({}));

        // Act
        let response = handle_turn(&cmd, &catalog, &clock);

        // Assert
        let directions = response.directions.unwrap();
        assert!(directions.starts_with("[Stage Direction: Rhysand is meeting Feyre at an inn"));
        assert_eq!(response.outcome, "updated");
        assert_eq!(response.progression_state.messages_in_phase, 1);
        assert!(response.events.is_empty());
    }

    #[test]
    fn test_narrator_turn_receives_no_directions() {
        let catalog = PhaseCatalog::builtin().unwrap();
        let clock = FixedClock::default();
        let cmd = command("The hearth glows.", TurnOrigin::Narrator, json!({}));

        let response = handle_turn(&cmd, &catalog, &clock);

        assert!(response.directions.is_none());
        assert_eq!(response.progression_state.messages_in_phase, 0);
    }

    #[test]
    fn test_advancing_turn_raises_ordered_events_and_updates_session() {
        // Arrange
        let catalog = PhaseCatalog::builtin().unwrap();
        let fixed_now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let clock = FixedClock(fixed_now);
        let cmd = command(
            "I found a rusted iron key. We should rest for the night.",
            TurnOrigin::Protagonist,
            json!({ "currentPhase": 1, "discoveries": [], "journalEntries": [], "messagesInPhase": 5 }),
        );

        // Act
        let response = handle_turn(&cmd, &catalog, &clock);

        // Assert
        assert_eq!(response.outcome, "advanced");
        assert_eq!(response.progression_state.current_phase, 2);
        assert_eq!(response.progression_state.messages_in_phase, 0);
        assert_eq!(response.session_state.furthest_phase, 2);

        let types: Vec<&str> = response.events.iter().map(|e| e.event_type).collect();
        assert_eq!(
            types,
            vec![
                DISCOVERY_RECORDED_EVENT_TYPE,
                PHASE_COMPLETED_EVENT_TYPE,
                PHASE_ADVANCED_EVENT_TYPE
            ]
        );
        let sequence: Vec<i64> = response.events.iter().map(|e| e.sequence_number).collect();
        assert_eq!(sequence, vec![1, 2, 3]);
        assert!(response.events.iter().all(|e| e.occurred_at == fixed_now));
        assert_eq!(
            response.events[1].payload["PhaseCompleted"]["entry"]["content"],
            "Phase 1: Planning: found rusted iron key"
        );
        assert_eq!(
            response.events[2].payload,
            json!({ "PhaseAdvanced": { "from_phase": 1, "to_phase": 2 } })
        );

        // Directions are for the phase just entered, at the start of its pacing.
        let directions = response.directions.unwrap();
        assert!(directions.contains("Rhysand and Feyre are traveling"));
    }

    #[test]
    fn test_unanalyzable_turn_returns_prior_state_unchanged() {
        // Arrange
        let catalog = PhaseCatalog::builtin().unwrap();
        let clock = FixedClock::default();
        let prior = json!({
            "currentPhase": 42,
            "discoveries": [],
            "journalEntries": [],
            "messagesInPhase": 3
        });
        let cmd = command("We reached the gates at dawn.", TurnOrigin::Protagonist, prior);

        // Act
        let response = handle_turn(&cmd, &catalog, &clock);

        // Assert
        assert_eq!(response.outcome, "unchanged");
        assert_eq!(response.progression_state.current_phase, 42);
        assert_eq!(response.progression_state.messages_in_phase, 3);
        assert!(response.progression_state.discoveries.is_empty());
        assert!(response.events.is_empty());
        assert!(response.directions.is_none());
        assert_eq!(response.session_state.furthest_phase, 1);
    }

    #[test]
    fn test_missing_state_starts_a_fresh_session() {
        let catalog = PhaseCatalog::builtin().unwrap();
        let clock = FixedClock::default();
        let mut cmd = command("Hello.", TurnOrigin::Narrator, json!(null));
        cmd.session_state = None;

        let response = handle_turn(&cmd, &catalog, &clock);

        assert_eq!(response.progression_state.current_phase, 1);
        assert_eq!(response.session_state.furthest_phase, 1);
    }
}
