//! Progression state and the per-turn phase state machine.

use questline_core::error::DomainError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::catalog::PhaseCatalog;
use super::commands::TurnOrigin;
use super::heuristics::{Discovery, extract_discoveries, signals_transition};
use super::journal::{JournalEntry, summarize};
use super::pacing::PacingConfig;

/// Extraction is skipped once the discovery log holds this many entries.
pub const DISCOVERY_LOG_CAP: usize = 50;

/// Per-turn state the host persists verbatim between turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionState {
    /// Current 1-based phase number.
    pub current_phase: u32,
    /// Every discovery recorded so far, oldest first.
    pub discoveries: Vec<Discovery>,
    /// One entry per completed phase.
    pub journal_entries: Vec<JournalEntry>,
    /// Protagonist turns since the current phase began.
    pub messages_in_phase: u32,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self {
            current_phase: 1,
            discoveries: Vec::new(),
            journal_entries: Vec::new(),
            messages_in_phase: 0,
        }
    }
}

/// Result of applying one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnApplied {
    /// The state after the turn.
    pub state: ProgressionState,
    /// Phase number after the turn.
    pub next_phase: u32,
    /// Journal entry written if the phase was exited.
    pub journal_delta: Option<JournalEntry>,
    /// Discoveries appended this turn.
    pub new_discoveries: Vec<Discovery>,
    /// Whether the host should receive stage directions for this turn.
    pub directions_requested: bool,
}

impl TurnApplied {
    /// Whether the turn moved the story into the next phase.
    #[must_use]
    pub fn advanced(&self) -> bool {
        self.journal_delta.is_some()
    }
}

impl ProgressionState {
    /// Rebuilds state from a host-persisted value.
    ///
    /// Each field is read on its own; a missing or malformed field takes its
    /// default, so legacy states without `messagesInPhase` start at 0.
    #[must_use]
    pub fn rehydrate(value: Option<&Value>) -> Self {
        let defaults = Self::default();
        let Some(map) = as_object(value, "progression") else {
            return defaults;
        };

        Self {
            current_phase: field::<u32>(map, "currentPhase")
                .filter(|phase| *phase >= 1)
                .unwrap_or(defaults.current_phase),
            discoveries: field(map, "discoveries").unwrap_or(defaults.discoveries),
            journal_entries: field(map, "journalEntries").unwrap_or(defaults.journal_entries),
            messages_in_phase: field(map, "messagesInPhase")
                .unwrap_or(defaults.messages_in_phase),
        }
    }

    /// Applies one turn of content and returns the resulting state.
    ///
    /// `self` is never modified; on error the caller still holds the prior
    /// state intact.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PhaseNotFound` if the current phase is outside
    /// the catalog, and `DomainError::Analysis` if the turn counter
    /// overflows.
    pub fn apply_turn(
        &self,
        catalog: &PhaseCatalog,
        pacing: &PacingConfig,
        text: &str,
        origin: TurnOrigin,
    ) -> Result<TurnApplied, DomainError> {
        let definition = catalog
            .definition_at(self.current_phase)
            .ok_or(DomainError::PhaseNotFound(self.current_phase))?;
        let mut next = self.clone();

        let new_discoveries = if next.discoveries.len() < DISCOVERY_LOG_CAP {
            extract_discoveries(text, self.current_phase)
        } else {
            Vec::new()
        };
        next.discoveries.extend(new_discoveries.iter().cloned());

        if origin.is_protagonist() {
            next.messages_in_phase = next.messages_in_phase.checked_add(1).ok_or_else(|| {
                DomainError::Analysis("per-phase turn counter overflowed".to_owned())
            })?;
        }

        let has_next_phase = catalog
            .definition_at(self.current_phase.saturating_add(1))
            .is_some();
        let mut journal_delta = None;
        if !definition.is_terminal()
            && has_next_phase
            && pacing.is_eligible(next.messages_in_phase)
            && signals_transition(text, definition)
        {
            let entry = JournalEntry {
                phase: self.current_phase,
                content: summarize(definition, &next.discoveries),
            };
            next.journal_entries.push(entry.clone());
            next.current_phase += 1;
            next.messages_in_phase = 0;
            journal_delta = Some(entry);
        }

        debug!(
            phase = next.current_phase,
            counter = next.messages_in_phase,
            discoveries = new_discoveries.len(),
            "turn applied"
        );

        Ok(TurnApplied {
            next_phase: next.current_phase,
            state: next,
            journal_delta,
            new_discoveries,
            directions_requested: origin.is_protagonist(),
        })
    }
}

/// Coarser state persisted across the whole chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Furthest phase ever reached. Never decreases.
    pub furthest_phase: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { furthest_phase: 1 }
    }
}

impl SessionState {
    /// Rebuilds session state from a host-persisted value.
    #[must_use]
    pub fn rehydrate(value: Option<&Value>) -> Self {
        let defaults = Self::default();
        let Some(map) = as_object(value, "session") else {
            return defaults;
        };

        Self {
            furthest_phase: field::<u32>(map, "furthestPhase")
                .filter(|phase| *phase >= 1)
                .unwrap_or(defaults.furthest_phase),
        }
    }

    /// Returns the state after reaching `phase`.
    #[must_use]
    pub fn record(self, phase: u32) -> Self {
        Self {
            furthest_phase: self.furthest_phase.max(phase),
        }
    }
}

fn as_object<'a>(value: Option<&'a Value>, label: &str) -> Option<&'a Map<String, Value>> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map),
        Some(_) => {
            debug!(state = label, "persisted state is not an object, using defaults");
            None
        }
    }
}

fn field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<T> {
    let raw = map.get(key)?;
    match serde_json::from_value(raw.clone()) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(field = key, error = %e, "discarding malformed state field");
            None
        }
    }
}
