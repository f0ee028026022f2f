//! Domain events raised while processing a turn.

use questline_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

use super::heuristics::Discovery;
use super::journal::JournalEntry;

/// Event type for `DiscoveryRecorded`.
pub const DISCOVERY_RECORDED_EVENT_TYPE: &str = "stage.discovery_recorded";
/// Event type for `PhaseCompleted`.
pub const PHASE_COMPLETED_EVENT_TYPE: &str = "stage.phase_completed";
/// Event type for `PhaseAdvanced`.
pub const PHASE_ADVANCED_EVENT_TYPE: &str = "stage.phase_advanced";

/// Emitted for each discovery appended to the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryRecorded {
    /// The new discovery.
    pub discovery: Discovery,
}

/// Emitted when a phase is exited and its journal entry written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseCompleted {
    /// The journal entry for the exited phase.
    pub entry: JournalEntry,
}

/// Emitted when the current phase number moves forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseAdvanced {
    /// Phase that was exited.
    pub from_phase: u32,
    /// Phase that is now current.
    pub to_phase: u32,
}

/// Event payload variants for the progression engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProgressionEventKind {
    /// A discovery was recorded.
    DiscoveryRecorded(DiscoveryRecorded),
    /// A phase was completed.
    PhaseCompleted(PhaseCompleted),
    /// The story moved to the next phase.
    PhaseAdvanced(PhaseAdvanced),
}

impl ProgressionEventKind {
    /// Event type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::DiscoveryRecorded(_) => DISCOVERY_RECORDED_EVENT_TYPE,
            Self::PhaseCompleted(_) => PHASE_COMPLETED_EVENT_TYPE,
            Self::PhaseAdvanced(_) => PHASE_ADVANCED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the progression engine.
#[derive(Debug, Clone)]
pub struct ProgressionEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: ProgressionEventKind,
}

impl DomainEvent for ProgressionEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("ProgressionEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
