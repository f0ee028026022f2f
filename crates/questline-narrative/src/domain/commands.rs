//! Commands for the phase-progression engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::directions::Participants;

/// Which side of the conversation produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOrigin {
    /// The protagonist (the human side). Advances the pacing counter and
    /// receives stage directions.
    Protagonist,
    /// The narrator (the generated side).
    Narrator,
}

impl TurnOrigin {
    /// Whether the turn came from the protagonist.
    #[must_use]
    pub fn is_protagonist(self) -> bool {
        matches!(self, Self::Protagonist)
    }
}

/// Command to run one turn of content through the engine.
///
/// The two state values are whatever the host persisted after the previous
/// turn; either may be absent or partially filled.
#[derive(Debug, Clone)]
pub struct ProcessTurn {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Raw turn text.
    pub content: String,
    /// Side that produced the turn.
    pub origin: TurnOrigin,
    /// Names for direction placeholders.
    pub participants: Participants,
    /// Previously persisted progression state.
    pub progression_state: Option<serde_json::Value>,
    /// Previously persisted session state.
    pub session_state: Option<serde_json::Value>,
}
