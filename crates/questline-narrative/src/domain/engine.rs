//! Fail-closed driver around the phase state machine.

use tracing::{info, warn};

use super::catalog::PhaseCatalog;
use super::commands::TurnOrigin;
use super::directions::{DirectionSynthesizer, Participants};
use super::pacing::PacingConfig;
use super::progression::{ProgressionState, TurnApplied};

/// What a turn did to the progression state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The turn exited the current phase.
    Advanced(TurnApplied),
    /// The turn was applied without a phase change.
    Updated(TurnApplied),
    /// The turn could not be analyzed; the prior state is returned as-is.
    Unchanged {
        /// The state exactly as it was before the turn.
        state: ProgressionState,
        /// Why the turn was skipped.
        reason: String,
    },
}

impl TurnOutcome {
    /// State to persist after this turn.
    #[must_use]
    pub fn state(&self) -> &ProgressionState {
        match self {
            Self::Advanced(applied) | Self::Updated(applied) => &applied.state,
            Self::Unchanged { state, .. } => state,
        }
    }

    /// Details of the applied turn, if it was applied.
    #[must_use]
    pub fn applied(&self) -> Option<&TurnApplied> {
        match self {
            Self::Advanced(applied) | Self::Updated(applied) => Some(applied),
            Self::Unchanged { .. } => None,
        }
    }
}

/// Runs turns for one session: catalog lookup, state machine, directions.
#[derive(Debug)]
pub struct PhaseEngine<'a> {
    catalog: &'a PhaseCatalog,
    pacing: PacingConfig,
    directions: DirectionSynthesizer,
}

impl<'a> PhaseEngine<'a> {
    /// Creates an engine using the catalog's own pacing thresholds.
    #[must_use]
    pub fn new(catalog: &'a PhaseCatalog, participants: Participants) -> Self {
        Self {
            catalog,
            pacing: catalog.pacing(),
            directions: DirectionSynthesizer::new(participants),
        }
    }

    /// Pacing thresholds in effect.
    #[must_use]
    pub fn pacing(&self) -> &PacingConfig {
        &self.pacing
    }

    /// Applies one turn. Never fails: any analysis error yields
    /// `TurnOutcome::Unchanged` carrying the prior state.
    pub fn process_turn(
        &self,
        state: &ProgressionState,
        text: &str,
        origin: TurnOrigin,
    ) -> TurnOutcome {
        match state.apply_turn(self.catalog, &self.pacing, text, origin) {
            Ok(applied) if applied.advanced() => {
                info!(
                    from = state.current_phase,
                    to = applied.next_phase,
                    "phase advanced"
                );
                TurnOutcome::Advanced(applied)
            }
            Ok(applied) => TurnOutcome::Updated(applied),
            Err(e) => {
                warn!(phase = state.current_phase, error = %e, "turn skipped, keeping prior state");
                TurnOutcome::Unchanged {
                    state: state.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Stage directions for the state's current phase and counter.
    pub fn directions_for(&mut self, state: &ProgressionState) -> Option<String> {
        self.directions.directions_for(
            self.catalog,
            &self.pacing,
            state.current_phase,
            state.messages_in_phase,
        )
    }
}
