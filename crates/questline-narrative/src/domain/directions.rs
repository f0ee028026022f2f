//! Stage-direction synthesis for protagonist turns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::catalog::PhaseCatalog;
use super::pacing::{PacingConfig, PacingStage};

const CHAR_PLACEHOLDER: &str = "{{char}}";
const USER_PLACEHOLDER: &str = "{{user}}";

/// Display names substituted into direction templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Participants {
    /// The counterpart (narrated character). Defaults to "Character".
    #[serde(default)]
    pub character: Option<String>,
    /// The protagonist. Defaults to "User".
    #[serde(default)]
    pub user: Option<String>,
}

impl Participants {
    /// Name used for `{{char}}`.
    #[must_use]
    pub fn character_name(&self) -> &str {
        non_blank(self.character.as_deref()).unwrap_or("Character")
    }

    /// Name used for `{{user}}`.
    #[must_use]
    pub fn user_name(&self) -> &str {
        non_blank(self.user.as_deref()).unwrap_or("User")
    }
}

fn non_blank(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|n| !n.is_empty())
}

/// Renders and memoizes direction text for one session's participants.
///
/// Entries are keyed by phase and pacing stage, so crossing a stage
/// boundary inside a phase produces fresh text.
#[derive(Debug)]
pub struct DirectionSynthesizer {
    participants: Participants,
    cache: HashMap<(u32, PacingStage), String>,
}

impl DirectionSynthesizer {
    /// Creates a synthesizer for the given participants.
    #[must_use]
    pub fn new(participants: Participants) -> Self {
        Self {
            participants,
            cache: HashMap::new(),
        }
    }

    /// Direction text for `phase` at the given turn counter, or `None` when
    /// the phase is outside the catalog.
    pub fn directions_for(
        &mut self,
        catalog: &PhaseCatalog,
        pacing: &PacingConfig,
        phase: u32,
        counter: u32,
    ) -> Option<String> {
        let stage = pacing.stage(counter);
        if let Some(cached) = self.cache.get(&(phase, stage)) {
            return Some(cached.clone());
        }

        let definition = catalog.definition_at(phase)?;
        let body = definition
            .directions
            .replace(CHAR_PLACEHOLDER, self.participants.character_name())
            .replace(USER_PLACEHOLDER, self.participants.user_name());
        let rendered = format!(
            "[Stage Direction: {} CURRENT PACING: {}]",
            body.trim(),
            stage.directive()
        );

        self.cache.insert((phase, stage), rendered.clone());
        Some(rendered)
    }

    /// Number of memoized renderings.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
