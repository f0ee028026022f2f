//! Pacing gate: buckets the per-phase protagonist turn counter into pacing
//! stages and decides when transition phrases are consulted at all.

use questline_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Thresholds partitioning the per-phase turn counter.
///
/// Loaded from the `pacing:` section of a catalog document; every field
/// falls back to its default when omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Counter values below this are `Early`.
    pub early_below: u32,
    /// Counter values below this are `Building`.
    pub building_below: u32,
    /// Counter values below this are `Mid`.
    pub mid_below: u32,
    /// Counter values below this are `Ready`; at or above it, `Extended`.
    pub max_messages: u32,
    /// Minimum counter value before transition phrases are evaluated.
    pub min_dwell: u32,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            early_below: 3,
            building_below: 6,
            mid_below: 10,
            max_messages: 20,
            min_dwell: 6,
        }
    }
}

impl PacingConfig {
    /// Checks that the stage thresholds are strictly increasing and the dwell
    /// floor is at least one turn.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` describing the first violated rule.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.min_dwell == 0 {
            return Err(DomainError::Validation(
                "pacing.min_dwell must be at least 1".to_owned(),
            ));
        }
        let ordered = self.early_below < self.building_below
            && self.building_below < self.mid_below
            && self.mid_below < self.max_messages;
        if !ordered {
            return Err(DomainError::Validation(format!(
                "pacing thresholds must be strictly increasing \
                 (early_below={}, building_below={}, mid_below={}, max_messages={})",
                self.early_below, self.building_below, self.mid_below, self.max_messages
            )));
        }
        Ok(())
    }

    /// Returns the pacing stage for a per-phase turn counter.
    #[must_use]
    pub fn stage(&self, counter: u32) -> PacingStage {
        if counter < self.early_below {
            PacingStage::Early
        } else if counter < self.building_below {
            PacingStage::Building
        } else if counter < self.mid_below {
            PacingStage::Mid
        } else if counter < self.max_messages {
            PacingStage::Ready
        } else {
            PacingStage::Extended
        }
    }

    /// Whether transition phrases are consulted at this counter value.
    ///
    /// Stays open past `max_messages`; the ceiling only changes the
    /// directive text, not the matching rule.
    #[must_use]
    pub fn is_eligible(&self, counter: u32) -> bool {
        counter >= self.min_dwell
    }
}

/// Named bucket of the per-phase turn counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingStage {
    /// Opening turns of a phase.
    Early,
    /// Still developing the scene.
    Building,
    /// Closure may be considered but not forced.
    Mid,
    /// Transition phrases are usable and encouraged.
    Ready,
    /// Past the ceiling; wrap up now.
    Extended,
}

impl PacingStage {
    /// Guidance text injected into stage directions for this stage.
    #[must_use]
    pub fn directive(self) -> &'static str {
        match self {
            Self::Early => {
                "This phase has just begun. Focus on a single topic or moment and \
                 let it develop slowly. Do not move toward the end of the phase."
            }
            Self::Building => {
                "The scene is still developing. Add detail and friction, but do not \
                 begin wrapping up this phase yet."
            }
            Self::Mid => {
                "The scene has had room to breathe. You may start steering toward \
                 its natural conclusion, but do not force it."
            }
            Self::Ready => {
                "This phase has run its course. Look for a natural moment to bring \
                 it to a close and move the story onward."
            }
            Self::Extended => {
                "This phase has gone on long enough. Wrap it up now and move the \
                 story to its next stage in this response."
            }
        }
    }

    /// Stable lowercase name of the stage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Early => "early",
            Self::Building => "building",
            Self::Mid => "mid",
            Self::Ready => "ready",
            Self::Extended => "extended",
        }
    }
}
