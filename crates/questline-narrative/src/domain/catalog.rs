//! Phase catalog: the static, ordered table of story phases.

use questline_core::error::DomainError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::pacing::PacingConfig;

/// YAML source of the built-in catalog.
const BUILTIN_CATALOG: &str = include_str!("phases.yaml");

/// One story phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDefinition {
    /// 1-based phase number.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// One-line description, used as the journal fallback.
    pub description: String,
    /// Objective labels.
    #[serde(default)]
    pub objectives: Vec<String>,
    /// Phrases whose presence signals readiness to leave this phase.
    /// Empty only for the terminal phase.
    #[serde(default)]
    pub transition_phrases: Vec<String>,
    /// Direction template with `{{char}}` and `{{user}}` placeholders.
    pub directions: String,
}

impl PhaseDefinition {
    /// Whether this phase can never be exited.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.transition_phrases.is_empty()
    }
}

/// On-disk shape of a catalog document.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    pacing: PacingConfig,
    phases: Vec<PhaseDefinition>,
}

/// Validated, immutable phase table.
#[derive(Debug, Clone)]
pub struct PhaseCatalog {
    phases: Vec<PhaseDefinition>,
    pacing: PacingConfig,
    version_hash: String,
}

impl PhaseCatalog {
    /// Loads the built-in eight-phase catalog.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the embedded document is invalid.
    pub fn builtin() -> Result<Self, DomainError> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    /// Parses and validates a catalog document.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the YAML cannot be parsed, the
    /// pacing thresholds are inconsistent, or the phase table breaks the
    /// contiguity/terminal-phase rules.
    pub fn from_yaml(source: &str) -> Result<Self, DomainError> {
        let document: CatalogDocument = serde_yaml::from_str(source)
            .map_err(|e| DomainError::Validation(format!("catalog parse failed: {e}")))?;

        document.pacing.validate()?;
        validate_phases(&document.phases)?;

        let version_hash = format!("{:x}", Sha256::digest(source.as_bytes()));

        Ok(Self {
            phases: document.phases,
            pacing: document.pacing,
            version_hash,
        })
    }

    /// Looks up a phase by its 1-based number. Out-of-range numbers yield
    /// `None`.
    #[must_use]
    pub fn definition_at(&self, phase: u32) -> Option<&PhaseDefinition> {
        let index = usize::try_from(phase).ok()?.checked_sub(1)?;
        self.phases.get(index)
    }

    /// Number of phases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Always false for a validated catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// All phases in order.
    #[must_use]
    pub fn phases(&self) -> &[PhaseDefinition] {
        &self.phases
    }

    /// The last phase, which is never exited.
    #[must_use]
    pub fn terminal_phase(&self) -> Option<&PhaseDefinition> {
        self.phases.last()
    }

    /// Pacing thresholds declared alongside the phases.
    #[must_use]
    pub fn pacing(&self) -> PacingConfig {
        self.pacing
    }

    /// Hex SHA-256 of the document this catalog was loaded from.
    #[must_use]
    pub fn version_hash(&self) -> &str {
        &self.version_hash
    }
}

fn validate_phases(phases: &[PhaseDefinition]) -> Result<(), DomainError> {
    let Some(last) = phases.last() else {
        return Err(DomainError::Validation(
            "catalog must declare at least one phase".to_owned(),
        ));
    };

    for (position, phase) in (1u32..).zip(phases) {
        if phase.id != position {
            return Err(DomainError::Validation(format!(
                "phase ids must be contiguous from 1: found id {} at position {position}",
                phase.id
            )));
        }
        if phase
            .transition_phrases
            .iter()
            .any(|p| p.trim().is_empty())
        {
            return Err(DomainError::Validation(format!(
                "phase {} has a blank transition phrase",
                phase.id
            )));
        }
        if phase.is_terminal() && phase.id != last.id {
            return Err(DomainError::Validation(format!(
                "phase {} has no transition phrases but is not the last phase",
                phase.id
            )));
        }
    }

    if !last.is_terminal() {
        return Err(DomainError::Validation(format!(
            "the last phase ({}) must not declare transition phrases",
            last.id
        )));
    }

    Ok(())
}
