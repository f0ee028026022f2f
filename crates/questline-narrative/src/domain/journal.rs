//! Journal generation: one summary line per completed phase.

use serde::{Deserialize, Serialize};

use super::catalog::PhaseDefinition;
use super::heuristics::{Discovery, DiscoveryKind};

/// Summary of a phase, written once when the phase is exited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// The completed phase.
    pub phase: u32,
    /// Synthesized summary.
    pub content: String,
}

/// Condenses the discoveries recorded under `phase` into one line.
///
/// Only the first discovery of each category is mentioned, in the order
/// location, creature, item. Falls back to the phase description when the
/// phase produced no discoveries.
#[must_use]
pub fn summarize(phase: &PhaseDefinition, discoveries: &[Discovery]) -> String {
    let first_of = |kind: DiscoveryKind| {
        discoveries
            .iter()
            .find(|d| d.phase == phase.id && d.kind == kind)
            .map(|d| d.content.as_str())
    };

    let parts: Vec<String> = [
        ("explored", DiscoveryKind::Location),
        ("encountered", DiscoveryKind::Creature),
        ("found", DiscoveryKind::Item),
    ]
    .into_iter()
    .filter_map(|(verb, kind)| first_of(kind).map(|content| format!("{verb} {content}")))
    .collect();

    if parts.is_empty() {
        format!("{}: {}", phase.name, phase.description)
    } else {
        format!("{}: {}", phase.name, parts.join(", "))
    }
}
