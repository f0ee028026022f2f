//! Content heuristics: cheap keyword scans over a single turn's text.
//!
//! Nothing here understands language. Discoveries come from a trigger-word
//! check followed by one regular expression per category, and transition
//! signals are plain case-insensitive substring containment.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use super::catalog::PhaseDefinition;

/// Category tag of a discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryKind {
    /// Something picked up or found.
    Item,
    /// Something met or fought.
    Creature,
    /// Somewhere entered or reached.
    Location,
    /// Reserved; no heuristic produces it.
    Revelation,
}

/// A heuristically extracted mention, tagged with the phase it was seen in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discovery {
    /// Category tag.
    #[serde(rename = "type")]
    pub kind: DiscoveryKind,
    /// Captured snippet, trimmed.
    pub content: String,
    /// Phase number current when the discovery was recorded.
    pub phase: u32,
}

/// One extraction rule: cheap trigger words, then the capturing pattern.
struct ExtractionRule {
    kind: DiscoveryKind,
    triggers: &'static [&'static str],
    pattern: &'static LazyLock<Regex>,
}

static ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:found|discovered|took|grabbed|obtained)\s+(?:a|an|the)\s+([a-zA-Z\s]{5,35})")
        .expect("valid regex")
});
static CREATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:encountered|fought|faced|saw)\s+(?:a|an|the)\s+([a-zA-Z\s]{5,35})")
        .expect("valid regex")
});
static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:entered|reached|arrived at)\s+(?:a|an|the)\s+([a-zA-Z\s]{5,35})")
        .expect("valid regex")
});

static RULES: [ExtractionRule; 3] = [
    ExtractionRule {
        kind: DiscoveryKind::Item,
        triggers: &["found", "discovered", "took"],
        pattern: &ITEM_RE,
    },
    ExtractionRule {
        kind: DiscoveryKind::Creature,
        triggers: &["encountered", "fought", "faced"],
        pattern: &CREATURE_RE,
    },
    ExtractionRule {
        kind: DiscoveryKind::Location,
        triggers: &["entered", "reached"],
        pattern: &LOCATION_RE,
    },
];

/// Extracts at most one discovery per category from `text`.
///
/// A category's pattern only runs when one of its trigger words appears,
/// so "saw a shade" alone yields nothing.
#[must_use]
pub fn extract_discoveries(text: &str, phase: u32) -> Vec<Discovery> {
    let lower = text.to_lowercase();

    RULES
        .iter()
        .filter(|rule| rule.triggers.iter().any(|t| lower.contains(t)))
        .filter_map(|rule| {
            let captured = rule.pattern.captures(text)?.get(1)?.as_str().trim();
            Some(Discovery {
                kind: rule.kind,
                content: captured.to_owned(),
                phase,
            })
        })
        .collect()
}

/// Whether `text` contains any of the phase's transition phrases.
///
/// A phase without phrases never signals.
#[must_use]
pub fn signals_transition(text: &str, phase: &PhaseDefinition) -> bool {
    if phase.transition_phrases.is_empty() {
        return false;
    }
    let lower = text.to_lowercase();
    phase
        .transition_phrases
        .iter()
        .any(|p| lower.contains(&p.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase_with(phrases: &[&str]) -> PhaseDefinition {
        PhaseDefinition {
            id: 1,
            name: "Phase 1: Camp".to_owned(),
            description: "Setting up camp".to_owned(),
            objectives: vec![],
            transition_phrases: phrases.iter().map(|p| (*p).to_owned()).collect(),
            directions: "{{char}} and {{user}} make camp.".to_owned(),
        }
    }

    #[test]
    fn test_extracts_item_from_found_phrase() {
        // Act
        let found = extract_discoveries("I found a rusted iron key near the wall", 1);

        // Assert
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, DiscoveryKind::Item);
        assert!(found[0].content.starts_with("rusted iron key"));
        assert_eq!(found[0].phase, 1);
    }

    #[test]
    fn test_capture_stops_at_punctuation_and_is_trimmed() {
        let found = extract_discoveries("We entered the sunken atrium . It was cold.", 3);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, DiscoveryKind::Location);
        assert_eq!(found[0].content, "sunken atrium");
        assert_eq!(found[0].phase, 3);
    }

    #[test]
    fn test_capture_is_bounded_to_thirty_five_characters() {
        let text = "She took the extraordinarily long and winding silver chain home";

        let found = extract_discoveries(text, 2);

        assert_eq!(found.len(), 1);
        assert!(found[0].content.len() <= 35);
        assert!(found[0].content.starts_with("extraordinarily long"));
    }

    #[test]
    fn test_short_capture_is_not_a_discovery() {
        assert!(extract_discoveries("He found a key.", 1).is_empty());
    }

    #[test]
    fn test_extraction_is_case_insensitive() {
        let found = extract_discoveries("THEY FOUGHT THE BONE WARDEN", 4);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, DiscoveryKind::Creature);
        assert_eq!(found[0].content, "BONE WARDEN");
    }

    #[test]
    fn test_one_discovery_per_category_in_item_creature_location_order() {
        let text = "We reached the flooded crypt, fought a pale serpent, and found \
                    a silver locket. Later we found a cracked mirror.";

        let found = extract_discoveries(text, 3);

        let kinds: Vec<DiscoveryKind> = found.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiscoveryKind::Item,
                DiscoveryKind::Creature,
                DiscoveryKind::Location
            ]
        );
        assert_eq!(found[0].content, "silver locket");
        assert_eq!(found[1].content, "pale serpent");
        assert_eq!(found[2].content, "flooded crypt");
    }

    #[test]
    fn test_pattern_without_trigger_word_is_skipped() {
        // "saw" and "arrived at" match the patterns but are not trigger words.
        let found = extract_discoveries("We saw a towering golem and arrived at the gate tower", 2);

        assert!(found.is_empty());
    }

    #[test]
    fn test_trigger_word_without_pattern_yields_nothing() {
        assert!(extract_discoveries("Nobody found anything worth keeping.", 1).is_empty());
    }

    #[test]
    fn test_revelation_serializes_lowercase() {
        let json = serde_json::to_value(DiscoveryKind::Revelation).unwrap();

        assert_eq!(json, "revelation");
    }

    #[test]
    fn test_discovery_serializes_kind_as_type() {
        let discovery = Discovery {
            kind: DiscoveryKind::Item,
            content: "rusted key".to_owned(),
            phase: 2,
        };

        let json = serde_json::to_value(&discovery).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "type": "item", "content": "rusted key", "phase": 2 })
        );
    }

    #[test]
    fn test_signals_on_case_insensitive_substring() {
        let phase = phase_with(&["rest for"]);

        assert!(signals_transition("We should REST FOR the night", &phase));
        assert!(!signals_transition("The forest was quiet.", &phase));
    }

    #[test]
    fn test_signal_is_not_word_bounded() {
        let phase = phase_with(&["dawn"]);

        assert!(signals_transition("The sky was dawning red.", &phase));
    }

    #[test]
    fn test_phase_without_phrases_never_signals() {
        let phase = phase_with(&[]);

        assert!(!signals_transition("anything at all, dawn, rest for", &phase));
    }

    #[test]
    fn test_no_phrase_present_does_not_signal() {
        let phase = phase_with(&["first light", "good night"]);

        assert!(!signals_transition("The fire crackled.", &phase));
    }
}
