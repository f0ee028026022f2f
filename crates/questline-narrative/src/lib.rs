//! Phase-progression engine: catalog, pacing gate, and turn state machine.
//!
//! Drives a multi-phase narrative: tracks the current story phase, gates
//! advancement on pacing, extracts discoveries from turn text, writes a
//! journal line per completed phase, and renders stage directions for the
//! next protagonist turn.

pub mod application;
pub mod domain;
