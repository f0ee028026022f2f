//! Domain model for the phase-progression engine.

pub mod catalog;
pub mod commands;
pub mod directions;
pub mod engine;
pub mod events;
pub mod heuristics;
pub mod journal;
pub mod pacing;
pub mod progression;
