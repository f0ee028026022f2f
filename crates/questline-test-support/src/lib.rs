//! Shared test doubles for the Questline engine.

mod clock;

pub use clock::{FixedClock, fixed_now};
