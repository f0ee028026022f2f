//! Clock abstraction used to timestamp turn events.

use chrono::{DateTime, Utc};

/// Source of the current time for event metadata.
///
/// Handlers take `&dyn Clock` so tests can pin timestamps.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
