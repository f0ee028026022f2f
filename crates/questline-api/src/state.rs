//! Shared application state.

use std::sync::Arc;

use questline_core::clock::Clock;
use questline_narrative::domain::catalog::PhaseCatalog;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Phase catalog loaded at startup.
    pub catalog: Arc<PhaseCatalog>,
    /// Clock used to timestamp turn events.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(catalog: Arc<PhaseCatalog>, clock: Arc<dyn Clock>) -> Self {
        Self { catalog, clock }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("phases", &self.catalog.len())
            .field("catalog_version", &self.catalog.version_hash())
            .finish_non_exhaustive()
    }
}
