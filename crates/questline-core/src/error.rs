//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A phase number fell outside the catalog range.
    #[error("phase not found: {0}")]
    PhaseNotFound(u32),

    /// A validation error in domain logic or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Turn content could not be analyzed.
    #[error("analysis error: {0}")]
    Analysis(String),

    /// An infrastructure/IO error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
