//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use questline_narrative::domain::catalog::PhaseCatalog;
use tracing::info;

use crate::error::AppError;

/// Runtime configuration for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind (`HOST`, default `0.0.0.0`).
    pub host: String,
    /// Port to bind (`PORT`, default `3000`).
    pub port: u16,
    /// Catalog YAML to load instead of the built-in one (`QUESTLINE_CATALOG`).
    pub catalog_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid `u16`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid `u16`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 3000,
        };
        let catalog_path = lookup("QUESTLINE_CATALOG")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            catalog_path,
        })
    }

    /// Socket address built from `host` and `port`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the combination does not parse.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }

    /// Loads the configured catalog, or the built-in one when no path is set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Server` if the file cannot be read and
    /// `AppError::Catalog` if it fails validation.
    pub fn load_catalog(&self) -> Result<PhaseCatalog, AppError> {
        let catalog = match &self.catalog_path {
            Some(path) => {
                info!(path = %path.display(), "loading phase catalog");
                let source = std::fs::read_to_string(path)?;
                PhaseCatalog::from_yaml(&source)?
            }
            None => PhaseCatalog::builtin()?,
        };
        info!(
            phases = catalog.len(),
            version = catalog.version_hash(),
            "phase catalog ready"
        );
        Ok(catalog)
    }
}
