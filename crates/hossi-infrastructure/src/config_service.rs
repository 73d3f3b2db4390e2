//! Configuration service implementation.
//!
//! Resolves the [`ClientConfig`] from, in order of precedence:
//! 1. `$HOSSI_API_BASE_URL` (base endpoint only)
//! 2. `config.toml` in the config directory
//! 3. Built-in defaults (`http://localhost:5000`)

use crate::paths::HossiPaths;
use hossi_core::config::{API_BASE_URL_ENV, ClientConfig};
use hossi_core::{HossiError, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Creates a service reading `~/.config/hossi/config.toml`.
    pub fn new() -> Result<Self> {
        let path = HossiPaths::config_file().map_err(|e| HossiError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a service reading a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading it on first access.
    ///
    /// A missing file yields defaults; a malformed file is an error.
    pub fn get_config(&self) -> Result<ClientConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let file_config = self.load_file()?;
        let loaded = apply_env_override(file_config, std::env::var(API_BASE_URL_ENV).ok());

        tracing::debug!("[ConfigService] API base URL: {}", loaded.api_base_url);

        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    /// Path of the configuration file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn load_file(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            tracing::debug!(
                "[ConfigService] No config at {}, using defaults",
                self.path.display()
            );
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            HossiError::config(format!(
                "Failed to parse configuration file at {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

/// Applies a base-URL override when present and non-blank.
pub fn apply_env_override(mut config: ClientConfig, base_url: Option<String>) -> ClientConfig {
    if let Some(url) = base_url
        && !url.trim().is_empty()
    {
        config.api_base_url = url.trim().to_string();
    }
    config
}
