//! Configuration service implementation.
//!
//! Loads `ClientConfig` from `config.toml` (by default
//! `~/.config/lexrag/config.toml`) and applies environment overrides.

use crate::paths::LexragPaths;
use lexrag_core::config::ClientConfig;
use lexrag_core::{LexError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Overrides `backend_url`.
pub const ENV_BACKEND_URL: &str = "LEXRAG_BACKEND_URL";
/// Overrides `max_upload_mb`.
pub const ENV_MAX_UPLOAD_MB: &str = "LEXRAG_MAX_UPLOAD_MB";

/// Configuration service that loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the default config location.
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading an explicit file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// A missing file yields defaults; a malformed one is an error.
    pub fn get_config(&self) -> Result<ClientConfig> {
        if let Ok(read_lock) = self.config.read()
            && let Some(cached) = read_lock.as_ref()
        {
            return Ok(cached.clone());
        }

        let path = self.resolve_path()?;
        let loaded = apply_env_overrides(load_file(&path)?, |key| std::env::var(key).ok())?;

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn resolve_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => LexragPaths::default()
                .config_file()
                .map_err(|e| LexError::config(e.to_string())),
        }
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

fn load_file(path: &Path) -> Result<ClientConfig> {
    if !path.exists() {
        tracing::debug!(
            "[ConfigService] No config at {}, using defaults",
            path.display()
        );
        return Ok(ClientConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: ClientConfig = toml::from_str(&content)?;
    tracing::info!("[ConfigService] Loaded config from {}", path.display());
    Ok(config)
}

/// Applies `LEXRAG_*` overrides on top of the file contents.
pub fn apply_env_overrides<F>(mut config: ClientConfig, lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
        config.backend_url = url.trim().to_string();
    }

    if let Some(raw) = lookup(ENV_MAX_UPLOAD_MB) {
        config.max_upload_mb = raw.trim().parse().map_err(|_| {
            LexError::config(format!("{ENV_MAX_UPLOAD_MB} must be a whole number, got '{raw}'"))
        })?;
    }

    Ok(config)
}
