//! Unified path management for lexrag configuration and logs.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/lexrag/            # Config directory
//! ├── config.toml              # Client configuration
//! └── logs/                    # Application logs
//!     └── lexrag.log.YYYY-MM-DD
//! ```
//!
//! The transcript and library are never written here; they live only for
//! the duration of a session.

use std::path::PathBuf;

const APP_DIR_NAME: &str = "lexrag";
const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_DIR_NAME: &str = "logs";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves lexrag's directories, optionally under an overridden base.
#[derive(Debug, Clone, Default)]
pub struct LexragPaths {
    base_dir: Option<PathBuf>,
}

impl LexragPaths {
    /// Creates a resolver. `None` uses `~/.config/lexrag`.
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// Returns the configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base_dir {
            return Ok(base.clone());
        }
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(home.join(".config").join(APP_DIR_NAME))
    }

    /// Returns the path of `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Returns the log directory.
    pub fn log_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(LOG_DIR_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_under_overridden_base() {
        let paths = LexragPaths::new(Some(PathBuf::from("/tmp/lexrag-test")));
        assert_eq!(
            paths.config_file().unwrap(),
            PathBuf::from("/tmp/lexrag-test/config.toml")
        );
        assert_eq!(paths.log_dir().unwrap(), PathBuf::from("/tmp/lexrag-test/logs"));
    }

    #[test]
    fn test_default_config_dir_ends_with_app_name() {
        if let Ok(dir) = LexragPaths::default().config_dir() {
            assert!(dir.ends_with(".config/lexrag"));
        }
    }
}
