//! Path management for Hossi client files.
//!
//! ```text
//! ~/.config/hossi/          # Config directory ($HOSSI_CONFIG_DIR overrides)
//! ├── config.toml           # Client configuration
//! └── session.toml          # Durable session slots (token, user)
//! ```

use std::path::PathBuf;

/// Environment variable that relocates the config directory.
pub const CONFIG_DIR_ENV: &str = "HOSSI_CONFIG_DIR";

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

/// Resolves where the client keeps its files.
pub struct HossiPaths;

impl HossiPaths {
    /// Returns the config directory.
    ///
    /// `$HOSSI_CONFIG_DIR` wins when set and non-empty, otherwise
    /// `~/.config/hossi`.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
            && !dir.trim().is_empty()
        {
            return Ok(PathBuf::from(dir));
        }

        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(home.join(".config").join("hossi"))
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the durable session file.
    ///
    /// # Security Note
    ///
    /// The file holds a bearer token in plaintext and is written with mode
    /// 600 on Unix.
    pub fn session_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("session.toml"))
    }
}
