//! Path management for Rubik
//!
//! ## Path Resolution Order
//!
//! 1. `RUBIK_DATA_DIR` environment variable (if set)
//! 2. The platform config directory joined with `rubik`
//!    (`$XDG_CONFIG_HOME/rubik` or `~/.config/rubik` on Linux,
//!    `%APPDATA%\rubik` on Windows)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::RubikError;

/// Manages all paths used by Rubik
#[derive(Debug, Clone)]
pub struct RubikPaths {
    base_dir: PathBuf,
}

impl RubikPaths {
    /// Resolve the base directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, RubikError> {
        let base_dir = if let Ok(custom) = std::env::var("RUBIK_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create RubikPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/rubik/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the persisted session (token + user profile)
    pub fn session_file(&self) -> PathBuf {
        self.data_dir().join("session.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), RubikError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| RubikError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| RubikError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, RubikError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| RubikError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join("rubik"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RubikPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(
            paths.session_file(),
            temp_dir.path().join("data").join("session.json")
        );
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var("RUBIK_DATA_DIR", custom_path);
        let paths = RubikPaths::new().unwrap();
        env::remove_var("RUBIK_DATA_DIR");

        assert_eq!(paths.base_dir(), temp_dir.path());
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RubikPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
    }
}
