//! Path management for SpreadSaver
//!
//! ## Path Resolution Order
//!
//! 1. `SPREADSAVER_HOME` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (`~/.config/spreadsaver` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::SpreadError;

/// Environment variable that overrides the settings directory
pub const HOME_ENV: &str = "SPREADSAVER_HOME";

/// Manages the paths used by SpreadSaver
#[derive(Debug, Clone)]
pub struct SpreadPaths {
    /// Base directory for SpreadSaver configuration
    base_dir: PathBuf,
}

impl SpreadPaths {
    /// Resolve the base directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and
    /// `SPREADSAVER_HOME` is not set.
    pub fn new() -> Result<Self, SpreadError> {
        let base_dir = match std::env::var_os(HOME_ENV) {
            Some(custom) => PathBuf::from(custom),
            None => ProjectDirs::from("", "", "spreadsaver")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    SpreadError::Config("Could not determine a configuration directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Create SpreadPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), SpreadError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| SpreadError::Io(format!("Failed to create config directory: {}", e)))
    }

    /// Check if settings have been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpreadPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpreadPaths::with_base_dir(temp_dir.path().join("nested").join("spreadsaver"));

        paths.ensure_directories().unwrap();

        assert!(paths.base_dir().exists());
    }
}
