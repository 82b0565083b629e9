//! Configuration file loading
//!
//! Handles loading and saving configuration as TOML.

use crate::config::Config;
use crate::error::ConfigError;

use std::path::{Path, PathBuf};

/// Configuration file handler
pub struct ConfigFile;

impl ConfigFile {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Write configuration to a file, creating parent directories
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn save<P: AsRef<Path>>(config: &Config, path: P, force: bool) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.display().to_string()));
        }

        let contents = toml::to_string_pretty(config)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::WriteError {
                path: parent.display().to_string(),
                source,
            })?;
        }
        std::fs::write(path, contents).map_err(|source| ConfigError::WriteError {
            path: path.display().to_string(),
            source,
        })?;

        log::info!("Wrote config to {}", path.display());
        Ok(())
    }

    /// Load configuration from default locations
    pub fn load_default() -> Option<Config> {
        for path in Self::default_paths() {
            if path.exists() {
                match Self::load(&path) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path.display());
                        return Some(config);
                    }
                    Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
                }
            }
        }
        None
    }

    /// Per-user configuration path
    pub fn user_path() -> PathBuf {
        match dirs::config_dir() {
            Some(dir) => dir.join("tidewatch").join("config.toml"),
            None => PathBuf::from("tidewatch.toml"),
        }
    }

    /// Get default configuration file paths in search order
    pub fn default_paths() -> Vec<PathBuf> {
        vec![
            Self::user_path(),
            PathBuf::from("tidewatch.toml"),
            PathBuf::from(".tidewatch.toml"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_paths_not_empty() {
        let paths = ConfigFile::default_paths();
        assert!(!paths.is_empty());
        assert!(paths[0].ends_with("config.toml") || paths[0].ends_with("tidewatch.toml"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigFile::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.settings.expiry_ms = 2500;
        config.preferences.enable_email_notifications = true;

        ConfigFile::save(&config, &path, false).unwrap();
        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        ConfigFile::save(&Config::default(), &path, false).unwrap();
        assert!(matches!(
            ConfigFile::save(&Config::default(), &path, false),
            Err(ConfigError::AlreadyExists(_))
        ));
        assert!(ConfigFile::save(&Config::default(), &path, true).is_ok());
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[settings\nexpiry_ms = ").unwrap();
        assert!(matches!(
            ConfigFile::load(&path),
            Err(ConfigError::TomlError(_))
        ));
    }
}
