//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile};
use crate::error::ConfigError;

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file
    ///
    /// An explicit path must exist and parse. Without one the default
    /// locations are searched and defaults are kept if none is found.
    pub fn with_file(mut self, path: Option<&str>) -> Result<Self, ConfigError> {
        let file_config = match path {
            Some(path) => Some(ConfigFile::load(path)?),
            None => ConfigFile::load_default(),
        };

        if let Some(cfg) = file_config {
            self.config = cfg;
        }

        Ok(self)
    }

    /// Override the expiry delay
    pub fn with_expiry_ms(mut self, expiry_ms: Option<u64>) -> Self {
        if let Some(ms) = expiry_ms {
            self.config.settings.expiry_ms = ms;
        }
        self
    }

    /// Override the heartbeat period
    pub fn with_heartbeat_interval(mut self, secs: Option<u64>) -> Self {
        if let Some(s) = secs {
            self.config.settings.heartbeat_interval_secs = s;
        }
        self
    }

    /// Override the real-time updates preference
    pub fn with_real_time_updates(mut self, enabled: Option<bool>) -> Self {
        if let Some(e) = enabled {
            self.config.preferences.enable_real_time_updates = e;
        }
        self
    }

    /// Override the feed capacity
    pub fn with_max_notifications(mut self, max: Option<usize>) -> Self {
        if let Some(m) = max {
            self.config.settings.max_notifications = m;
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builder_defaults() {
        let config = ConfigBuilder::new().build();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConfigBuilder::new()
            .with_expiry_ms(Some(1000))
            .with_heartbeat_interval(Some(5))
            .with_real_time_updates(Some(false))
            .with_max_notifications(Some(10))
            .build();

        assert_eq!(config.settings.expiry_ms, 1000);
        assert_eq!(config.settings.heartbeat_interval_secs, 5);
        assert!(!config.preferences.enable_real_time_updates);
        assert_eq!(config.settings.max_notifications, 10);
    }

    #[test]
    fn test_none_keeps_file_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[settings]\nexpiry_ms = 750\n").unwrap();

        let config = ConfigBuilder::new()
            .with_file(path.to_str())
            .unwrap()
            .with_expiry_ms(None)
            .build();
        assert_eq!(config.settings.expiry_ms, 750);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = ConfigBuilder::new().with_file(Some("/nonexistent/tidewatch.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
