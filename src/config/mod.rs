//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::alerts::{PreferenceSet, StoreConfig, DEFAULT_CHANNELS};
use crate::error::ConfigError;
use crate::services::FeedConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feed engine settings
    pub settings: FeedSettings,
    /// Initial alert preferences
    pub preferences: PreferenceSet,
}

/// Feed engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    /// Maximum notifications kept in the feed
    pub max_notifications: usize,
    /// Delay before non-critical notifications are removed, in milliseconds
    pub expiry_ms: u64,
    /// Real-time update heartbeat period in seconds
    pub heartbeat_interval_secs: u64,
    /// Channels the heartbeat cycles through
    pub heartbeat_channels: Vec<String>,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            max_notifications: 50,
            expiry_ms: 5000,
            heartbeat_interval_secs: 30,
            heartbeat_channels: DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Config {
    /// Feed configuration derived from the settings table
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            store: StoreConfig {
                capacity: self.settings.max_notifications,
                expiry: Duration::from_millis(self.settings.expiry_ms),
            },
            heartbeat_interval: Duration::from_secs(self.settings.heartbeat_interval_secs),
            heartbeat_channels: self.settings.heartbeat_channels.clone(),
        }
    }

    /// Check settings that would make the feed unusable
    ///
    /// Returns warnings for ill-formed threshold bands, which are accepted
    /// as configured.
    pub fn validate(&self) -> Result<Vec<String>, ConfigError> {
        if self.settings.max_notifications == 0 {
            return Err(ConfigError::InvalidValue {
                key: "settings.max_notifications".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.settings.heartbeat_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "settings.heartbeat_interval_secs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let warnings = self
            .preferences
            .ill_formed_thresholds()
            .into_iter()
            .map(|name| {
                format!(
                    "thresholds.{}: bands are not nested (expected critical.min <= min <= max <= critical.max)",
                    name
                )
            })
            .collect();
        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ThresholdBand;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.settings.max_notifications, 50);
        assert_eq!(config.settings.expiry_ms, 5000);
        assert_eq!(config.settings.heartbeat_interval_secs, 30);
        assert_eq!(config.settings.heartbeat_channels.len(), 6);
        assert!(config.preferences.enable_real_time_updates);
    }

    #[test]
    fn test_feed_config_conversion() {
        let feed = Config::default().feed_config();
        assert_eq!(feed.store.capacity, 50);
        assert_eq!(feed.store.expiry, Duration::from_millis(5000));
        assert_eq!(feed.heartbeat_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_validate_defaults_clean() {
        assert!(Config::default().validate().unwrap().is_empty());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.settings.heartbeat_interval_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_validate_warns_on_inverted_band() {
        let mut config = Config::default();
        config
            .preferences
            .thresholds
            .insert("oxygen".to_string(), ThresholdBand::new(12.0, 6.0, 4.0, 15.0));
        let warnings = config.validate().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("oxygen"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let text = r#"
            [settings]
            expiry_ms = 1000

            [preferences]
            enable_real_time_updates = false
            data_quality_threshold = 80
        "#;
        let config: Config = toml::from_str(text).unwrap();
        assert_eq!(config.settings.expiry_ms, 1000);
        assert_eq!(config.settings.max_notifications, 50);
        assert!(!config.preferences.enable_real_time_updates);
        assert_eq!(config.preferences.data_quality_threshold.value(), 80);
        // Bands fall back to the defaults when the table is absent
        assert_eq!(config.preferences.thresholds.len(), 6);
    }

    #[test]
    fn test_out_of_range_quality_threshold_rejected() {
        let text = "[preferences]\ndata_quality_threshold = 140\n";
        assert!(toml::from_str::<Config>(text).is_err());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
