//! User-configurable alert preferences
//!
//! Holds the rule set the evaluators consult: enable flags, per-channel
//! threshold bands and the data quality cutoff.

use crate::domain::{Percentage, ThresholdBand};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

/// Channels the dashboard ships thresholds for
pub const DEFAULT_CHANNELS: [&str; 6] = [
    "temperature",
    "salinity",
    "pressure",
    "oxygen",
    "chlorophyll",
    "turbidity",
];

/// Complete preference set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceSet {
    /// Emit periodic data update notifications
    pub enable_real_time_updates: bool,
    /// Evaluate readings against threshold bands
    pub enable_threshold_alerts: bool,
    /// Evaluate data quality scores
    pub enable_data_quality_warnings: bool,
    /// Recorded intent only; nothing is delivered by email
    pub enable_email_notifications: bool,
    /// Quality scores strictly below this raise a warning
    pub data_quality_threshold: Percentage,
    /// Bands keyed by channel
    pub thresholds: BTreeMap<String, ThresholdBand>,
}

impl Default for PreferenceSet {
    fn default() -> Self {
        let thresholds = [
            ("temperature", ThresholdBand::new(15.0, 25.0, 10.0, 30.0)),
            ("salinity", ThresholdBand::new(30.0, 40.0, 25.0, 45.0)),
            ("pressure", ThresholdBand::new(1000.0, 1020.0, 990.0, 1030.0)),
            ("oxygen", ThresholdBand::new(6.0, 12.0, 4.0, 15.0)),
            ("chlorophyll", ThresholdBand::new(0.1, 1.0, 0.05, 2.0)),
            ("turbidity", ThresholdBand::new(0.0, 10.0, 0.0, 20.0)),
        ]
        .into_iter()
        .map(|(name, band)| (name.to_string(), band))
        .collect();

        Self {
            enable_real_time_updates: true,
            enable_threshold_alerts: true,
            enable_data_quality_warnings: true,
            enable_email_notifications: false,
            data_quality_threshold: Percentage::saturating(70),
            thresholds,
        }
    }
}

impl PreferenceSet {
    /// Band for a channel, if configured
    pub fn threshold(&self, attribute_id: &str) -> Option<&ThresholdBand> {
        self.thresholds.get(attribute_id)
    }

    /// Channels whose bands are not properly nested
    pub fn ill_formed_thresholds(&self) -> Vec<&str> {
        self.thresholds
            .iter()
            .filter(|(_, band)| !band.is_well_formed())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Apply a partial update in place
    ///
    /// Top-level fields present in the update overwrite the current ones.
    /// Threshold updates are merged per channel: only the bounds named in a
    /// `ThresholdUpdate` change. A channel without an existing band is added
    /// only when the update names all four bounds.
    pub fn apply(&mut self, update: PreferenceUpdate) {
        if let Some(v) = update.enable_real_time_updates {
            self.enable_real_time_updates = v;
        }
        if let Some(v) = update.enable_threshold_alerts {
            self.enable_threshold_alerts = v;
        }
        if let Some(v) = update.enable_data_quality_warnings {
            self.enable_data_quality_warnings = v;
        }
        if let Some(v) = update.enable_email_notifications {
            self.enable_email_notifications = v;
        }
        if let Some(v) = update.data_quality_threshold {
            self.data_quality_threshold = Percentage::saturating(v);
        }

        for (name, patch) in update.thresholds {
            match self.thresholds.get_mut(&name) {
                Some(band) => patch.merge_into(band),
                None => match patch.to_band() {
                    Some(band) => {
                        self.thresholds.insert(name, band);
                    }
                    None => log::warn!(
                        "Ignoring partial threshold update for unconfigured attribute '{}'",
                        name
                    ),
                },
            }
        }
    }
}

/// Partial update of the critical bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundsUpdate {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Partial update of one channel's band
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdUpdate {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub critical: Option<BoundsUpdate>,
}

impl ThresholdUpdate {
    /// Update only the warning band
    pub fn warning(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            critical: None,
        }
    }

    /// Update only the critical band
    pub fn critical(min: f64, max: f64) -> Self {
        Self {
            min: None,
            max: None,
            critical: Some(BoundsUpdate {
                min: Some(min),
                max: Some(max),
            }),
        }
    }

    /// Replace every bound
    pub fn full(band: ThresholdBand) -> Self {
        Self {
            min: Some(band.min),
            max: Some(band.max),
            critical: Some(BoundsUpdate {
                min: Some(band.critical.min),
                max: Some(band.critical.max),
            }),
        }
    }

    fn merge_into(&self, band: &mut ThresholdBand) {
        if let Some(min) = self.min {
            band.min = min;
        }
        if let Some(max) = self.max {
            band.max = max;
        }
        if let Some(critical) = self.critical {
            if let Some(min) = critical.min {
                band.critical.min = min;
            }
            if let Some(max) = critical.max {
                band.critical.max = max;
            }
        }
    }

    fn to_band(self) -> Option<ThresholdBand> {
        let critical = self.critical?;
        Some(ThresholdBand::new(
            self.min?,
            self.max?,
            critical.min?,
            critical.max?,
        ))
    }
}

/// Partial preference update; absent fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceUpdate {
    pub enable_real_time_updates: Option<bool>,
    pub enable_threshold_alerts: Option<bool>,
    pub enable_data_quality_warnings: Option<bool>,
    pub enable_email_notifications: Option<bool>,
    /// Values above 100 are clamped
    pub data_quality_threshold: Option<u8>,
    pub thresholds: BTreeMap<String, ThresholdUpdate>,
}

impl PreferenceUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn real_time_updates(mut self, enabled: bool) -> Self {
        self.enable_real_time_updates = Some(enabled);
        self
    }

    pub fn threshold_alerts(mut self, enabled: bool) -> Self {
        self.enable_threshold_alerts = Some(enabled);
        self
    }

    pub fn data_quality_warnings(mut self, enabled: bool) -> Self {
        self.enable_data_quality_warnings = Some(enabled);
        self
    }

    pub fn email_notifications(mut self, enabled: bool) -> Self {
        self.enable_email_notifications = Some(enabled);
        self
    }

    pub fn data_quality_threshold(mut self, percent: u8) -> Self {
        self.data_quality_threshold = Some(percent);
        self
    }

    pub fn threshold(mut self, attribute_id: impl Into<String>, update: ThresholdUpdate) -> Self {
        self.thresholds.insert(attribute_id.into(), update);
        self
    }
}

/// Owner of the live preference set
#[derive(Debug, Default)]
pub struct PreferenceStore {
    current: RwLock<PreferenceSet>,
}

impl PreferenceStore {
    pub fn new(initial: PreferenceSet) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    /// Snapshot of the current preferences
    pub fn get(&self) -> PreferenceSet {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Merge a partial update and return the resulting preferences
    pub fn update(&self, update: PreferenceUpdate) -> PreferenceSet {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        guard.apply(update);
        log::debug!(
            "Preferences updated: realtime={}, thresholds={}, quality={}, cutoff={}",
            guard.enable_real_time_updates,
            guard.enable_threshold_alerts,
            guard.enable_data_quality_warnings,
            guard.data_quality_threshold
        );
        guard.clone()
    }
}
