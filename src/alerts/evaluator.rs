//! Rule evaluators
//!
//! Decide whether a reading warrants a notification. Evaluators are pure:
//! they return the notification to create and leave storing it to the feed.

use super::preferences::PreferenceSet;
use crate::domain::{
    AlertDetail, Category, NewNotification, NotificationKind, Reading, ThresholdBand,
};
use std::fmt;

/// Rule evaluated against a reading
pub trait Evaluator: Send + Sync {
    /// Notification to raise for this reading, if any
    fn evaluate(&self, preferences: &PreferenceSet, reading: &Reading) -> Option<NewNotification>;

    /// Evaluator name for identification
    fn name(&self) -> &str;
}

/// Outcome of checking a value against a band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BandLevel {
    /// At or beyond the warning bounds, inside the critical band
    Warning,
    /// At or beyond the critical bounds
    Critical,
}

impl fmt::Display for BandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Classify a value against a band; critical wins over warning
pub fn classify(band: &ThresholdBand, value: f64) -> Option<BandLevel> {
    if band.critical.is_breached_by(value) {
        Some(BandLevel::Critical)
    } else if band.warning().is_breached_by(value) {
        Some(BandLevel::Warning)
    } else {
        None
    }
}

/// Raises warning/critical alerts when a value leaves its bands
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdEvaluator;

impl Evaluator for ThresholdEvaluator {
    fn evaluate(&self, preferences: &PreferenceSet, reading: &Reading) -> Option<NewNotification> {
        if !preferences.enable_threshold_alerts {
            return None;
        }
        let band = preferences.threshold(&reading.attribute_id)?;
        let level = classify(band, reading.numeric_value)?;

        let display = reading.display();
        let (kind, message, breached) = match level {
            BandLevel::Critical => (
                NotificationKind::Critical,
                format!("Critical {} level: {}", reading.title, display),
                band.critical,
            ),
            BandLevel::Warning => (
                NotificationKind::Warning,
                format!("{} outside normal range: {}", reading.title, display),
                band.warning(),
            ),
        };

        Some(
            NewNotification::new(kind, format!("{} Alert", reading.title), message)
                .with_category(Category::Threshold)
                .with_attribute(reading.attribute_id.clone())
                .with_detail(AlertDetail::Threshold {
                    value: display,
                    band: breached,
                }),
        )
    }

    fn name(&self) -> &str {
        "threshold"
    }
}

/// Raises a warning when the quality score drops below the cutoff
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityEvaluator;

impl Evaluator for QualityEvaluator {
    fn evaluate(&self, preferences: &PreferenceSet, reading: &Reading) -> Option<NewNotification> {
        if !preferences.enable_data_quality_warnings {
            return None;
        }
        let quality = reading.quality?;
        // Strictly below: a score equal to the cutoff passes
        if quality >= f64::from(preferences.data_quality_threshold.value()) || quality.is_nan() {
            return None;
        }

        Some(
            NewNotification::new(
                NotificationKind::Warning,
                "Data Quality Warning",
                format!("{} data quality is {}%", reading.title, quality),
            )
            .with_category(Category::DataQuality)
            .with_attribute(reading.attribute_id.clone())
            .with_detail(AlertDetail::Quality { quality }),
        )
    }

    fn name(&self) -> &str {
        "data_quality"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::preferences::{PreferenceUpdate, ThresholdUpdate};
    use crate::domain::Bounds;

    fn temperature(value: f64) -> Reading {
        Reading::new("temperature", value)
    }

    #[test]
    fn test_classify_boundaries() {
        let band = ThresholdBand::new(15.0, 25.0, 10.0, 30.0);
        assert_eq!(classify(&band, 20.0), None);
        assert_eq!(classify(&band, 15.0), Some(BandLevel::Warning));
        assert_eq!(classify(&band, 25.0), Some(BandLevel::Warning));
        assert_eq!(classify(&band, 12.0), Some(BandLevel::Warning));
        assert_eq!(classify(&band, 10.0), Some(BandLevel::Critical));
        assert_eq!(classify(&band, 30.0), Some(BandLevel::Critical));
        assert_eq!(classify(&band, -5.0), Some(BandLevel::Critical));
        assert_eq!(classify(&band, f64::NAN), None);
    }

    #[test]
    fn test_inside_warning_band_never_alerts() {
        let prefs = PreferenceSet::default();
        for (name, band) in &prefs.thresholds {
            let steps = 20;
            for i in 1..steps {
                let value = band.min + (band.max - band.min) * i as f64 / steps as f64;
                let reading = Reading::new(name.clone(), value);
                assert!(
                    ThresholdEvaluator.evaluate(&prefs, &reading).is_none(),
                    "{} = {} should not alert",
                    name,
                    value
                );
            }
        }
    }

    #[test]
    fn test_beyond_critical_is_always_critical() {
        let prefs = PreferenceSet::default();
        for (name, band) in &prefs.thresholds {
            for value in [
                band.critical.min,
                band.critical.min - 1.0,
                band.critical.max,
                band.critical.max + 1.0,
            ] {
                let alert = ThresholdEvaluator
                    .evaluate(&prefs, &Reading::new(name.clone(), value))
                    .expect("critical alert");
                assert_eq!(alert.kind, NotificationKind::Critical, "{} = {}", name, value);
            }
        }
    }

    #[test]
    fn test_between_bands_is_warning() {
        let prefs = PreferenceSet::default();
        for (name, band) in &prefs.thresholds {
            let mut values = vec![band.max, (band.max + band.critical.max) / 2.0];
            // turbidity shares its lower warning and critical bound
            if band.min > band.critical.min {
                values.push(band.min);
                values.push((band.min + band.critical.min) / 2.0);
            }
            for value in values {
                let alert = ThresholdEvaluator
                    .evaluate(&prefs, &Reading::new(name.clone(), value))
                    .expect("warning alert");
                assert_eq!(alert.kind, NotificationKind::Warning, "{} = {}", name, value);
            }
        }
    }

    #[test]
    fn test_critical_temperature_message() {
        let prefs = PreferenceSet::default();
        let alert = ThresholdEvaluator
            .evaluate(&prefs, &temperature(32.0))
            .expect("alert");
        assert_eq!(alert.kind, NotificationKind::Critical);
        assert_eq!(alert.title, "Temperature Alert");
        assert!(alert.message.contains("Critical Temperature level: 32"));
        assert_eq!(alert.category, Some(Category::Threshold));
        assert_eq!(alert.attribute_id.as_deref(), Some("temperature"));
        assert_eq!(
            alert.detail,
            Some(AlertDetail::Threshold {
                value: "32".to_string(),
                band: Bounds::new(10.0, 30.0),
            })
        );
    }

    #[test]
    fn test_warning_message_uses_display_value() {
        let prefs = PreferenceSet::default();
        let reading = temperature(27.0).with_display("27°C");
        let alert = ThresholdEvaluator.evaluate(&prefs, &reading).expect("alert");
        assert_eq!(alert.kind, NotificationKind::Warning);
        assert_eq!(alert.message, "Temperature outside normal range: 27°C");
        assert!(matches!(
            alert.detail,
            Some(AlertDetail::Threshold { band, .. }) if band == Bounds::new(15.0, 25.0)
        ));
    }

    #[test]
    fn test_disabled_threshold_alerts() {
        let mut prefs = PreferenceSet::default();
        prefs.apply(PreferenceUpdate::new().threshold_alerts(false));
        assert!(ThresholdEvaluator.evaluate(&prefs, &temperature(32.0)).is_none());
    }

    #[test]
    fn test_unknown_attribute_is_ignored() {
        let prefs = PreferenceSet::default();
        let reading = Reading::new("ph", 14.0);
        assert!(ThresholdEvaluator.evaluate(&prefs, &reading).is_none());
    }

    #[test]
    fn test_inverted_band_follows_numbers() {
        let mut prefs = PreferenceSet::default();
        prefs.apply(PreferenceUpdate::new().threshold("temperature", ThresholdUpdate::warning(25.0, 15.0)));
        // 20 <= min(25) so it counts as a warning under the inverted band
        let alert = ThresholdEvaluator
            .evaluate(&prefs, &temperature(20.0))
            .expect("alert");
        assert_eq!(alert.kind, NotificationKind::Warning);
    }

    #[test]
    fn test_quality_below_cutoff_warns() {
        let prefs = PreferenceSet::default();
        let reading = temperature(20.0).with_quality(50.0);
        let alert = QualityEvaluator.evaluate(&prefs, &reading).expect("alert");
        assert_eq!(alert.kind, NotificationKind::Warning);
        assert_eq!(alert.title, "Data Quality Warning");
        assert_eq!(alert.message, "Temperature data quality is 50%");
        assert_eq!(alert.category, Some(Category::DataQuality));
        assert_eq!(alert.detail, Some(AlertDetail::Quality { quality: 50.0 }));
    }

    #[test]
    fn test_quality_boundary_is_strict() {
        let prefs = PreferenceSet::default();
        assert!(QualityEvaluator
            .evaluate(&prefs, &temperature(20.0).with_quality(70.0))
            .is_none());
        assert!(QualityEvaluator
            .evaluate(&prefs, &temperature(20.0).with_quality(69.5))
            .is_some());
    }

    #[test]
    fn test_quality_disabled_or_missing() {
        let mut prefs = PreferenceSet::default();
        assert!(QualityEvaluator.evaluate(&prefs, &temperature(20.0)).is_none());

        prefs.apply(PreferenceUpdate::new().data_quality_warnings(false));
        assert!(QualityEvaluator
            .evaluate(&prefs, &temperature(20.0).with_quality(10.0))
            .is_none());
    }

    #[test]
    fn test_evaluator_names() {
        assert_eq!(ThresholdEvaluator.name(), "threshold");
        assert_eq!(QualityEvaluator.name(), "data_quality");
    }
}
