//! Notification feed
//!
//! The surface shared by producers and consumers: evaluators, the
//! notification store, preferences and the real-time heartbeat behind one
//! owned object.

use super::heartbeat::{Heartbeat, DEFAULT_HEARTBEAT_INTERVAL};
use crate::alerts::{
    Evaluator, FeedSnapshot, NotificationStore, PreferenceSet, PreferenceStore, PreferenceUpdate,
    QualityEvaluator, StoreConfig, ThresholdEvaluator, DEFAULT_CHANNELS,
};
use crate::domain::{Category, NewNotification, Notification, NotificationId, NotificationKind, Reading};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;

/// Feed configuration
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub store: StoreConfig,
    /// Period of the real-time update heartbeat
    pub heartbeat_interval: Duration,
    /// Channels the heartbeat cycles through
    pub heartbeat_channels: Vec<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            heartbeat_channels: DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Notification feed
///
/// Dropping the feed stops the heartbeat and cancels pending expiries.
#[derive(Debug)]
pub struct NotificationFeed {
    preferences: PreferenceStore,
    store: NotificationStore,
    heartbeat: Mutex<Option<Heartbeat>>,
    heartbeat_interval: Duration,
    heartbeat_channels: Vec<String>,
    runtime: Option<Handle>,
    threshold: ThresholdEvaluator,
    quality: QualityEvaluator,
}

impl NotificationFeed {
    /// Create a feed on the current tokio runtime
    ///
    /// Starts the heartbeat straight away if real-time updates are enabled.
    pub fn new(config: FeedConfig, preferences: PreferenceSet) -> Self {
        let runtime = Handle::try_current().ok();
        let store = match &runtime {
            Some(handle) => NotificationStore::with_runtime(config.store, handle.clone()),
            None => NotificationStore::new(config.store),
        };

        let feed = Self {
            preferences: PreferenceStore::new(preferences),
            store,
            heartbeat: Mutex::new(None),
            heartbeat_interval: config.heartbeat_interval,
            heartbeat_channels: config.heartbeat_channels,
            runtime,
            threshold: ThresholdEvaluator,
            quality: QualityEvaluator,
        };
        feed.sync_heartbeat(&feed.preferences.get());
        feed
    }

    /// Underlying store, for consumers that need direct access
    pub fn store(&self) -> &NotificationStore {
        &self.store
    }

    // Producers

    /// Add a notification and return its id
    pub fn add_notification(&self, notification: NewNotification) -> NotificationId {
        self.store.add(notification)
    }

    /// Evaluate a reading against the threshold bands
    pub fn check_thresholds(&self, reading: &Reading) -> Option<NotificationId> {
        self.raise(&self.threshold, reading)
    }

    /// Evaluate a reading's data quality score
    pub fn check_data_quality(&self, reading: &Reading) -> Option<NotificationId> {
        self.raise(&self.quality, reading)
    }

    /// Run every evaluator against a reading
    pub fn check_reading(&self, reading: &Reading) -> Vec<NotificationId> {
        let evaluators: [&dyn Evaluator; 2] = [&self.threshold, &self.quality];
        evaluators
            .into_iter()
            .filter_map(|evaluator| self.raise(evaluator, reading))
            .collect()
    }

    fn raise(&self, evaluator: &dyn Evaluator, reading: &Reading) -> Option<NotificationId> {
        let preferences = self.preferences.get();
        let notification = evaluator.evaluate(&preferences, reading)?;
        log::debug!(
            "{} evaluator raised {} for {} = {}",
            evaluator.name(),
            notification.kind,
            reading.attribute_id,
            reading.numeric_value
        );
        Some(self.store.add(notification))
    }

    // Consumers

    /// Records and unread count as one consistent snapshot
    pub fn snapshot(&self) -> FeedSnapshot {
        self.store.snapshot()
    }

    /// All notifications, newest first
    pub fn notifications(&self) -> Vec<Notification> {
        self.store.notifications()
    }

    pub fn unread_count(&self) -> usize {
        self.store.unread_count()
    }

    pub fn get(&self, id: NotificationId) -> Option<Notification> {
        self.store.get(id)
    }

    /// The newest `limit` notifications
    pub fn recent(&self, limit: usize) -> Vec<Notification> {
        self.store.notifications().into_iter().take(limit).collect()
    }

    /// Unread critical notifications, newest first, at most `limit`
    pub fn critical_unread(&self, limit: usize) -> Vec<Notification> {
        self.store
            .notifications()
            .into_iter()
            .filter(|n| n.kind() == NotificationKind::Critical && !n.is_read())
            .take(limit)
            .collect()
    }

    /// Notifications with the given provenance
    pub fn by_category(&self, category: Category) -> Vec<Notification> {
        self.store
            .notifications()
            .into_iter()
            .filter(|n| n.category() == Some(category))
            .collect()
    }

    pub fn mark_as_read(&self, id: NotificationId) -> bool {
        self.store.mark_read(id)
    }

    pub fn mark_all_read(&self) -> usize {
        self.store.mark_all_read()
    }

    pub fn remove_notification(&self, id: NotificationId) -> bool {
        self.store.remove(id)
    }

    pub fn clear_all(&self) {
        self.store.clear_all()
    }

    /// Subscribe to feed changes
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.store.subscribe()
    }

    // Preferences

    pub fn preferences(&self) -> PreferenceSet {
        self.preferences.get()
    }

    /// Merge a preference update; starts or stops the heartbeat to match
    pub fn update_preferences(&self, update: PreferenceUpdate) -> PreferenceSet {
        let preferences = self.preferences.update(update);
        self.sync_heartbeat(&preferences);
        preferences
    }

    /// Whether the heartbeat task is running
    pub fn heartbeat_running(&self) -> bool {
        self.heartbeat
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    fn sync_heartbeat(&self, preferences: &PreferenceSet) {
        let mut slot = self.heartbeat.lock().unwrap_or_else(PoisonError::into_inner);
        match (preferences.enable_real_time_updates, slot.is_some()) {
            (true, false) => match &self.runtime {
                Some(runtime) => {
                    *slot = Some(Heartbeat::start(
                        runtime,
                        self.store.clone(),
                        self.heartbeat_channels.clone(),
                        self.heartbeat_interval,
                    ));
                }
                None => log::warn!("No tokio runtime available; real-time updates disabled"),
            },
            (false, true) => {
                if let Some(heartbeat) = slot.take() {
                    heartbeat.stop();
                }
            }
            _ => {}
        }
    }

    /// Stop the heartbeat and drop every notification along with its timer
    pub fn shutdown(&self) {
        if let Some(heartbeat) = self
            .heartbeat
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            heartbeat.stop();
        }
        self.store.clear_all();
    }
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self::new(FeedConfig::default(), PreferenceSet::default())
    }
}

impl Drop for NotificationFeed {
    fn drop(&mut self) {
        self.shutdown();
    }
}
