//! Notification store
//!
//! Authoritative newest-first collection of notification records. Owns
//! record creation, read-marking, removal and the auto-expiry timers, and
//! republishes a snapshot to subscribers after every change.

use crate::domain::{NewNotification, Notification, NotificationId};
use chrono::Utc;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;

/// Notification store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum number of records kept; the oldest are dropped beyond this
    pub capacity: usize,
    /// Delay after which non-critical records are removed
    pub expiry: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: 50,
            expiry: Duration::from_millis(5000),
        }
    }
}

/// State published to subscribers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedSnapshot {
    /// Records, newest first
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

impl FeedSnapshot {
    fn capture(records: &VecDeque<Notification>) -> Self {
        Self {
            notifications: records.iter().cloned().collect(),
            unread_count: count_unread(records),
        }
    }
}

fn count_unread(records: &VecDeque<Notification>) -> usize {
    records.iter().filter(|n| !n.is_read()).count()
}

#[derive(Debug, Default)]
struct StoreState {
    /// Newest first
    records: VecDeque<Notification>,
    /// Pending expiry timers by record
    expiries: HashMap<NotificationId, AbortHandle>,
    next_seq: u64,
}

impl StoreState {
    fn cancel_expiry(&mut self, id: NotificationId) {
        if let Some(handle) = self.expiries.remove(&id) {
            handle.abort();
        }
    }

    fn cancel_all_expiries(&mut self) {
        for (_, handle) in self.expiries.drain() {
            handle.abort();
        }
    }

    fn position(&self, id: NotificationId) -> Option<usize> {
        self.records.iter().position(|n| n.id() == id)
    }
}

impl Drop for StoreState {
    fn drop(&mut self) {
        self.cancel_all_expiries();
    }
}

#[derive(Debug)]
struct Shared {
    state: Mutex<StoreState>,
    config: StoreConfig,
    runtime: Option<Handle>,
    publisher: watch::Sender<FeedSnapshot>,
}

/// Notification store
///
/// Cheap to clone; clones share the same records. Pending expiry timers
/// only hold a weak reference, and are aborted once the last handle is
/// dropped.
#[derive(Debug, Clone)]
pub struct NotificationStore {
    shared: Arc<Shared>,
}

impl NotificationStore {
    /// Create a store that schedules expiry on the current tokio runtime
    ///
    /// Outside a runtime records are still stored, but never expire.
    pub fn new(config: StoreConfig) -> Self {
        let runtime = Handle::try_current().ok();
        if runtime.is_none() {
            log::warn!("No tokio runtime available; notifications will not expire automatically");
        }
        Self::build(config, runtime)
    }

    /// Create a store that schedules expiry on the given runtime
    pub fn with_runtime(config: StoreConfig, runtime: Handle) -> Self {
        Self::build(config, Some(runtime))
    }

    fn build(config: StoreConfig, runtime: Option<Handle>) -> Self {
        let (publisher, _) = watch::channel(FeedSnapshot::default());
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(StoreState::default()),
                config,
                runtime,
                publisher,
            }),
        }
    }

    /// Store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.shared.config
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &StoreState) {
        self.shared
            .publisher
            .send_replace(FeedSnapshot::capture(&state.records));
    }

    /// Add a notification and return its id
    ///
    /// The record is placed at the front. Non-critical records are removed
    /// again after the configured expiry delay unless removed earlier.
    pub fn add(&self, new: NewNotification) -> NotificationId {
        let now = Utc::now();
        let kind = new.kind;
        let mut state = self.lock();

        state.next_seq += 1;
        let id = NotificationId::new(now.timestamp_millis(), state.next_seq);
        state.records.push_front(Notification::from_new(id, now, new));
        log::debug!("Notification {} added ({})", id, kind);

        while state.records.len() > self.shared.config.capacity {
            if let Some(dropped) = state.records.pop_back() {
                state.cancel_expiry(dropped.id());
                log::debug!("Notification {} dropped on overflow", dropped.id());
            }
        }

        let retained = state.records.front().map(Notification::id) == Some(id);
        if retained && kind.expires() {
            if let Some(handle) = self.schedule_expiry(id) {
                state.expiries.insert(id, handle);
            }
        }

        self.publish(&state);
        id
    }

    fn schedule_expiry(&self, id: NotificationId) -> Option<AbortHandle> {
        let runtime = self.shared.runtime.as_ref()?;
        let delay = self.shared.config.expiry;
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);

        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = weak.upgrade() {
                NotificationStore { shared }.expire(id);
            }
        });
        Some(task.abort_handle())
    }

    fn expire(&self, id: NotificationId) {
        let mut state = self.lock();
        state.expiries.remove(&id);
        if let Some(pos) = state.position(id) {
            state.records.remove(pos);
            log::debug!("Notification {} expired", id);
            self.publish(&state);
        }
    }

    /// Remove a notification; unknown ids are ignored
    ///
    /// Returns true if a record was removed.
    pub fn remove(&self, id: NotificationId) -> bool {
        let mut state = self.lock();
        state.cancel_expiry(id);
        match state.position(id) {
            Some(pos) => {
                state.records.remove(pos);
                log::debug!("Notification {} removed", id);
                self.publish(&state);
                true
            }
            None => false,
        }
    }

    /// Mark a notification as read; unknown or already-read ids are ignored
    ///
    /// Returns true if the read flag changed.
    pub fn mark_read(&self, id: NotificationId) -> bool {
        let mut state = self.lock();
        let changed = state
            .records
            .iter_mut()
            .find(|n| n.id() == id)
            .map(Notification::mark_read)
            .unwrap_or(false);
        if changed {
            self.publish(&state);
        }
        changed
    }

    /// Mark every notification as read and return how many changed
    pub fn mark_all_read(&self) -> usize {
        let mut state = self.lock();
        let changed = state
            .records
            .iter_mut()
            .map(Notification::mark_read)
            .filter(|&changed| changed)
            .count();
        if changed > 0 {
            self.publish(&state);
        }
        changed
    }

    /// Remove every notification and cancel all pending expiries
    pub fn clear_all(&self) {
        let mut state = self.lock();
        state.cancel_all_expiries();
        let cleared = state.records.len();
        state.records.clear();
        log::debug!("Cleared {} notifications", cleared);
        self.publish(&state);
    }

    /// Number of unread notifications, counted from the current records
    pub fn unread_count(&self) -> usize {
        count_unread(&self.lock().records)
    }

    /// Current records and unread count, captured together
    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot::capture(&self.lock().records)
    }

    /// All notifications, newest first
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().records.iter().cloned().collect()
    }

    /// Look up a single notification
    pub fn get(&self, id: NotificationId) -> Option<Notification> {
        let state = self.lock();
        state.position(id).map(|pos| state.records[pos].clone())
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    /// Number of expiry timers still waiting to fire
    pub fn pending_expiry_count(&self) -> usize {
        self.lock().expiries.len()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.shared.publisher.subscribe()
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}
