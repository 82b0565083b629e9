//! Real-time update heartbeat
//!
//! Periodically posts a synthetic data-update notification for a rotating
//! measurement channel, modelling live telemetry arrival.

use crate::alerts::NotificationStore;
use crate::domain::{channel_title, Category, NewNotification, NotificationKind};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Default period between heartbeat notifications
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Shortest accepted period; shorter ones are raised to this
pub const MIN_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

/// Build the notification posted for a channel update
pub fn heartbeat_notification(channel: &str) -> NewNotification {
    NewNotification::new(
        NotificationKind::Info,
        "Data Updated",
        format!("{} data has been updated", channel_title(channel)),
    )
    .with_category(Category::Update)
    .with_attribute(channel)
}

/// Running heartbeat task
///
/// The task is aborted when the heartbeat is stopped or dropped.
#[derive(Debug)]
pub struct Heartbeat {
    task: JoinHandle<()>,
    period: Duration,
}

impl Heartbeat {
    /// Start posting to `store` every `period`, cycling through `channels`
    ///
    /// The first notification arrives one full period after start.
    pub fn start(
        runtime: &Handle,
        store: NotificationStore,
        channels: Vec<String>,
        period: Duration,
    ) -> Self {
        let period = if period < MIN_HEARTBEAT_INTERVAL {
            log::warn!(
                "Heartbeat period {:?} is below {:?}; using {:?}",
                period,
                MIN_HEARTBEAT_INTERVAL,
                MIN_HEARTBEAT_INTERVAL
            );
            MIN_HEARTBEAT_INTERVAL
        } else {
            period
        };
        log::info!(
            "Heartbeat started ({} channels, every {:?})",
            channels.len(),
            period
        );

        let task = runtime.spawn(async move {
            if channels.is_empty() {
                return;
            }
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            for channel in channels.iter().cycle() {
                ticker.tick().await;
                let id = store.add(heartbeat_notification(channel));
                log::trace!("Heartbeat {} for {}", id, channel);
            }
        });

        Self { task, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the heartbeat
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.task.abort();
        log::info!("Heartbeat stopped");
    }
}
