//! Simulate command implementation
//!
//! Runs a live feed session: synthetic readings sweep through every
//! configured channel while the heartbeat posts data updates, and each new
//! notification is delivered as it appears.

use crate::alerts::NotificationDispatcher;
use crate::cli::args::{OutputFormat, SimulateArgs};
use crate::cli::output::{print_output, Message};
use crate::config::ConfigBuilder;
use crate::domain::{Notification, NotificationId, Reading, ThresholdBand};
use crate::error::Result;
use crate::services::NotificationFeed;

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;
use tokio::time::{interval, sleep, MissedTickBehavior};

/// Execute the simulate command
pub async fn run_simulate(
    args: &SimulateArgs,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let config = ConfigBuilder::new()
        .with_file(config_path)?
        .with_expiry_ms(args.expiry_ms)
        .with_heartbeat_interval(args.heartbeat)
        .with_max_notifications(args.max_notifications)
        .with_real_time_updates(args.no_heartbeat.then_some(false))
        .build();
    for warning in config.validate()? {
        log::warn!("{}", warning);
    }

    let sweep = ReadingSweep::new(&config.preferences.thresholds);
    let timing = SessionTiming {
        interval: Duration::from_secs(args.interval.max(1)),
        duration: Duration::from_secs(args.duration),
    };
    log::info!(
        "Simulating {} channel(s) for {:?}, reading every {:?}",
        sweep.len(),
        timing.duration,
        timing.interval
    );

    let feed = NotificationFeed::new(config.feed_config(), config.preferences.clone());
    let dispatcher = NotificationDispatcher::default();

    let summary = run_session(&feed, &sweep, timing, |notification| {
        match format {
            OutputFormat::Table => dispatcher.notify_all(notification),
            _ => print_output(notification, format)?,
        }
        Ok(())
    })
    .await?;

    let snapshot = feed.snapshot();
    feed.shutdown();

    let message = Message {
        message: format!(
            "Simulation finished after {} step(s): {} alert(s) raised, {} notification(s) delivered, {} left in feed ({} unread)",
            summary.steps,
            summary.alerts_raised,
            summary.delivered,
            snapshot.notifications.len(),
            snapshot.unread_count
        ),
        success: true,
    };
    print_output(&message, format)?;
    Ok(())
}

/// Reading cadence and session length
#[derive(Debug, Clone, Copy)]
struct SessionTiming {
    interval: Duration,
    duration: Duration,
}

/// Counters reported at the end of a session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct SessionSummary {
    steps: u64,
    alerts_raised: usize,
    delivered: usize,
}

/// Feed readings until the session ends, handing each new record to `deliver`
///
/// Ends when the duration elapses or on Ctrl-C.
async fn run_session<F>(
    feed: &NotificationFeed,
    sweep: &ReadingSweep,
    timing: SessionTiming,
    mut deliver: F,
) -> Result<SessionSummary>
where
    F: FnMut(&Notification) -> Result<()>,
{
    let mut summary = SessionSummary::default();
    let mut seen: HashSet<NotificationId> = HashSet::new();
    let mut updates = feed.subscribe();

    let mut ticker = interval(timing.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let deadline = sleep(timing.duration);
    tokio::pin!(deadline);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut listening = true;

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            result = &mut ctrl_c, if listening => match result {
                Ok(()) => {
                    log::info!("Interrupted");
                    break;
                }
                Err(e) => {
                    log::warn!("Cannot listen for Ctrl-C: {}", e);
                    listening = false;
                }
            },
            _ = ticker.tick() => {
                for reading in sweep.readings(summary.steps) {
                    summary.alerts_raised += feed.check_reading(&reading).len();
                }
                summary.steps += 1;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                // Oldest first so delivery follows arrival order
                for notification in snapshot.notifications.iter().rev() {
                    if seen.insert(notification.id()) {
                        summary.delivered += 1;
                        deliver(notification)?;
                    }
                }
                // Ids are never reused, so only live records need remembering
                seen.retain(|id| snapshot.notifications.iter().any(|n| n.id() == *id));
            }
        }
    }

    Ok(summary)
}

/// Deterministic synthetic readings for every configured channel
///
/// Each channel oscillates around the middle of its critical band with an
/// amplitude slightly wider than that band, so a session passes through
/// normal, warning and critical values. Quality scores dip periodically.
#[derive(Debug, Clone)]
struct ReadingSweep {
    channels: Vec<(String, ThresholdBand)>,
}

impl ReadingSweep {
    const PHASE_STEP: f64 = 0.6;
    const QUALITY_STEP: f64 = 0.37;
    const OVERSHOOT: f64 = 1.1;

    fn new(thresholds: &BTreeMap<String, ThresholdBand>) -> Self {
        Self {
            channels: thresholds
                .iter()
                .map(|(name, band)| (name.clone(), *band))
                .collect(),
        }
    }

    fn len(&self) -> usize {
        self.channels.len()
    }

    fn readings(&self, step: u64) -> Vec<Reading> {
        self.channels
            .iter()
            .enumerate()
            .map(|(index, (name, band))| {
                let offset = index as f64 * 1.3;
                let center = (band.critical.min + band.critical.max) / 2.0;
                let amplitude = (band.critical.max - band.critical.min) / 2.0 * Self::OVERSHOOT;
                let value = center + amplitude * (step as f64 * Self::PHASE_STEP + offset).sin();
                let quality =
                    100.0 - 45.0 * (step as f64 * Self::QUALITY_STEP + index as f64).sin().abs();

                Reading::new(name.as_str(), value)
                    .with_display(format!("{:.2}", value))
                    .with_quality(quality.round())
            })
            .collect()
    }
}
