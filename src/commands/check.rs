//! Check command implementation
//!
//! Evaluates one reading against the configured preferences and prints the
//! resulting feed.

use crate::cli::args::{CheckArgs, OutputFormat};
use crate::alerts::FeedSnapshot;
use crate::cli::output::print_output;
use crate::config::Config;
use crate::domain::Reading;
use crate::error::{AppError, DomainError, Result};
use crate::services::NotificationFeed;

/// Execute the check command
pub fn run_check(args: &CheckArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let snapshot = evaluate(args, config)?;
    print_output(&snapshot, format)?;
    Ok(())
}

/// Run the reading through a fresh feed and return what it raised
fn evaluate(args: &CheckArgs, config: &Config) -> Result<FeedSnapshot> {
    let reading = build_reading(args)?;

    let mut preferences = config.preferences.clone();
    if preferences.threshold(&reading.attribute_id).is_none() {
        if reading.quality.is_none() {
            return Err(AppError::UnknownAttribute(reading.attribute_id));
        }
        log::warn!(
            "No thresholds configured for {}; checking data quality only",
            reading.attribute_id
        );
    }
    // One-shot evaluation, no heartbeat
    preferences.enable_real_time_updates = false;

    let feed = NotificationFeed::new(config.feed_config(), preferences);
    let raised = feed.check_reading(&reading);
    log::info!(
        "{} = {} raised {} notification(s)",
        reading.attribute_id,
        reading.display(),
        raised.len()
    );

    Ok(feed.snapshot())
}

fn build_reading(args: &CheckArgs) -> Result<Reading> {
    let mut reading = Reading::checked(args.attribute.trim(), args.value)?;

    if let Some(title) = &args.title {
        reading = reading.with_title(title);
    }
    if let Some(display) = &args.display {
        reading = reading.with_display(display);
    }
    if let Some(quality) = args.quality {
        if !(0.0..=100.0).contains(&quality) {
            return Err(DomainError::InvalidPercentage(quality).into());
        }
        reading = reading.with_quality(quality);
    }

    Ok(reading)
}
