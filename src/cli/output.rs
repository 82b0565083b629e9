//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::alerts::{FeedSnapshot, PreferenceSet};
use crate::cli::args::OutputFormat;
use crate::domain::{AlertDetail, Notification, QualityLevel};
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

impl TableDisplay for Notification {
    fn to_table(&self) -> String {
        let marker = if self.is_read() { ' ' } else { '*' };
        let mut output = format!(
            "{} [{}] {} - {}\n    {}",
            marker,
            self.kind(),
            self.timestamp().format("%Y-%m-%d %H:%M:%S"),
            self.title(),
            self.message()
        );

        match self.detail() {
            Some(AlertDetail::Threshold { value, band }) => {
                output.push_str(&format!("\n    value {} breached {}", value, band));
            }
            Some(AlertDetail::Quality { quality }) => {
                output.push_str(&format!(
                    "\n    quality {}% ({})",
                    quality,
                    QualityLevel::from_percent(*quality)
                ));
            }
            None => {}
        }

        output
    }

    fn to_compact(&self) -> String {
        format!("{}:{}:{}", self.id(), self.kind(), self.title())
    }
}

impl TableDisplay for FeedSnapshot {
    fn to_table(&self) -> String {
        let mut output = format!(
            "Notifications: {} ({} unread)\n",
            self.notifications.len(),
            self.unread_count
        );

        if self.notifications.is_empty() {
            output.push_str("  (none)\n");
        }
        for notification in &self.notifications {
            output.push_str(&notification.to_table());
            output.push('\n');
        }

        output
    }

    fn to_compact(&self) -> String {
        let entries: Vec<_> = self.notifications.iter().map(|n| n.to_compact()).collect();
        format!("unread={} {}", self.unread_count, entries.join(", "))
    }
}

impl TableDisplay for PreferenceSet {
    fn to_table(&self) -> String {
        let flag = |enabled: bool| if enabled { "✓" } else { "✗" };

        let mut output = String::from("Alert Preferences\n");
        output.push_str(&format!(
            "  {} Real-time updates\n  {} Threshold alerts\n  {} Data quality warnings\n  {} Email notifications\n",
            flag(self.enable_real_time_updates),
            flag(self.enable_threshold_alerts),
            flag(self.enable_data_quality_warnings),
            flag(self.enable_email_notifications),
        ));
        output.push_str(&format!(
            "  Data quality threshold: {}\n\nThresholds:\n",
            self.data_quality_threshold
        ));

        for (name, band) in &self.thresholds {
            let note = if band.is_well_formed() { "" } else { "  (bands not nested)" };
            output.push_str(&format!("  {:<12} {}{}\n", name, band, note));
        }

        output
    }

    fn to_compact(&self) -> String {
        format!(
            "realtime={} thresholds={} quality={} email={} cutoff={} channels={}",
            self.enable_real_time_updates,
            self.enable_threshold_alerts,
            self.enable_data_quality_warnings,
            self.enable_email_notifications,
            self.data_quality_threshold.value(),
            self.thresholds.len()
        )
    }
}

/// Simple message output
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
    pub success: bool,
}

impl TableDisplay for Message {
    fn to_table(&self) -> String {
        if self.success {
            format!("✓ {}", self.message)
        } else {
            format!("✗ {}", self.message)
        }
    }
}
