//! Notification output channels
//!
//! Renders feed entries for people watching a session. Only a terminal
//! channel exists; the email preference is recorded but not delivered.

use crate::domain::{Notification, NotificationKind};
use crate::error::Result;
use std::io::{self, Write};

/// Notification channel trait
pub trait Notifier: Send + Sync {
    /// Deliver a notification
    fn notify(&self, notification: &Notification) -> Result<()>;

    /// Channel name for identification
    fn name(&self) -> &str;
}

/// Terminal/console notifier
///
/// Writes one line per notification with colored severity
pub struct TerminalNotifier {
    /// Use stderr instead of stdout
    use_stderr: bool,
    /// Use colors (ANSI escape codes)
    use_colors: bool,
}

impl TerminalNotifier {
    /// Create a notifier writing to stdout
    pub fn new() -> Self {
        Self {
            use_stderr: false,
            use_colors: Self::supports_color(),
        }
    }

    /// Create a notifier that uses stderr
    pub fn stderr() -> Self {
        Self {
            use_stderr: true,
            use_colors: Self::supports_color(),
        }
    }

    /// Create a notifier without colors
    pub fn no_color() -> Self {
        Self {
            use_stderr: false,
            use_colors: false,
        }
    }

    fn supports_color() -> bool {
        std::env::var("TERM")
            .map(|term| term != "dumb")
            .unwrap_or(false)
            && std::env::var_os("NO_COLOR").is_none()
    }

    /// Format a notification as a single line
    pub fn format_notification(&self, notification: &Notification) -> String {
        let timestamp = notification
            .timestamp()
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S");
        let category = notification
            .category()
            .map(|c| format!(" ({})", c))
            .unwrap_or_default();

        format!(
            "[{}] {}{} {}: {}",
            timestamp,
            self.format_kind(notification.kind()),
            category,
            notification.title(),
            notification.message()
        )
    }

    fn format_kind(&self, kind: NotificationKind) -> String {
        if !self.use_colors {
            return kind.to_string();
        }

        let color_code = match kind {
            NotificationKind::Info => "\x1b[34m",           // Blue
            NotificationKind::Success => "\x1b[32m",        // Green
            NotificationKind::Warning => "\x1b[33m",        // Yellow
            NotificationKind::Critical => "\x1b[31m\x1b[1m", // Bold red
        };

        format!("{}{}\x1b[0m", color_code, kind)
    }
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: &Notification) -> Result<()> {
        let line = self.format_notification(notification);

        if self.use_stderr {
            writeln!(io::stderr().lock(), "{}", line)?;
        } else {
            writeln!(io::stdout().lock(), "{}", line)?;
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "terminal"
    }
}

/// Dispatches notifications to every registered channel
pub struct NotificationDispatcher {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotificationDispatcher {
    pub fn new() -> Self {
        Self {
            notifiers: Vec::new(),
        }
    }

    pub fn add_notifier(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Send to all channels; a failing channel does not stop the others
    pub fn notify_all(&self, notification: &Notification) {
        for notifier in &self.notifiers {
            if let Err(e) = notifier.notify(notification) {
                log::warn!(
                    "Failed to deliver {} via {}: {}",
                    notification.id(),
                    notifier.name(),
                    e
                );
            }
        }
    }

    pub fn notifier_count(&self) -> usize {
        self.notifiers.len()
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        let mut dispatcher = Self::new();
        dispatcher.add_notifier(Box::new(TerminalNotifier::new()));
        dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, NewNotification, NotificationId};
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    fn sample() -> Notification {
        let new = NewNotification::new(
            NotificationKind::Critical,
            "Temperature Alert",
            "Critical Temperature level: 32",
        )
        .with_category(Category::Threshold);
        Notification::from_new(NotificationId::new(0, 1), Utc::now(), new)
    }

    struct Recording {
        seen: Arc<Mutex<Vec<NotificationId>>>,
    }

    impl Notifier for Recording {
        fn notify(&self, notification: &Notification) -> Result<()> {
            self.seen.lock().unwrap().push(notification.id());
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct Failing;

    impl Notifier for Failing {
        fn notify(&self, _notification: &Notification) -> Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed").into())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_terminal_notifier_creation() {
        let notifier = TerminalNotifier::new();
        assert_eq!(notifier.name(), "terminal");
        assert!(!notifier.use_stderr);
        assert!(TerminalNotifier::stderr().use_stderr);
        assert!(!TerminalNotifier::no_color().use_colors);
    }

    #[test]
    fn test_format_notification() {
        let line = TerminalNotifier::no_color().format_notification(&sample());
        assert!(line.contains("CRITICAL (threshold) Temperature Alert"));
        assert!(line.ends_with("Critical Temperature level: 32"));
    }

    #[test]
    fn test_format_kind_plain() {
        let notifier = TerminalNotifier::no_color();
        assert_eq!(notifier.format_kind(NotificationKind::Info), "INFO");
        assert_eq!(notifier.format_kind(NotificationKind::Warning), "WARNING");
    }

    #[test]
    fn test_dispatcher_default() {
        assert_eq!(NotificationDispatcher::default().notifier_count(), 1);
        assert_eq!(NotificationDispatcher::new().notifier_count(), 0);
    }

    #[test]
    fn test_failing_channel_does_not_block_others() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = NotificationDispatcher::new();
        dispatcher.add_notifier(Box::new(Failing));
        dispatcher.add_notifier(Box::new(Recording { seen: Arc::clone(&seen) }));

        let notification = sample();
        dispatcher.notify_all(&notification);
        assert_eq!(*seen.lock().unwrap(), vec![notification.id()]);
    }
}
