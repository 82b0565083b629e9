//! Notification domain types
//!
//! Defines the notification record held in the feed together with the
//! partial form producers hand to the store.

use super::thresholds::Bounds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notification kind, doubling as severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Informational, e.g. a data update heartbeat
    Info,
    /// Positive confirmation
    Success,
    /// Value or quality outside the normal range
    Warning,
    /// Value outside the critical band; never auto-expires
    Critical,
}

impl NotificationKind {
    /// Whether records of this kind are removed automatically after the
    /// expiry delay
    pub fn expires(&self) -> bool {
        !matches!(self, Self::Critical)
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Success => write!(f, "SUCCESS"),
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Provenance of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Raised by the threshold evaluator
    Threshold,
    /// Raised by the data quality evaluator
    DataQuality,
    /// Synthetic heartbeat from the real-time update source
    Update,
    /// Added directly by a producer
    Manual,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Threshold => write!(f, "threshold"),
            Self::DataQuality => write!(f, "data_quality"),
            Self::Update => write!(f, "update"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// Notification identifier
///
/// Pairs the creation time with a store-local sequence number, so two
/// records created in the same millisecond never collide. Ordering follows
/// the sequence, so a clock stepping backwards cannot reorder ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NotificationId {
    seq: u64,
    millis: i64,
}

impl NotificationId {
    pub(crate) fn new(millis: i64, seq: u64) -> Self {
        Self { seq, millis }
    }

    /// Sequence number within the issuing store
    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.millis, self.seq)
    }
}

/// Evaluator context attached to a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlertDetail {
    /// Threshold breach: the displayed value and the band it left
    Threshold { value: String, band: Bounds },
    /// Data quality below the configured cutoff
    Quality { quality: f64 },
}

/// A notification as supplied by a producer
///
/// The store assigns id, timestamp and read state when the record is added.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub category: Option<Category>,
    pub title: String,
    pub message: String,
    pub attribute_id: Option<String>,
    pub detail: Option<AlertDetail>,
}

impl NewNotification {
    /// Create a new notification of the given kind
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            category: None,
            title: title.into(),
            message: message.into(),
            attribute_id: None,
            detail: None,
        }
    }

    /// Set the category
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Set the measurement channel this notification concerns
    pub fn with_attribute(mut self, attribute_id: impl Into<String>) -> Self {
        self.attribute_id = Some(attribute_id.into());
        self
    }

    /// Attach evaluator context
    pub fn with_detail(mut self, detail: AlertDetail) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// A notification record held in the feed
///
/// Only the read flag can change after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    id: NotificationId,
    timestamp: DateTime<Utc>,
    kind: NotificationKind,
    category: Option<Category>,
    title: String,
    message: String,
    read: bool,
    attribute_id: Option<String>,
    detail: Option<AlertDetail>,
}

impl Notification {
    pub(crate) fn from_new(id: NotificationId, timestamp: DateTime<Utc>, new: NewNotification) -> Self {
        Self {
            id,
            timestamp,
            kind: new.kind,
            category: new.category,
            title: new.title,
            message: new.message,
            read: false,
            attribute_id: new.attribute_id,
            detail: new.detail,
        }
    }

    pub fn id(&self) -> NotificationId {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_read(&self) -> bool {
        self.read
    }

    pub fn attribute_id(&self) -> Option<&str> {
        self.attribute_id.as_deref()
    }

    pub fn detail(&self) -> Option<&AlertDetail> {
        self.detail.as_ref()
    }

    /// Mark as read. Returns true if the flag changed.
    pub(crate) fn mark_read(&mut self) -> bool {
        !std::mem::replace(&mut self.read, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: NotificationKind) -> Notification {
        let new = NewNotification::new(kind, "Temperature Alert", "Critical Temperature level: 32")
            .with_category(Category::Threshold)
            .with_attribute("temperature");
        Notification::from_new(NotificationId::new(1_700_000_000_000, 1), Utc::now(), new)
    }

    #[test]
    fn test_kind_ordering() {
        assert!(NotificationKind::Info < NotificationKind::Success);
        assert!(NotificationKind::Success < NotificationKind::Warning);
        assert!(NotificationKind::Warning < NotificationKind::Critical);
    }

    #[test]
    fn test_only_critical_is_sticky() {
        assert!(NotificationKind::Info.expires());
        assert!(NotificationKind::Success.expires());
        assert!(NotificationKind::Warning.expires());
        assert!(!NotificationKind::Critical.expires());
    }

    #[test]
    fn test_new_record_is_unread() {
        let n = record(NotificationKind::Critical);
        assert!(!n.is_read());
        assert_eq!(n.category(), Some(Category::Threshold));
        assert_eq!(n.attribute_id(), Some("temperature"));
        assert_eq!(n.title(), "Temperature Alert");
    }

    #[test]
    fn test_mark_read_is_idempotent() {
        let mut n = record(NotificationKind::Warning);
        assert!(n.mark_read());
        assert!(n.is_read());
        assert!(!n.mark_read());
        assert!(n.is_read());
    }

    #[test]
    fn test_id_display() {
        let id = NotificationId::new(1_700_000_000_000, 42);
        assert_eq!(id.to_string(), "1700000000000-42");
        assert_eq!(id.seq(), 42);
    }

    #[test]
    fn test_id_order_follows_sequence() {
        let earlier = NotificationId::new(2_000, 1);
        let later = NotificationId::new(1_000, 2);
        assert!(earlier < later);
    }

    #[test]
    fn test_serialized_kind_is_snake_case() {
        let json = serde_json::to_string(&Category::DataQuality).unwrap();
        assert_eq!(json, "\"data_quality\"");
        let json = serde_json::to_string(&NotificationKind::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }
}
