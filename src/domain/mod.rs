//! Domain models for tidewatch
//!
//! This module contains the notification record, measurement snapshots and
//! threshold bands. Validated types fail fast on construction.

pub mod notification;
pub mod reading;
pub mod thresholds;

pub use notification::{
    AlertDetail, Category, NewNotification, Notification, NotificationId, NotificationKind,
};
pub use reading::{channel_title, QualityLevel, Reading};
pub use thresholds::{Bounds, Percentage, ThresholdBand};
