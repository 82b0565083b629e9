//! Service layer
//!
//! The notification feed and the background heartbeat it owns.

pub mod feed;
pub mod heartbeat;

pub use feed::{FeedConfig, NotificationFeed};
pub use heartbeat::{
    heartbeat_notification, Heartbeat, DEFAULT_HEARTBEAT_INTERVAL, MIN_HEARTBEAT_INTERVAL,
};
