//! Alerting and notification engine
//!
//! Threshold and data quality evaluation, user preferences, and the
//! notification store with auto-expiry.

mod evaluator;
mod notifier;
mod preferences;
mod store;

pub use evaluator::{classify, BandLevel, Evaluator, QualityEvaluator, ThresholdEvaluator};
pub use notifier::{NotificationDispatcher, Notifier, TerminalNotifier};
pub use preferences::{
    BoundsUpdate, PreferenceSet, PreferenceStore, PreferenceUpdate, ThresholdUpdate,
    DEFAULT_CHANNELS,
};
pub use store::{FeedSnapshot, NotificationStore, StoreConfig};
