//! tidewatch - threshold and data-quality alerting for oceanographic feeds
//!
//! This library evaluates measurement readings against per-channel warning
//! and critical bands and a data quality cutoff, and keeps the resulting
//! notifications in a bounded, auto-expiring feed that consumers can
//! subscribe to.
//!
//! # Modules
//!
//! - [`alerts`]: Evaluators, preferences, notification store and delivery
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`domain`]: Domain models with validation
//! - [`error`]: Error types
//! - [`services`]: Notification feed and real-time heartbeat

pub mod alerts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;

pub use error::{AppError, Result};
