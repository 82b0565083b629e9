//! Unified error types for tidewatch
//!
//! The alerting core itself is total; errors only arise at the edges
//! (configuration files, CLI input). Uses thiserror for ergonomic error
//! definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from domain type validation
    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    /// Unknown measurement attribute
    #[error("No thresholds configured for attribute: {0}")]
    UnknownAttribute(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from domain type validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Percentage outside 0-100
    #[error("Invalid percentage: {0}% (must be 0-100)")]
    InvalidPercentage(f64),

    /// Empty attribute identifier
    #[error("Attribute identifier must not be empty")]
    EmptyAttribute,
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Config file already exists and overwrite was not requested
    #[error("Configuration file already exists: {0} (use --force to overwrite)")]
    AlreadyExists(String),

    /// Failed to write config file
    #[error("Failed to write configuration to {path}: {source}")]
    WriteError {
        path: String,
        source: std::io::Error,
    },

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
