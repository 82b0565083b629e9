//! Measurement snapshot types

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single channel's current value plus display metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Measurement channel, e.g. `temperature`
    pub attribute_id: String,
    /// Human-readable channel name, e.g. `Temperature`
    pub title: String,
    pub numeric_value: f64,
    /// Formatted value shown to users, e.g. `32°C`
    pub display_value: Option<String>,
    /// Data quality score in percent
    pub quality: Option<f64>,
}

impl Reading {
    /// Create a reading titled after its channel
    pub fn new(attribute_id: impl Into<String>, numeric_value: f64) -> Self {
        let attribute_id = attribute_id.into();
        let title = channel_title(&attribute_id);
        Self {
            attribute_id,
            title,
            numeric_value,
            display_value: None,
            quality: None,
        }
    }

    /// Create a reading, rejecting an empty channel name
    pub fn checked(attribute_id: impl Into<String>, numeric_value: f64) -> Result<Self, DomainError> {
        let attribute_id = attribute_id.into();
        if attribute_id.trim().is_empty() {
            return Err(DomainError::EmptyAttribute);
        }
        Ok(Self::new(attribute_id, numeric_value))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_display(mut self, display_value: impl Into<String>) -> Self {
        self.display_value = Some(display_value.into());
        self
    }

    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Display string, falling back to the numeric value
    pub fn display(&self) -> String {
        self.display_value
            .clone()
            .unwrap_or_else(|| self.numeric_value.to_string())
    }
}

/// Capitalise a channel name for display: `salinity` -> `Salinity`
pub fn channel_title(attribute_id: &str) -> String {
    let mut chars = attribute_id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Coarse rating of a data quality score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityLevel {
    /// Below 70%: use with caution
    Poor,
    /// 70% to below 90%: acceptable with some limitations
    Good,
    /// 90% and above
    Excellent,
}

impl QualityLevel {
    pub fn from_percent(quality: f64) -> Self {
        if quality >= 90.0 {
            Self::Excellent
        } else if quality >= 70.0 {
            Self::Good
        } else {
            Self::Poor
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "High quality data with minimal uncertainty",
            Self::Good => "Acceptable data quality with some limitations",
            Self::Poor => "Low quality data, use with caution",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => write!(f, "Excellent"),
            Self::Good => write!(f, "Good"),
            Self::Poor => write!(f, "Poor"),
        }
    }
}
