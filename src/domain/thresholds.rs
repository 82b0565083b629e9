//! Threshold domain types
//!
//! Warning and critical bands for measurement channels, plus the validated
//! percentage used for the data quality cutoff.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// True if the value touches or leaves the interval
    ///
    /// Bounds are inclusive on the breaching side: a value equal to `min`
    /// or `max` counts as a breach.
    #[inline]
    pub fn is_breached_by(&self, value: f64) -> bool {
        value <= self.min || value >= self.max
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Warning band nested inside a wider critical band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBand {
    pub min: f64,
    pub max: f64,
    pub critical: Bounds,
}

impl ThresholdBand {
    pub const fn new(min: f64, max: f64, critical_min: f64, critical_max: f64) -> Self {
        Self {
            min,
            max,
            critical: Bounds::new(critical_min, critical_max),
        }
    }

    /// The warning band as bounds
    pub fn warning(&self) -> Bounds {
        Bounds::new(self.min, self.max)
    }

    /// Check `critical.min <= min <= max <= critical.max`
    ///
    /// Evaluation never enforces this; ill-formed bands simply produce
    /// whatever decisions the numbers imply.
    pub fn is_well_formed(&self) -> bool {
        self.critical.min <= self.min && self.min <= self.max && self.max <= self.critical.max
    }
}

impl fmt::Display for ThresholdBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warning {} critical {}", self.warning(), self.critical)
    }
}

/// Whole percentage (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Percentage(u8);

impl Percentage {
    /// Maximum valid percentage
    pub const MAX: u8 = 100;

    /// Create a new Percentage with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPercentage` if value > 100
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if value > Self::MAX {
            return Err(DomainError::InvalidPercentage(value as f64));
        }
        Ok(Self(value))
    }

    /// Create a Percentage, clamping values above 100
    pub fn saturating(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Percentage {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for u8 {
    fn from(p: Percentage) -> Self {
        p.0
    }
}
