//! Common types used across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// GPS coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GpsCoordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build coordinates from decimal degrees as received from map clicks
    pub fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Decimal::from_f64_retain(latitude).unwrap_or_default(),
            longitude: Decimal::from_f64_retain(longitude).unwrap_or_default(),
        }
    }

    /// Round both axes to `dp` decimal places.
    ///
    /// Two decimal places is roughly a 1 km grid, which is what forecast
    /// caching keys on.
    pub fn rounded(&self, dp: u32) -> Self {
        Self {
            latitude: self.latitude.round_dp(dp),
            longitude: self.longitude.round_dp(dp),
        }
    }

}

impl std::fmt::Display for GpsCoordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Error returned when parsing an enum from its wire name fails
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
