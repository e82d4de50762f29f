//! Validation utilities for the Ceylon Tea Intelligence Platform
//!
//! The evaluators accept any input and degrade gracefully. These checks are for
//! service boundaries, where a bad coordinate should be rejected before a
//! provider call is made.

use crate::models::DailyForecast;

// ============================================================================
// Location Validations
// ============================================================================

/// Validate latitude/longitude are finite and on the globe
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), &'static str> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Check if a point falls in Sri Lanka's tea-growing bounding box
pub fn is_in_sri_lanka(latitude: f64, longitude: f64) -> bool {
    (5.85..=9.9).contains(&latitude) && (79.5..=81.9).contains(&longitude)
}

// ============================================================================
// Forecast Validations
// ============================================================================

/// Check that forecast days are strictly chronological.
///
/// The risk assessor does not reorder input, so callers assembling forecasts
/// from several sources should check this first.
pub fn is_chronological(forecast: &[DailyForecast]) -> bool {
    forecast.windows(2).all(|pair| pair[0].date < pair[1].date)
}

/// Validate a humidity reading is a percentage
pub fn validate_humidity(humidity: f64) -> Result<(), &'static str> {
    if !(0.0..=100.0).contains(&humidity) {
        return Err("Humidity must be between 0 and 100%");
    }
    Ok(())
}
