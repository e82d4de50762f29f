//! HTTP request handlers

pub mod alerts;
pub mod health;
pub mod weather;

pub use alerts::*;
pub use health::*;
pub use weather::*;

use serde::Deserialize;
use shared::{is_in_sri_lanka, validate_coordinates, GpsCoordinates};

use crate::error::{AppError, AppResult};

/// Query parameters for a map location
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub lat: f64,
    pub lon: f64,
    pub location_name: Option<String>,
}

impl LocationQuery {
    /// Validate the query and convert it to coordinates
    pub fn coordinates(&self) -> AppResult<GpsCoordinates> {
        validate_coordinates(self.lat, self.lon).map_err(|message| {
            let field = if message.starts_with("Latitude") { "lat" } else { "lon" };
            AppError::validation(field, message)
        })?;

        if !is_in_sri_lanka(self.lat, self.lon) {
            tracing::debug!("Location {},{} is outside Sri Lanka", self.lat, self.lon);
        }

        Ok(GpsCoordinates::from_degrees(self.lat, self.lon))
    }
}
