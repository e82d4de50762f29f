//! Live weather alerts derived from a point-in-time weather reading

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::hazard::{evaluate_catalogue, AlertSeverity, Finding, HazardCatalogue};
use crate::types::ParseError;

/// One live weather reading, in normalized units
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// km/h
    pub wind_speed: f64,
    /// %
    pub humidity: f64,
    /// mm
    pub precipitation: f64,
    /// °C
    pub temperature: f64,
    /// hPa
    pub pressure: f64,
    #[serde(default)]
    pub condition: String,
}

impl WeatherSnapshot {
    /// Condition name normalized to snake_case ("Heavy Rain" -> "heavy_rain")
    pub fn normalized_condition(&self) -> String {
        self.condition
            .trim()
            .to_lowercase()
            .replace([' ', '-'], "_")
    }
}

/// Live weather hazard catalogue
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WeatherHazard {
    Cyclone,
    HeavyRain,
    Drought,
    Humidity,
    Frost,
    HeatWave,
}

impl FromStr for WeatherHazard {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WeatherHazard::CATALOGUE
            .iter()
            .copied()
            .find(|hazard| hazard.code() == s)
            .ok_or_else(|| ParseError::new("weather hazard", s))
    }
}

impl HazardCatalogue for WeatherHazard {
    type Input = WeatherSnapshot;

    const CATALOGUE: &'static [Self] = &[
        WeatherHazard::Cyclone,
        WeatherHazard::HeavyRain,
        WeatherHazard::Drought,
        WeatherHazard::Humidity,
        WeatherHazard::Frost,
        WeatherHazard::HeatWave,
    ];

    fn code(self) -> &'static str {
        match self {
            WeatherHazard::Cyclone => "cyclone",
            WeatherHazard::HeavyRain => "heavy_rain",
            WeatherHazard::Drought => "drought",
            WeatherHazard::Humidity => "humidity",
            WeatherHazard::Frost => "frost",
            WeatherHazard::HeatWave => "heat_wave",
        }
    }

    fn assess(self, s: &WeatherSnapshot) -> Option<Finding<Self>> {
        let (severity, title, message) = match self {
            WeatherHazard::Cyclone => {
                if !(s.wind_speed > 60.0 || (s.wind_speed > 40.0 && s.pressure < 1000.0)) {
                    return None;
                }
                let severity = if s.wind_speed > 80.0 {
                    AlertSeverity::Critical
                } else if s.wind_speed > 60.0 {
                    AlertSeverity::Danger
                } else {
                    AlertSeverity::Warning
                };
                (
                    severity,
                    "Cyclone Warning",
                    format!(
                        "Cyclonic winds of {:.0} km/h with pressure at {:.0} hPa. \
                         Secure loose structures and move workers to designated shelters.",
                        s.wind_speed, s.pressure
                    ),
                )
            }
            WeatherHazard::HeavyRain => {
                if !(s.precipitation > 50.0 || s.normalized_condition() == "heavy_rain") {
                    return None;
                }
                let severity = if s.precipitation > 100.0 {
                    AlertSeverity::Critical
                } else {
                    AlertSeverity::Warning
                };
                (
                    severity,
                    "Heavy Rain Alert",
                    format!(
                        "{:.1} mm of rainfall recorded. Delay field operations, \
                         cover harvested leaf and check drainage channels.",
                        s.precipitation
                    ),
                )
            }
            WeatherHazard::Drought => {
                if !(s.precipitation == 0.0 && s.temperature > 35.0 && s.humidity < 40.0) {
                    return None;
                }
                (
                    AlertSeverity::Warning,
                    "Drought Conditions",
                    format!(
                        "No rainfall with {:.1}°C and {:.0}% humidity. \
                         Increase irrigation and mulch to retain soil moisture.",
                        s.temperature, s.humidity
                    ),
                )
            }
            WeatherHazard::Humidity => {
                if !(s.humidity > 95.0) {
                    return None;
                }
                let severity = if s.humidity > 98.0 {
                    AlertSeverity::Danger
                } else {
                    AlertSeverity::Warning
                };
                (
                    severity,
                    "Extreme Humidity",
                    format!(
                        "Humidity at {:.0}%. Fungal disease pressure is high; \
                         inspect bushes for early Blister Blight lesions.",
                        s.humidity
                    ),
                )
            }
            WeatherHazard::Frost => {
                if !(s.temperature < 4.0) {
                    return None;
                }
                let severity = if s.temperature < 0.0 {
                    AlertSeverity::Danger
                } else {
                    AlertSeverity::Warning
                };
                (
                    severity,
                    "Frost Warning",
                    format!(
                        "Temperature down to {:.1}°C. Protect young flush and nursery plants.",
                        s.temperature
                    ),
                )
            }
            WeatherHazard::HeatWave => {
                if !(s.temperature > 38.0) {
                    return None;
                }
                let severity = if s.temperature > 42.0 {
                    AlertSeverity::Critical
                } else {
                    AlertSeverity::Danger
                };
                (
                    severity,
                    "Heat Wave",
                    format!(
                        "Temperature reached {:.1}°C. Move plucking to early morning \
                         and keep workers hydrated.",
                        s.temperature
                    ),
                )
            }
        };

        Some(Finding {
            kind: self,
            severity,
            title: title.to_string(),
            message,
        })
    }
}

/// An alert record handed to the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord<K = WeatherHazard> {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: K,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<K: HazardCatalogue> AlertRecord<K> {
    /// Stamp a finding with its id, location and generation time
    pub fn from_finding(
        finding: Finding<K>,
        location_name: Option<&str>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("{}_{}", finding.kind.code(), generated_at.timestamp_millis()),
            kind: finding.kind,
            severity: finding.severity,
            title: finding.title,
            message: finding.message,
            location_name: location_name.map(str::to_string),
            timestamp: generated_at,
        }
    }
}

/// Evaluate the live weather catalogue, stamping records with the current time
pub fn generate_weather_alerts(
    snapshot: &WeatherSnapshot,
    location_name: Option<&str>,
) -> Vec<AlertRecord> {
    generate_weather_alerts_at(snapshot, location_name, Utc::now())
}

/// Evaluate the live weather catalogue with an explicit generation time.
///
/// Records come back in catalogue order regardless of severity.
pub fn generate_weather_alerts_at(
    snapshot: &WeatherSnapshot,
    location_name: Option<&str>,
    generated_at: DateTime<Utc>,
) -> Vec<AlertRecord> {
    evaluate_catalogue::<WeatherHazard>(snapshot)
        .into_iter()
        .map(|finding| AlertRecord::from_finding(finding, location_name, generated_at))
        .collect()
}
