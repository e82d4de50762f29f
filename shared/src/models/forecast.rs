//! Daily forecast models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Icon shown when neither the weather code nor the summary text is recognised
pub const DEFAULT_WEATHER_ICON: &str = "🌤️";

/// Daily weather forecast as delivered by the weather provider
///
/// Temperature and humidity are optional because upstream payloads are not
/// always complete; a day missing either value never counts as a risk day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    /// Tomorrow.io weather code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_code: Option<u32>,
    /// Free-text condition summary ("Light rain", "Partly cloudy", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
}

impl DailyForecast {
    pub fn new(date: NaiveDate, temperature: f64, humidity: f64) -> Self {
        Self {
            date,
            temperature: Some(temperature),
            humidity: Some(humidity),
            weather_code: None,
            conditions: None,
        }
    }

    pub fn with_weather_code(mut self, code: u32) -> Self {
        self.weather_code = Some(code);
        self
    }

    pub fn with_conditions(mut self, conditions: impl Into<String>) -> Self {
        self.conditions = Some(conditions.into());
        self
    }

    /// Icon for the day's implied condition
    pub fn weather_icon(&self) -> &'static str {
        weather_icon(self.weather_code, self.conditions.as_deref())
    }
}

/// One day of the forecast summary returned with a risk assessment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub weather_icon: String,
    pub is_risk_day: bool,
}

/// Map a Tomorrow.io weather code to an icon
///
/// See <https://docs.tomorrow.io/reference/data-layers-weather-codes>
pub fn icon_for_weather_code(code: u32) -> Option<&'static str> {
    let icon = match code {
        1000 => "☀️",
        1100 => "🌤️",
        1101 => "⛅",
        1001 | 1102 => "☁️",
        2000 | 2100 => "🌫️",
        4000 | 4001 | 4200 | 4201 => "🌧️",
        5000 | 5001 | 5100 | 5101 => "❄️",
        6000 | 6001 | 6200 | 6201 => "🌧️❄️",
        7000 | 7101 | 7102 => "🧊",
        8000 => "⛈️",
        _ => return None,
    };
    Some(icon)
}

/// Map a free-text condition summary to an icon
pub fn icon_for_conditions(summary: &str) -> Option<&'static str> {
    let summary = summary.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| summary.contains(w));

    if has(&["storm", "thunder"]) {
        Some("⛈️")
    } else if has(&["rain", "shower", "drizzle"]) {
        Some("🌧️")
    } else if has(&["fog", "mist"]) {
        Some("🌫️")
    } else if has(&["cloud", "overcast"]) {
        Some("☁️")
    } else if has(&["sun", "clear"]) {
        Some("☀️")
    } else {
        None
    }
}

/// Resolve a day's icon: weather code first, then summary text, then the default
pub fn weather_icon(weather_code: Option<u32>, conditions: Option<&str>) -> &'static str {
    weather_code
        .and_then(icon_for_weather_code)
        .or_else(|| conditions.and_then(icon_for_conditions))
        .unwrap_or(DEFAULT_WEATHER_ICON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_code_icons() {
        assert_eq!(icon_for_weather_code(1000), Some("☀️"));
        assert_eq!(icon_for_weather_code(4201), Some("🌧️"));
        assert_eq!(icon_for_weather_code(8000), Some("⛈️"));
        assert_eq!(icon_for_weather_code(9999), None);
    }

    #[test]
    fn test_condition_icons() {
        assert_eq!(icon_for_conditions("Light rain"), Some("🌧️"));
        assert_eq!(icon_for_conditions("Thunderstorm with rain"), Some("⛈️"));
        assert_eq!(icon_for_conditions("Partly cloudy"), Some("☁️"));
        assert_eq!(icon_for_conditions("Mostly sunny"), Some("☀️"));
        assert_eq!(icon_for_conditions("Morning mist"), Some("🌫️"));
        assert_eq!(icon_for_conditions("Windy"), None);
    }

    #[test]
    fn test_icon_precedence() {
        // Code wins over text
        assert_eq!(weather_icon(Some(1000), Some("rain")), "☀️");
        // Unknown code falls back to text
        assert_eq!(weather_icon(Some(42), Some("rain")), "🌧️");
        assert_eq!(weather_icon(None, None), DEFAULT_WEATHER_ICON);
    }

    #[test]
    fn test_missing_fields_deserialize() {
        let day: DailyForecast = serde_json::from_str(r#"{"date":"2025-06-01"}"#).unwrap();
        assert_eq!(day.temperature, None);
        assert_eq!(day.humidity, None);
        assert_eq!(day.weather_icon(), DEFAULT_WEATHER_ICON);
    }
}
