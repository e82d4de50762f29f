//! WebAssembly module for the Ceylon Tea Intelligence Platform
//!
//! Provides client-side computation for:
//! - Blister Blight risk assessment
//! - Live weather alert generation
//! - The rolling alert feed shown in the dashboard banner

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use shared::{
    AlertFeed, AlertRecord, AlertSeverity, DailyForecast, WeatherSnapshot, DEFAULT_FEED_CAPACITY,
};
use wasm_bindgen::prelude::*;

/// Current time from the browser clock
fn now_utc() -> DateTime<Utc> {
    #[cfg(target_arch = "wasm32")]
    {
        DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Utc::now()
    }
}

/// Decode JSON input, warning in the browser console when it is malformed
fn decode<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| {
        let message = format!("Invalid {} JSON: {}", what, e);
        web_sys::console::warn_1(&JsValue::from_str(&message));
        JsValue::from_str(&message)
    })
}

fn encode<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn assess_forecast_json(forecast: &[DailyForecast]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&shared::assess_blister_blight_risk(forecast))
}

fn alerts_json(
    snapshot: &WeatherSnapshot,
    location_name: Option<&str>,
    at: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&shared::generate_weather_alerts_at(snapshot, location_name, at))
}

/// Assess Blister Blight risk from a JSON array of daily forecasts
#[wasm_bindgen]
pub fn assess_blister_blight_risk(forecast_json: &str) -> Result<String, JsValue> {
    let forecast: Vec<DailyForecast> = decode(forecast_json, "forecast")?;
    assess_forecast_json(&forecast).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Generate live weather alerts from a JSON weather reading
#[wasm_bindgen]
pub fn generate_weather_alerts(
    snapshot_json: &str,
    location_name: Option<String>,
) -> Result<String, JsValue> {
    let snapshot: WeatherSnapshot = decode(snapshot_json, "weather")?;
    alerts_json(&snapshot, location_name.as_deref(), now_utc())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Rank of a severity name for sorting (advisory = 0 ... critical = 4)
#[wasm_bindgen]
pub fn severity_rank(name: &str) -> Option<u8> {
    name.parse::<AlertSeverity>().ok().map(|s| s.rank())
}

/// Validate map coordinates before requesting a forecast
#[wasm_bindgen]
pub fn validate_coordinates(latitude: f64, longitude: f64) -> bool {
    shared::validate_coordinates(latitude, longitude).is_ok()
}

/// Rolling weather alert feed for the dashboard banner
#[wasm_bindgen]
pub struct WeatherAlertFeed {
    feed: AlertFeed<AlertRecord>,
}

#[wasm_bindgen]
impl WeatherAlertFeed {
    #[wasm_bindgen(constructor)]
    pub fn new(capacity: Option<usize>) -> WeatherAlertFeed {
        WeatherAlertFeed {
            feed: AlertFeed::new(capacity.unwrap_or(DEFAULT_FEED_CAPACITY)),
        }
    }

    /// Insert one JSON alert; false when the same hazard is already shown
    pub fn insert(&mut self, alert_json: &str) -> Result<bool, JsValue> {
        let alert: AlertRecord = decode(alert_json, "alert")?;
        Ok(self.feed.insert(alert))
    }

    /// Insert a JSON array of alerts, returning how many were accepted
    pub fn extend(&mut self, alerts_json: &str) -> Result<usize, JsValue> {
        let alerts: Vec<AlertRecord> = decode(alerts_json, "alerts")?;
        Ok(self.feed.extend(alerts))
    }

    pub fn dismiss(&mut self, id: &str) -> bool {
        self.feed.dismiss(id)
    }

    /// Drop alerts older than `ttl_minutes`
    pub fn expire(&mut self, ttl_minutes: u32) -> usize {
        self.feed
            .expire(now_utc(), Duration::minutes(i64::from(ttl_minutes)))
    }

    pub fn clear(&mut self) {
        self.feed.clear();
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.feed.len()
    }

    #[wasm_bindgen(js_name = highestSeverity)]
    pub fn highest_severity(&self) -> Option<String> {
        self.feed.highest_severity().map(|s| s.to_string())
    }

    #[wasm_bindgen(js_name = toJSON)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        encode(&self.feed.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn snapshot(wind_speed: f64, temperature: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            wind_speed,
            humidity: 70.0,
            precipitation: 1.0,
            temperature,
            pressure: 1010.0,
            condition: String::new(),
        }
    }

    #[test]
    fn test_assess_forecast_json() {
        let forecast: Vec<DailyForecast> = (1..=3)
            .map(|d| DailyForecast::new(NaiveDate::from_ymd_opt(2025, 6, d).unwrap(), 21.0, 94.0))
            .collect();
        let json: serde_json::Value =
            serde_json::from_str(&assess_forecast_json(&forecast).unwrap()).unwrap();
        assert_eq!(json["risk_level"], "HIGH");
        assert_eq!(json["consecutive_risk_days"], 3);
    }

    #[test]
    fn test_alerts_json_uses_camel_case() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&alerts_json(&snapshot(70.0, 20.0), Some("Ella"), at).unwrap())
                .unwrap();
        assert_eq!(json[0]["type"], "cyclone");
        assert_eq!(json[0]["severity"], "danger");
        assert_eq!(json[0]["locationName"], "Ella");
    }

    #[test]
    fn test_severity_rank() {
        assert_eq!(severity_rank("advisory"), Some(0));
        assert_eq!(severity_rank("Critical"), Some(4));
        assert_eq!(severity_rank("apocalyptic"), None);
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(6.9497, 80.7891));
        assert!(!validate_coordinates(95.0, 80.0));
    }

    #[test]
    fn test_feed_round_trip() {
        let at = now_utc();
        let alerts = alerts_json(&snapshot(85.0, 2.0), Some("Hatton"), at).unwrap();

        let mut feed = WeatherAlertFeed::new(Some(5));
        assert_eq!(feed.extend(&alerts).unwrap(), 2);
        assert_eq!(feed.extend(&alerts).unwrap(), 0);
        assert_eq!(feed.length(), 2);
        assert_eq!(feed.highest_severity().as_deref(), Some("critical"));
        assert_eq!(feed.expire(60), 0);

        let shown: Vec<AlertRecord> = serde_json::from_str(&feed.to_json().unwrap()).unwrap();
        // Newest first: frost was inserted after the cyclone
        assert_eq!(shown[0].kind, shared::WeatherHazard::Frost);
        assert!(feed.dismiss(&shown[0].id));
        assert_eq!(feed.length(), 1);
    }
}
