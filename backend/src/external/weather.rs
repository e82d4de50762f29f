//! Weather API client for fetching weather data
//!
//! Integrates with the Tomorrow.io v4 API for daily forecasts, realtime
//! conditions, governmental disaster events and flood risk timelines.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shared::{validate_humidity, DailyForecast, GpsCoordinates, WeatherSnapshot};

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

/// Fields requested for the daily forecast timeline
const DAILY_FIELDS: &str = "temperature,humidity,weatherCode";

/// Fields requested for the flood timeline
const FLOOD_FIELDS: &str = "floodRiskIndex,precipitationIntensity,precipitationAccumulation";

/// Event insights relevant to tea estates
const EVENT_INSIGHTS: &str = "tropical,flood,wind,winter,temperature,other";

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// A governmental weather event relayed by Tomorrow.io
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEvent {
    pub event_id: Option<String>,
    pub insight: String,
    pub severity: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// One day of the flood risk timeline
#[derive(Debug, Clone, PartialEq)]
pub struct FloodInterval {
    pub start_time: DateTime<Utc>,
    pub flood_risk_index: Option<f64>,
    /// mm/hr
    pub precipitation_intensity: f64,
    /// mm
    pub precipitation_accumulation: f64,
}

/// Tomorrow.io timeline response
#[derive(Debug, Deserialize)]
struct TimelinesResponse<V> {
    #[serde(default = "Option::default")]
    data: Option<TimelinesData<V>>,
}

#[derive(Debug, Deserialize)]
struct TimelinesData<V> {
    #[serde(default = "Vec::new")]
    timelines: Vec<Timeline<V>>,
}

#[derive(Debug, Deserialize)]
struct Timeline<V> {
    #[serde(default = "Vec::new")]
    intervals: Vec<Interval<V>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Interval<V> {
    start_time: DateTime<Utc>,
    values: V,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyValues {
    #[serde(default, alias = "temperatureAvg")]
    temperature: Option<f64>,
    #[serde(default, alias = "humidityAvg")]
    humidity: Option<f64>,
    #[serde(default, alias = "weatherCodeMax")]
    weather_code: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FloodValues {
    #[serde(default)]
    flood_risk_index: Option<f64>,
    #[serde(default)]
    precipitation_intensity: Option<f64>,
    #[serde(default)]
    precipitation_accumulation: Option<f64>,
}

/// Tomorrow.io realtime response
#[derive(Debug, Deserialize)]
struct RealtimeResponse {
    data: RealtimeData,
}

#[derive(Debug, Deserialize)]
struct RealtimeData {
    values: RealtimeValues,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RealtimeValues {
    #[serde(default)]
    temperature: Option<f64>,
    #[serde(default)]
    humidity: Option<f64>,
    /// m/s in metric units
    #[serde(default)]
    wind_speed: Option<f64>,
    #[serde(default)]
    pressure_surface_level: Option<f64>,
    #[serde(default)]
    precipitation_intensity: Option<f64>,
    #[serde(default)]
    weather_code: Option<u32>,
}

/// Tomorrow.io events response
#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    data: Option<EventsData>,
}

#[derive(Debug, Deserialize)]
struct EventsData {
    #[serde(default)]
    events: Vec<EventItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventItem {
    #[serde(default)]
    event_id: Option<String>,
    #[serde(default)]
    insight: String,
    #[serde(default)]
    severity: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<EventLocation>,
    #[serde(default)]
    start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct EventLocation {
    #[serde(default)]
    name: Option<String>,
}

impl WeatherClient {
    /// Create a new WeatherClient from configuration
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Create a new WeatherClient with custom base URL (for testing)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    /// Fetch the daily forecast timeline, oldest day first
    pub async fn get_daily_forecast(
        &self,
        coordinates: GpsCoordinates,
        days: usize,
    ) -> AppResult<Vec<DailyForecast>> {
        let data: TimelinesResponse<DailyValues> = self
            .get_json(
                "timelines",
                &[
                    ("location", coordinates.to_string()),
                    ("fields", DAILY_FIELDS.to_string()),
                    ("timesteps", "1d".to_string()),
                    ("units", "metric".to_string()),
                ],
            )
            .await?;

        let mut forecast = convert_daily_timeline(data);
        forecast.truncate(days);
        Ok(forecast)
    }

    /// Fetch current conditions, normalized for the live alert rules
    pub async fn get_realtime(&self, coordinates: GpsCoordinates) -> AppResult<WeatherSnapshot> {
        let data: RealtimeResponse = self
            .get_json(
                "weather/realtime",
                &[
                    ("location", coordinates.to_string()),
                    ("units", "metric".to_string()),
                ],
            )
            .await?;

        convert_realtime(data)
    }

    /// Fetch active governmental events within `buffer_km` of a point
    pub async fn get_events(
        &self,
        coordinates: GpsCoordinates,
        buffer_km: u32,
    ) -> AppResult<Vec<ProviderEvent>> {
        let data: EventsResponse = self
            .get_json(
                "events",
                &[
                    ("location", coordinates.to_string()),
                    ("bufferDistance", buffer_km.to_string()),
                    ("insights", EVENT_INSIGHTS.to_string()),
                ],
            )
            .await?;

        Ok(convert_events(data))
    }

    /// Fetch the daily flood risk timeline
    pub async fn get_flood_timeline(
        &self,
        coordinates: GpsCoordinates,
    ) -> AppResult<Vec<FloodInterval>> {
        let data: TimelinesResponse<FloodValues> = self
            .get_json(
                "timelines",
                &[
                    ("location", coordinates.to_string()),
                    ("fields", FLOOD_FIELDS.to_string()),
                    ("timesteps", "1d".to_string()),
                    ("units", "metric".to_string()),
                ],
            )
            .await?;

        Ok(convert_flood_timeline(data))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Weather API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse weather response: {}", e)))
    }
}

/// Intervals of the first timeline, if any
fn first_timeline<V>(data: TimelinesResponse<V>) -> Vec<Interval<V>> {
    data.data
        .and_then(|d| d.timelines.into_iter().next())
        .map(|t| t.intervals)
        .unwrap_or_default()
}

/// Convert a daily timeline to forecast days.
///
/// Out-of-range humidity is dropped, so the day is treated as malformed
/// rather than misclassified.
fn convert_daily_timeline(data: TimelinesResponse<DailyValues>) -> Vec<DailyForecast> {
    first_timeline(data)
        .into_iter()
        .map(|interval| DailyForecast {
            date: interval.start_time.date_naive(),
            temperature: interval.values.temperature,
            humidity: interval
                .values
                .humidity
                .filter(|h| validate_humidity(*h).is_ok()),
            weather_code: interval.values.weather_code,
            conditions: None,
        })
        .collect()
}

/// Convert a realtime response to a snapshot in km/h
fn convert_realtime(data: RealtimeResponse) -> AppResult<WeatherSnapshot> {
    let values = data.data.values;

    let temperature = values.temperature.ok_or_else(|| {
        AppError::ExternalService("Realtime response missing temperature".to_string())
    })?;
    let humidity = values
        .humidity
        .filter(|h| validate_humidity(*h).is_ok())
        .ok_or_else(|| AppError::ExternalService("Realtime response missing humidity".to_string()))?;

    // A missing reading is NaN so it fails every threshold comparison
    Ok(WeatherSnapshot {
        wind_speed: values.wind_speed.unwrap_or(f64::NAN) * 3.6,
        humidity,
        precipitation: values.precipitation_intensity.unwrap_or(f64::NAN),
        temperature,
        pressure: values.pressure_surface_level.unwrap_or(f64::NAN),
        condition: values
            .weather_code
            .map(condition_for_weather_code)
            .unwrap_or_default()
            .to_string(),
    })
}

fn convert_events(data: EventsResponse) -> Vec<ProviderEvent> {
    data.data
        .map(|d| d.events)
        .unwrap_or_default()
        .into_iter()
        .map(|event| ProviderEvent {
            event_id: event.event_id,
            insight: event.insight,
            severity: event.severity,
            title: event.title,
            description: event.description,
            location_name: event.location.and_then(|l| l.name),
            start_time: event.start_time,
            end_time: event.end_time,
        })
        .collect()
}

fn convert_flood_timeline(data: TimelinesResponse<FloodValues>) -> Vec<FloodInterval> {
    first_timeline(data)
        .into_iter()
        .map(|interval| FloodInterval {
            start_time: interval.start_time,
            flood_risk_index: interval.values.flood_risk_index,
            precipitation_intensity: interval.values.precipitation_intensity.unwrap_or(0.0),
            precipitation_accumulation: interval.values.precipitation_accumulation.unwrap_or(0.0),
        })
        .collect()
}

/// Map a Tomorrow.io weather code to a condition name
pub fn condition_for_weather_code(code: u32) -> &'static str {
    match code {
        1000 | 1100 => "clear",
        1101 | 1102 | 1001 => "cloudy",
        2000 | 2100 => "fog",
        4000 => "drizzle",
        4200 => "light_rain",
        4001 => "rain",
        4201 => "heavy_rain",
        5000..=5101 => "snow",
        6000..=6201 => "freezing_rain",
        7000..=7102 => "ice_pellets",
        8000 => "thunderstorm",
        _ => "unknown",
    }
}
