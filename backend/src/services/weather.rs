//! Weather service for disease risk and live weather alerts

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use shared::{
    assess_blister_blight_risk, generate_weather_alerts, is_chronological, AlertRecord,
    DailyForecast, GpsCoordinates, RiskAssessment, WeatherSnapshot,
};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::WeatherClient;

/// Weather service for managing weather data
#[derive(Clone)]
pub struct WeatherService {
    weather_client: Option<WeatherClient>,
    forecasts: Cache<GpsCoordinates, Arc<Vec<DailyForecast>>>,
    forecast_days: usize,
    coordinate_precision: u32,
}

impl WeatherService {
    /// Create a new WeatherService; provider calls are disabled without an API key
    pub fn new(config: &Config) -> AppResult<Self> {
        let weather_client = if config.weather.api_key.is_empty() {
            tracing::warn!("No weather API key configured, live weather is disabled");
            None
        } else {
            Some(WeatherClient::new(&config.weather)?)
        };

        Ok(Self::build(weather_client, config))
    }

    /// Create a WeatherService around an existing client
    pub fn with_client(client: WeatherClient, config: &Config) -> Self {
        Self::build(Some(client), config)
    }

    fn build(weather_client: Option<WeatherClient>, config: &Config) -> Self {
        let forecasts = Cache::builder()
            .max_capacity(config.cache.max_capacity)
            .time_to_live(Duration::from_secs(config.cache.ttl_seconds))
            .build();

        Self {
            weather_client,
            forecasts,
            forecast_days: config.weather.forecast_days,
            coordinate_precision: config.cache.coordinate_precision,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.weather_client.is_some()
    }

    pub fn cached_locations(&self) -> u64 {
        self.forecasts.entry_count()
    }

    fn client(&self) -> AppResult<&WeatherClient> {
        self.weather_client
            .as_ref()
            .ok_or(AppError::WeatherServiceUnavailable)
    }

    // ========================================================================
    // Forecasts
    // ========================================================================

    /// Fetch the daily forecast (from cache or API)
    pub async fn get_forecast(
        &self,
        coordinates: GpsCoordinates,
    ) -> AppResult<Arc<Vec<DailyForecast>>> {
        let key = coordinates.rounded(self.coordinate_precision);

        // Check cache first
        if let Some(cached) = self.forecasts.get(&key).await {
            tracing::debug!("Cache hit for forecast at {}", key);
            return Ok(cached);
        }

        // Fetch from API
        let forecast = self
            .client()?
            .get_daily_forecast(key, self.forecast_days)
            .await?;
        let forecast = Arc::new(forecast);

        // Cache the result
        self.forecasts.insert(key, forecast.clone()).await;

        Ok(forecast)
    }

    // ========================================================================
    // Blister Blight Risk
    // ========================================================================

    /// Assess Blister Blight risk for a location.
    ///
    /// Never fails: provider problems degrade to a LOW assessment whose details
    /// explain why no forecast was analysed.
    pub async fn get_risk_assessment(&self, coordinates: GpsCoordinates) -> RiskAssessment {
        match self.get_forecast(coordinates).await {
            Ok(forecast) if forecast.is_empty() => {
                RiskAssessment::unavailable("No forecast data available for this location.")
            }
            Ok(forecast) => assess_blister_blight_risk(&forecast),
            Err(e) => {
                tracing::warn!("Forecast unavailable for {}: {}", coordinates, e);
                RiskAssessment::unavailable(format!(
                    "Weather service temporarily unavailable: {}",
                    e
                ))
            }
        }
    }

    /// Assess Blister Blight risk for a caller-supplied forecast
    ///
    /// Days are evaluated in the order given; out-of-order input is only logged.
    pub fn assess_forecast(&self, forecast: &[DailyForecast]) -> RiskAssessment {
        if !is_chronological(forecast) {
            tracing::warn!(
                "Supplied forecast of {} days is out of order, evaluating as given",
                forecast.len()
            );
        }

        assess_blister_blight_risk(forecast)
    }

    // ========================================================================
    // Live Weather Alerts
    // ========================================================================

    /// Fetch current conditions and evaluate the live alert rules
    pub async fn get_live_alerts(
        &self,
        coordinates: GpsCoordinates,
        location_name: Option<&str>,
    ) -> AppResult<Vec<AlertRecord>> {
        let snapshot = self.client()?.get_realtime(coordinates).await?;
        tracing::debug!(
            "Realtime weather at {}: wind {:.1} km/h, humidity {:.0}%",
            coordinates,
            snapshot.wind_speed,
            snapshot.humidity
        );

        Ok(self.alerts_for_snapshot(&snapshot, location_name))
    }

    /// Evaluate the live alert rules against a supplied reading
    pub fn alerts_for_snapshot(
        &self,
        snapshot: &WeatherSnapshot,
        location_name: Option<&str>,
    ) -> Vec<AlertRecord> {
        let alerts = generate_weather_alerts(snapshot, location_name);
        if !alerts.is_empty() {
            tracing::info!(
                "Generated {} weather alert(s) for {}",
                alerts.len(),
                location_name.unwrap_or("unnamed location")
            );
        }
        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};
    use shared::{RiskLevel, WeatherHazard};

    fn service() -> WeatherService {
        WeatherService::new(&Config::default()).unwrap()
    }

    fn day(d: u32, temperature: f64, humidity: f64) -> DailyForecast {
        DailyForecast::new(NaiveDate::from_ymd_opt(2025, 6, d).unwrap(), temperature, humidity)
    }

    #[tokio::test]
    async fn test_risk_degrades_without_provider() {
        let service = service();
        assert!(!service.is_configured());

        let assessment = service
            .get_risk_assessment(GpsCoordinates::from_degrees(6.97, 80.78))
            .await;
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert_eq!(assessment.consecutive_risk_days, 0);
        assert!(assessment.forecast_summary.is_empty());
        assert!(assessment.details.starts_with("Weather service temporarily unavailable"));
    }

    #[tokio::test]
    async fn test_live_alerts_require_provider() {
        let result = service()
            .get_live_alerts(GpsCoordinates::from_degrees(6.97, 80.78), Some("Hatton"))
            .await;
        assert!(matches!(result, Err(AppError::WeatherServiceUnavailable)));
    }

    #[tokio::test]
    async fn test_unreachable_provider_degrades() {
        let client = WeatherClient::with_base_url("key".into(), "http://127.0.0.1:9".into());
        let service = WeatherService::with_client(client, &Config::default());

        let assessment = service
            .get_risk_assessment(GpsCoordinates::from_degrees(6.97, 80.78))
            .await;
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert_eq!(service.cached_locations(), 0);
    }

    #[test]
    fn test_assess_forecast() {
        let forecast = [day(1, 22.0, 95.0), day(2, 22.0, 95.0), day(3, 22.0, 95.0)];
        let assessment = service().assess_forecast(&forecast);
        assert_eq!(assessment.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_assess_forecast_keeps_unordered_days() {
        let forecast = [day(2, 22.0, 95.0), day(1, 22.0, 95.0), day(1, 26.0, 70.0)];
        let assessment = service().assess_forecast(&forecast);

        assert_eq!(assessment.risk_level, RiskLevel::Moderate);
        assert_eq!(assessment.consecutive_risk_days, 2);
        let dates: Vec<u32> = assessment
            .forecast_summary
            .iter()
            .map(|d| d.date.day())
            .collect();
        assert_eq!(dates, vec![2, 1, 1]);
    }

    #[test]
    fn test_alerts_for_snapshot() {
        let snapshot = WeatherSnapshot {
            wind_speed: 10.0,
            humidity: 99.0,
            precipitation: 0.0,
            temperature: 3.0,
            pressure: 1012.0,
            condition: String::new(),
        };
        let alerts = service().alerts_for_snapshot(&snapshot, Some("Nuwara Eliya"));
        let kinds: Vec<WeatherHazard> = alerts.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![WeatherHazard::Humidity, WeatherHazard::Frost]);
        assert_eq!(alerts[0].location_name.as_deref(), Some("Nuwara Eliya"));
    }
}
