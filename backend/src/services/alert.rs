//! Disaster alert service
//!
//! Combines governmental events relayed by the weather provider with the
//! platform's own flood and landslide rules.

use chrono::{DateTime, Utc};
use shared::{
    evaluate_catalogue, map_event_type, map_severity, recommendations, AlertSource,
    DisasterAlert, DisasterConditions, DisasterKind, GpsCoordinates, FLOOD_INDEX_THRESHOLD,
};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::{FloodInterval, ProviderEvent, WeatherClient};

/// Days of the flood timeline scanned for a high flood index
const FLOOD_LOOKAHEAD_DAYS: usize = 5;

/// Days of rainfall summed for the landslide rule
const LANDSLIDE_WINDOW_DAYS: usize = 3;

/// Radius used for provider events (km)
const EVENT_RADIUS_KM: f64 = 100.0;

/// Radius used for locally computed alerts (km)
const LOCAL_RADIUS_KM: f64 = 50.0;

/// Disaster alert service
#[derive(Clone)]
pub struct AlertService {
    weather_client: Option<WeatherClient>,
    event_buffer_km: u32,
}

impl AlertService {
    pub fn new(config: &Config) -> AppResult<Self> {
        let weather_client = if config.weather.api_key.is_empty() {
            None
        } else {
            Some(WeatherClient::new(&config.weather)?)
        };

        Ok(Self {
            weather_client,
            event_buffer_km: config.weather.event_buffer_km,
        })
    }

    pub fn with_client(client: WeatherClient, config: &Config) -> Self {
        Self {
            weather_client: Some(client),
            event_buffer_km: config.weather.event_buffer_km,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.weather_client.is_some()
    }

    /// Get all active disaster alerts for a location.
    ///
    /// A failure of one source is logged and the other source's alerts are
    /// still returned.
    pub async fn get_active_alerts(
        &self,
        coordinates: GpsCoordinates,
    ) -> AppResult<Vec<DisasterAlert>> {
        let client = self
            .weather_client
            .as_ref()
            .ok_or(AppError::WeatherServiceUnavailable)?;
        let coordinates = coordinates.rounded(4);
        let now = Utc::now();

        let mut alerts = Vec::new();

        match client.get_events(coordinates, self.event_buffer_km).await {
            Ok(events) => alerts.extend(
                events
                    .into_iter()
                    .map(|event| alert_from_event(event, coordinates, now)),
            ),
            Err(e) => tracing::warn!("Error fetching disaster events: {}", e),
        }

        match client.get_flood_timeline(coordinates).await {
            Ok(intervals) => alerts.extend(alerts_from_flood_timeline(&intervals, coordinates)),
            Err(e) => tracing::warn!("Error fetching flood risk: {}", e),
        }

        tracing::info!("{} active disaster alert(s) near {}", alerts.len(), coordinates);
        Ok(alerts)
    }
}

/// Map a provider event onto a disaster alert
fn alert_from_event(
    event: ProviderEvent,
    coordinates: GpsCoordinates,
    now: DateTime<Utc>,
) -> DisasterAlert {
    let kind = map_event_type(&event.insight);
    let severity = map_severity(&event.severity);
    let start_time = event.start_time.unwrap_or(now);

    DisasterAlert {
        id: event
            .event_id
            .unwrap_or_else(|| format!("evt_{}", start_time.timestamp_millis())),
        kind,
        severity,
        title: event.title.unwrap_or_else(|| "Weather Alert".to_string()),
        description: event
            .description
            .unwrap_or_else(|| "No description available".to_string()),
        affected_regions: vec![event.location_name.unwrap_or_else(|| "Unknown".to_string())],
        start_time,
        end_time: event.end_time,
        coordinates,
        radius_km: EVENT_RADIUS_KM,
        source: AlertSource::Tomorrowio,
        recommendations: recommendations(kind, severity),
    }
}

/// Summarize the flood timeline into rule inputs.
///
/// The flood index is taken from the first day within the lookahead that
/// crosses the threshold, falling back to the peak index. Returns the
/// conditions together with the start of the day the index came from.
fn conditions_from_flood_timeline(
    intervals: &[FloodInterval],
) -> Option<(DisasterConditions, DateTime<Utc>)> {
    let first = intervals.first()?;
    let lookahead = &intervals[..intervals.len().min(FLOOD_LOOKAHEAD_DAYS)];

    let flood_day = lookahead
        .iter()
        .find(|i| i.flood_risk_index.is_some_and(|x| x > FLOOD_INDEX_THRESHOLD))
        .unwrap_or(first);

    let window = &intervals[..intervals.len().min(LANDSLIDE_WINDOW_DAYS)];
    let conditions = DisasterConditions {
        flood_risk_index: flood_day.flood_risk_index,
        precipitation_intensity_mm: window
            .iter()
            .map(|i| i.precipitation_intensity)
            .fold(0.0, f64::max),
        precipitation_3day_mm: window.iter().map(|i| i.precipitation_accumulation).sum(),
        ..Default::default()
    };

    Some((conditions, flood_day.start_time))
}

/// Evaluate the flood and landslide rules against a flood timeline
fn alerts_from_flood_timeline(
    intervals: &[FloodInterval],
    coordinates: GpsCoordinates,
) -> Vec<DisasterAlert> {
    let Some((conditions, flood_start)) = conditions_from_flood_timeline(intervals) else {
        return Vec::new();
    };
    // Landslide exposure starts with the rain window, i.e. the first day
    let window_start = intervals[0].start_time;

    evaluate_catalogue::<DisasterKind>(&conditions)
        .into_iter()
        .map(|finding| {
            let start = match finding.kind {
                DisasterKind::Flood => flood_start,
                _ => window_start,
            };
            DisasterAlert::from_finding(finding, coordinates, start, LOCAL_RADIUS_KM)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use shared::AlertSeverity;

    fn day(offset: i64, index: Option<f64>, intensity: f64, accumulation: f64) -> FloodInterval {
        FloodInterval {
            start_time: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap() + Duration::days(offset),
            flood_risk_index: index,
            precipitation_intensity: intensity,
            precipitation_accumulation: accumulation,
        }
    }

    fn estate() -> GpsCoordinates {
        GpsCoordinates::from_degrees(6.97, 80.78).rounded(4)
    }

    #[test]
    fn test_event_mapping() {
        let now = Utc.with_ymd_and_hms(2025, 11, 27, 12, 0, 0).unwrap();
        let event = ProviderEvent {
            event_id: Some("evt-42".into()),
            insight: "tropical".into(),
            severity: "extreme".into(),
            title: Some("Cyclone Fengal".into()),
            description: None,
            location_name: Some("Central Province".into()),
            start_time: None,
            end_time: None,
        };
        let alert = alert_from_event(event, estate(), now);

        assert_eq!(alert.id, "evt-42");
        assert_eq!(alert.kind, DisasterKind::Cyclone);
        assert_eq!(alert.severity, AlertSeverity::Critical);
        assert_eq!(alert.source, AlertSource::Tomorrowio);
        assert_eq!(alert.description, "No description available");
        assert_eq!(alert.affected_regions, vec!["Central Province".to_string()]);
        assert_eq!(alert.start_time, now);
        assert_eq!(alert.radius_km, 100.0);
        assert_eq!(alert.recommendations.len(), 6);
    }

    #[test]
    fn test_event_without_id_gets_generated_one() {
        let now = Utc.with_ymd_and_hms(2025, 11, 27, 12, 0, 0).unwrap();
        let event = ProviderEvent {
            event_id: None,
            insight: "wind".into(),
            severity: "minor".into(),
            title: None,
            description: None,
            location_name: None,
            start_time: None,
            end_time: None,
        };
        let alert = alert_from_event(event, estate(), now);
        assert_eq!(alert.id, format!("evt_{}", now.timestamp_millis()));
        assert_eq!(alert.title, "Weather Alert");
        assert_eq!(alert.affected_regions, vec!["Unknown".to_string()]);
    }

    #[test]
    fn test_quiet_timeline_raises_nothing() {
        let intervals: Vec<_> = (0..5).map(|d| day(d, Some(20.0), 2.0, 10.0)).collect();
        assert!(alerts_from_flood_timeline(&intervals, estate()).is_empty());
        assert!(alerts_from_flood_timeline(&[], estate()).is_empty());
    }

    #[test]
    fn test_first_high_flood_day_is_used() {
        let intervals = vec![
            day(0, Some(30.0), 1.0, 5.0),
            day(1, Some(40.0), 1.0, 5.0),
            day(2, Some(78.0), 1.0, 5.0),
            day(3, Some(92.0), 1.0, 5.0),
        ];
        let alerts = alerts_from_flood_timeline(&intervals, estate());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, DisasterKind::Flood);
        assert_eq!(alerts[0].severity, AlertSeverity::Watch);
        assert_eq!(alerts[0].start_time, intervals[2].start_time);
        assert_eq!(alerts[0].radius_km, 50.0);
        assert_eq!(alerts[0].source, AlertSource::Custom);
    }

    #[test]
    fn test_flood_beyond_lookahead_ignored() {
        let mut intervals: Vec<_> = (0..5).map(|d| day(d, Some(10.0), 1.0, 5.0)).collect();
        intervals.push(day(5, Some(95.0), 1.0, 5.0));
        assert!(alerts_from_flood_timeline(&intervals, estate()).is_empty());
    }

    #[test]
    fn test_landslide_from_three_day_rain() {
        // 3-day total 240 mm (+40), peak 55 mm/hr (+30), default slope (+0)
        let intervals = vec![
            day(0, Some(50.0), 55.0, 120.0),
            day(1, Some(60.0), 30.0, 80.0),
            day(2, Some(65.0), 10.0, 40.0),
            day(3, Some(20.0), 80.0, 300.0),
        ];
        let (conditions, _) = conditions_from_flood_timeline(&intervals).unwrap();
        assert_eq!(conditions.precipitation_3day_mm, 240.0);
        assert_eq!(conditions.precipitation_intensity_mm, 55.0);

        let alerts = alerts_from_flood_timeline(&intervals, estate());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, DisasterKind::Landslide);
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
        assert_eq!(alerts[0].start_time, intervals[0].start_time);
    }

    #[tokio::test]
    async fn test_active_alerts_require_provider() {
        let service = AlertService::new(&Config::default()).unwrap();
        assert!(!service.is_configured());
        assert!(matches!(
            service.get_active_alerts(estate()).await,
            Err(AppError::WeatherServiceUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_provider_yields_empty_list() {
        let client = WeatherClient::with_base_url("key".into(), "http://127.0.0.1:9".into());
        let service = AlertService::with_client(client, &Config::default());
        let alerts = service.get_active_alerts(estate()).await.unwrap();
        assert!(alerts.is_empty());
    }
}
