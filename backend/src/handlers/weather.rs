//! HTTP handlers for weather risk and live alert endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::{AlertRecord, DailyForecast, RiskAssessment, WeatherSnapshot};

use super::LocationQuery;
use crate::error::AppResult;
use crate::AppState;

/// Get Blister Blight risk for a location from the provider forecast
pub async fn get_risk_assessment(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<RiskAssessment>> {
    let coordinates = query.coordinates()?;
    let assessment = state.weather.get_risk_assessment(coordinates).await;
    Ok(Json(assessment))
}

/// Assess Blister Blight risk for a supplied daily forecast
pub async fn assess_forecast(
    State(state): State<AppState>,
    Json(forecast): Json<Vec<DailyForecast>>,
) -> Json<RiskAssessment> {
    Json(state.weather.assess_forecast(&forecast))
}

/// Get live weather alerts for a location
pub async fn get_weather_alerts(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<Vec<AlertRecord>>> {
    let coordinates = query.coordinates()?;
    let alerts = state
        .weather
        .get_live_alerts(coordinates, query.location_name.as_deref())
        .await?;
    Ok(Json(alerts))
}

/// Request body for evaluating a supplied weather reading
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateAlertsRequest {
    pub snapshot: WeatherSnapshot,
    pub location_name: Option<String>,
}

/// Evaluate live weather alerts for a supplied reading
pub async fn evaluate_weather_alerts(
    State(state): State<AppState>,
    Json(input): Json<EvaluateAlertsRequest>,
) -> AppResult<Json<Vec<AlertRecord>>> {
    let alerts = state
        .weather
        .alerts_for_snapshot(&input.snapshot, input.location_name.as_deref());
    Ok(Json(alerts))
}
