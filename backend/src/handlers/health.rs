//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub weather_provider: String,
    pub cached_forecasts: u64,
}

#[derive(Serialize)]
pub struct ServiceHealth {
    pub status: &'static str,
    pub service: &'static str,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let weather_provider = if state.weather.is_configured() {
        "configured"
    } else {
        "not_configured"
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        weather_provider: weather_provider.to_string(),
        cached_forecasts: state.weather.cached_locations(),
    })
}

/// Health check for the weather endpoints
pub async fn weather_health() -> Json<ServiceHealth> {
    Json(ServiceHealth {
        status: "healthy",
        service: "weather-api",
    })
}

/// Health check for the disaster alert endpoints
pub async fn alerts_health() -> Json<ServiceHealth> {
    Json(ServiceHealth {
        status: "healthy",
        service: "disaster-alerts",
    })
}
