//! Route definitions for the Ceylon Tea Intelligence Platform

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/weather", weather_routes())
        .nest("/alerts", alert_routes())
}

/// Disease risk and live weather alert routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/risk",
            get(handlers::get_risk_assessment).post(handlers::assess_forecast),
        )
        .route(
            "/alerts",
            get(handlers::get_weather_alerts).post(handlers::evaluate_weather_alerts),
        )
        .route("/health", get(handlers::weather_health))
}

/// Disaster alert routes
fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/active", get(handlers::get_active_alerts))
        .route("/health", get(handlers::alerts_health))
}
