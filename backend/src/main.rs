//! Ceylon Tea Intelligence Platform - Backend Server
//!
//! Weather intelligence for Sri Lankan tea estates: Blister Blight disease
//! risk from the daily forecast, live weather alerts and disaster alerts.

use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;
use services::{AlertService, WeatherService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub weather: WeatherService,
    pub alerts: AlertService,
}

impl AppState {
    pub fn new(config: Config) -> error::AppResult<Self> {
        Ok(Self {
            weather: WeatherService::new(&config)?,
            alerts: AlertService::new(&config)?,
            config: Arc::new(config),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cti_server=debug,tower_http=debug".into());
    let production = std::env::var("CTI_ENVIRONMENT").is_ok_and(|env| env == "production");
    if production {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Load configuration
    let config = config::Config::load()?;

    tracing::info!("Starting Ceylon Tea Intelligence Server");
    tracing::info!("Environment: {}", config.environment);

    // Create application state
    let state = AppState::new(config.clone())?;

    // Build application
    let app = create_app(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let origins: Vec<HeaderValue> = state
        .config
        .server
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(origins)
    }
    .allow_methods(Any)
    .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Ceylon Tea Intelligence Platform API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn not_found() -> error::AppError {
    error::AppError::NotFound("Route".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        create_app(AppState::new(Config::default()).unwrap())
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(get("/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["weather_provider"], "not_configured");

        let (status, body) = send(get("/api/v1/weather/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "weather-api");
    }

    #[tokio::test]
    async fn test_risk_without_provider_is_low() {
        let (status, body) = send(get("/api/v1/weather/risk?lat=6.97&lon=80.78")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["risk_level"], "LOW");
        assert_eq!(body["consecutive_risk_days"], 0);
        assert_eq!(body["forecast_summary"], json!([]));
    }

    #[tokio::test]
    async fn test_risk_rejects_bad_latitude() {
        let (status, body) = send(get("/api/v1/weather/risk?lat=123&lon=80.78")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "lat");
    }

    #[tokio::test]
    async fn test_assess_supplied_forecast() {
        let forecast = json!([
            {"date": "2025-06-01", "temperature": 26.0, "humidity": 80.0},
            {"date": "2025-06-02", "temperature": 22.0, "humidity": 93.0},
            {"date": "2025-06-03", "temperature": 21.5, "humidity": 96.0},
            {"date": "2025-06-04", "temperature": 23.0, "humidity": 91.5},
            {"date": "2025-06-05", "temperature": 24.0, "humidity": 88.0}
        ]);
        let (status, body) = send(post("/api/v1/weather/risk", forecast)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["risk_level"], "HIGH");
        assert_eq!(body["consecutive_risk_days"], 3);
        assert_eq!(body["forecast_summary"].as_array().unwrap().len(), 5);
        assert_eq!(body["forecast_summary"][1]["is_risk_day"], true);
    }

    #[tokio::test]
    async fn test_assess_forecast_in_given_order() {
        let forecast = json!([
            {"date": "2025-06-02", "temperature": 22.0, "humidity": 95.0},
            {"date": "2025-06-01", "temperature": 22.0, "humidity": 95.0}
        ]);
        let (status, body) = send(post("/api/v1/weather/risk", forecast)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["risk_level"], "MODERATE");
        assert_eq!(body["forecast_summary"][0]["date"], "2025-06-02");
    }

    #[tokio::test]
    async fn test_evaluate_supplied_snapshot() {
        let request = json!({
            "snapshot": {
                "windSpeed": 85.0,
                "humidity": 80.0,
                "precipitation": 10.0,
                "temperature": 26.0,
                "pressure": 990.0,
                "condition": "storm"
            },
            "locationName": "Kandy"
        });
        let (status, body) = send(post("/api/v1/weather/alerts", request)).await;

        assert_eq!(status, StatusCode::OK);
        let alerts = body.as_array().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0]["type"], "cyclone");
        assert_eq!(alerts[0]["severity"], "critical");
        assert_eq!(alerts[0]["locationName"], "Kandy");
    }

    #[tokio::test]
    async fn test_live_alerts_without_provider_unavailable() {
        let (status, body) = send(get("/api/v1/weather/alerts?lat=6.97&lon=80.78")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "WEATHER_SERVICE_UNAVAILABLE");

        let (status, _) = send(get("/api/v1/alerts/active?lat=6.97&lon=80.78")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, body) = send(get("/api/v1/plots")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Route not found");
    }
}
