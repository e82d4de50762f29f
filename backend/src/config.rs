//! Configuration management for the Ceylon Tea Intelligence Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with CTI_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Weather provider configuration
    pub weather: WeatherConfig,

    /// Forecast cache configuration
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Origins allowed to call the API; empty allows any
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Tomorrow.io API base URL
    pub api_endpoint: String,

    /// Tomorrow.io API key; provider calls are disabled when empty
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Number of forecast days fed to the risk assessor
    pub forecast_days: usize,

    /// Radius around a point to search for disaster events (km)
    pub event_buffer_km: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Forecast time-to-live in seconds
    pub ttl_seconds: u64,

    /// Maximum number of cached locations
    pub max_capacity: u64,

    /// Decimal places coordinates are rounded to for cache keys
    pub coordinate_precision: u32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("CTI_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("weather.api_endpoint", "https://api.tomorrow.io/v4")?
            .set_default("weather.api_key", "")?
            .set_default("weather.timeout_seconds", 15)?
            .set_default("weather.forecast_days", 7)?
            .set_default("weather.event_buffer_km", 100)?
            .set_default("cache.ttl_seconds", 300)?
            .set_default("cache.max_capacity", 10_000)?
            .set_default("cache.coordinate_precision", 2)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CTI_ prefix)
            .add_source(
                Environment::with_prefix("CTI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            weather: WeatherConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
            allowed_origins: Vec::new(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "https://api.tomorrow.io/v4".to_string(),
            api_key: String::new(),
            timeout_seconds: 15,
            forecast_days: 7,
            event_buffer_km: 100,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            max_capacity: 10_000,
            coordinate_precision: 2,
        }
    }
}
