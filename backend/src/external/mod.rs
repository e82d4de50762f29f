//! External API integrations

pub mod weather;

pub use weather::{FloodInterval, ProviderEvent, WeatherClient};
