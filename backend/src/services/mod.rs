//! Business logic services for the Ceylon Tea Intelligence Platform

pub mod alert;
pub mod weather;

pub use alert::AlertService;
pub use weather::WeatherService;
