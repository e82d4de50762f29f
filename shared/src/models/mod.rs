//! Domain models for the Ceylon Tea Intelligence Platform

mod alert_feed;
mod disaster;
mod forecast;
mod hazard;
mod risk;
mod weather_alert;

pub use alert_feed::*;
pub use disaster::*;
pub use forecast::*;
pub use hazard::*;
pub use risk::*;
pub use weather_alert::*;
