//! Shared types and models for the Ceylon Tea Intelligence Platform
//!
//! This crate contains the weather risk evaluators and the types shared between
//! the backend, the dashboard (via WASM), and other components of the system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
