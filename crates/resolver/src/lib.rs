//! Location-to-conditions resolution.
//!
//! - [`WeatherResolver`]: cache-first forecast resolution for one grid cell
//! - [`WeatherService`]: projection plus resolution for a geographic point
//! - [`AirQualityResolver`]: hourly cached PM10 advice for a point's district

pub mod air;
pub mod service;
pub mod weather;

pub use air::AirQualityResolver;
pub use service::WeatherService;
pub use weather::{validate_cell, WeatherResolver, RECORD_TTL};
