//! Common types and utilities shared across the weather resolution crates.

pub mod error;
pub mod geo;
pub mod record;
pub mod time;

pub use error::{WeatherError, WeatherResult};
pub use geo::{Address, GeoPoint, GridCell};
pub use record::{MaskAdvice, TemperatureTrend, WeatherRecord, WeatherSummary};
pub use time::{BaseDateTime, Clock, FixedClock, SystemClock, TimeWindow};
