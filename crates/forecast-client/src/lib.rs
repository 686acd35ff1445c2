//! Upstream API clients.
//!
//! Each upstream sits behind a trait so the resolvers can be driven by
//! in-process fakes:
//! - [`ForecastSource`]: short-term grid forecast batches
//! - [`AirQualitySource`]: hourly PM10 measurements per province
//! - [`Geocoder`]: reverse geocoding to administrative districts

pub mod air_quality;
pub mod config;
pub mod forecast;
pub mod geocode;
mod http;

pub use air_quality::{select_pm10, AirKoreaClient, AirQualitySource, CityMeasurement};
pub use config::{AirKoreaConfig, KakaoConfig, KmaConfig};
pub use forecast::{
    Category, ForecastBatch, ForecastItem, ForecastQuery, ForecastSource, KmaForecastClient,
};
pub use geocode::{Geocoder, KakaoGeocoder};
