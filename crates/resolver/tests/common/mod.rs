//! In-process fakes for the resolver's collaborators.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use forecast_client::{
    AirQualitySource, CityMeasurement, ForecastBatch, ForecastItem, ForecastQuery, ForecastSource,
    Geocoder,
};
use storage::{KeyValueCache, MemoryCache};
use test_utils::fixtures;
use weather_common::{
    Address, FixedClock, GeoPoint, WeatherError, WeatherRecord, WeatherResult,
};

/// Clock frozen at a KST wall time in May 2024.
pub fn clock_at(day: u32, hour: u32, minute: u32) -> Arc<FixedClock> {
    Arc::new(FixedClock::kst(2024, 5, day, hour, minute).unwrap())
}

/// Batch carrying every category for `date` at `hour`.
pub fn full_batch(date: &str, hour: &str, max: i32, min: i32, pop: i32, tmp: i32) -> ForecastBatch {
    let body = fixtures::full_forecast_response(date, hour, max, min, pop, tmp);
    let items: Vec<ForecastItem> =
        serde_json::from_value(body["response"]["body"]["items"]["item"].clone()).unwrap();
    ForecastBatch::new(items)
}

/// Batch with only the listed (category, date, time, value) items.
pub fn batch_of(items: &[(&str, &str, &str, &str)]) -> ForecastBatch {
    ForecastBatch::new(
        items
            .iter()
            .map(|(category, date, time, value)| {
                serde_json::from_value(fixtures::forecast_item(category, date, time, value))
                    .unwrap()
            })
            .collect(),
    )
}

pub fn record(current: i32, yesterday: i32) -> WeatherRecord {
    WeatherRecord {
        max_temp: 24,
        min_temp: 13,
        rain_probability: 30,
        current_temp: current,
        yesterday_temp: yesterday,
    }
}

/// Forecast source answering from batches keyed by `"{base_date} {base_time}"`.
#[derive(Default)]
pub struct ScriptedSource {
    batches: HashMap<String, ForecastBatch>,
    failure: Option<WeatherError>,
    queries: Mutex<Vec<ForecastQuery>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch(mut self, base: &str, batch: ForecastBatch) -> Self {
        self.batches.insert(base.to_string(), batch);
        self
    }

    /// Every fetch fails with `err`.
    pub fn failing(err: WeatherError) -> Self {
        Self {
            failure: Some(err),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requested batches as `"{base_date} {base_time}"`, sorted.
    pub fn requested(&self) -> Vec<String> {
        let mut bases: Vec<String> = self
            .queries
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.batch.to_string())
            .collect();
        bases.sort();
        bases
    }
}

#[async_trait]
impl ForecastSource for ScriptedSource {
    async fn fetch(&self, query: &ForecastQuery) -> WeatherResult<ForecastBatch> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(*query);

        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.batches
            .get(&query.batch.to_string())
            .cloned()
            .ok_or_else(|| WeatherError::DataNotFound(format!("no batch {}", query.batch)))
    }
}

/// Cache whose reads behave like a [`MemoryCache`] and whose writes always fail.
#[derive(Default)]
pub struct ReadOnlyCache {
    inner: MemoryCache,
}

#[async_trait]
impl KeyValueCache for ReadOnlyCache {
    async fn get(&self, key: &str) -> WeatherResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> WeatherResult<()> {
        Err(WeatherError::CacheError("connection refused".to_string()))
    }
}

/// Cache that cannot be reached at all.
pub struct UnreachableCache;

#[async_trait]
impl KeyValueCache for UnreachableCache {
    async fn get(&self, _key: &str) -> WeatherResult<Option<String>> {
        Err(WeatherError::CacheError("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> WeatherResult<()> {
        Err(WeatherError::CacheError("connection refused".to_string()))
    }
}

/// Geocoder that maps every point to one address, or to none.
pub struct StaticGeocoder {
    address: Option<Address>,
}

impl StaticGeocoder {
    pub fn new(sido: &str, city: &str, dong: &str) -> Self {
        Self {
            address: Some(Address {
                sido_name: sido.to_string(),
                city_name: city.to_string(),
                dong_name: dong.to_string(),
            }),
        }
    }

    pub fn nowhere() -> Self {
        Self { address: None }
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn address(&self, point: GeoPoint) -> WeatherResult<Address> {
        self.address
            .clone()
            .ok_or_else(|| WeatherError::AddressNotFound(point.to_string()))
    }
}

/// Air-quality source returning fixed (city, pm10) readings.
pub struct StaticAirSource {
    readings: Vec<(String, String)>,
    calls: AtomicUsize,
}

impl StaticAirSource {
    pub fn new(readings: &[(&str, &str)]) -> Self {
        Self {
            readings: readings
                .iter()
                .map(|(city, pm10)| (city.to_string(), pm10.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AirQualitySource for StaticAirSource {
    async fn measurements(&self, _sido_name: &str) -> WeatherResult<Vec<CityMeasurement>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .readings
            .iter()
            .map(|(city, pm10)| CityMeasurement {
                city_name: city.clone(),
                pm10_value: pm10.as_str().into(),
            })
            .collect())
    }
}
