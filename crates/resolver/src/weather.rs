//! Cache-first weather resolution for one grid cell.
//!
//! Resolution for a cell at instant `now` takes one of three paths:
//!
//! 1. Today's window is cached: return it, no upstream calls.
//! 2. Yesterday's window is cached: fetch today's batch only and carry
//!    yesterday's current temperature over.
//! 3. Neither is cached: fetch today's batch and yesterday's batch
//!    concurrently.
//!
//! Paths 2 and 3 write today's record back with a 24-hour TTL so that it
//! can serve as tomorrow's carry-over source.

use chrono::{DateTime, FixedOffset};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use forecast_client::{Category, ForecastQuery, ForecastSource};
use storage::{KeyValueCache, WeatherCacheKey};
use weather_common::{
    Clock, GridCell, TimeWindow, WeatherError, WeatherRecord, WeatherResult,
};

/// TTL of a written weather record.
pub const RECORD_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Reject cells no forecast can exist for.
///
/// `(0, 0)` is what the projection produces for a point south-west of the
/// grid, most often a latitude/longitude pair passed in the wrong order.
pub fn validate_cell(cell: GridCell) -> WeatherResult<GridCell> {
    if cell.is_sentinel() {
        return Err(WeatherError::InvalidLocation(
            "location maps to grid cell (0, 0); check latitude/longitude order".to_string(),
        ));
    }
    if !cell.in_bounds() {
        return Err(WeatherError::InvalidLocation(format!(
            "grid cell {} is outside the forecast grid (1..={}, 1..={})",
            cell,
            GridCell::MAX_X,
            GridCell::MAX_Y
        )));
    }
    Ok(cell)
}

/// Today's values read from one forecast batch.
#[derive(Debug, Clone, Copy)]
struct TodayForecast {
    max_temp: i32,
    min_temp: i32,
    rain_probability: i32,
    current_temp: i32,
}

/// Resolves grid cells to weather records through the cache and a forecast source.
#[derive(Clone)]
pub struct WeatherResolver {
    cache: Arc<dyn KeyValueCache>,
    source: Arc<dyn ForecastSource>,
    clock: Arc<dyn Clock>,
}

impl WeatherResolver {
    pub fn new(
        cache: Arc<dyn KeyValueCache>,
        source: Arc<dyn ForecastSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cache,
            source,
            clock,
        }
    }

    /// Resolve `cell` at the clock's current instant.
    pub async fn resolve(&self, cell: GridCell) -> WeatherResult<WeatherRecord> {
        self.resolve_at(cell, self.clock.now()).await
    }

    /// Resolve `cell` as of `now`.
    ///
    /// Every window, key and batch in one resolution derives from this
    /// single instant.
    #[instrument(skip(self), fields(cell = %cell))]
    pub async fn resolve_at(
        &self,
        cell: GridCell,
        now: DateTime<FixedOffset>,
    ) -> WeatherResult<WeatherRecord> {
        validate_cell(cell)?;

        let today = TimeWindow::containing(now);
        let yesterday = today.previous_day();
        let today_key = WeatherCacheKey::new(cell, today).to_string();
        let yesterday_key = WeatherCacheKey::new(cell, yesterday).to_string();

        if let Some(record) = self.cached_record(&today_key).await? {
            counter!("weather_cache_hits_total").increment(1);
            debug!(key = %today_key, "Weather cache hit");
            return Ok(record);
        }
        counter!("weather_cache_misses_total").increment(1);

        let (yesterday_temp, forecast) = match self.cached_record(&yesterday_key).await? {
            Some(previous) => {
                counter!("weather_carry_over_total").increment(1);
                info!(
                    key = %yesterday_key,
                    yesterday_temp = previous.current_temp,
                    "Carrying over yesterday's temperature"
                );
                let forecast = self.fetch_today(cell, today).await?;
                (previous.current_temp, forecast)
            }
            None => {
                info!(batch = %today.batch(), "Fetching today's and yesterday's batches");
                tokio::try_join!(
                    self.fetch_yesterday_temp(cell, yesterday),
                    self.fetch_today(cell, today)
                )?
            }
        };

        let record = WeatherRecord {
            max_temp: forecast.max_temp,
            min_temp: forecast.min_temp,
            rain_probability: forecast.rain_probability,
            current_temp: forecast.current_temp,
            yesterday_temp,
        };

        self.store(&today_key, &record).await;
        Ok(record)
    }

    async fn cached_record(&self, key: &str) -> WeatherResult<Option<WeatherRecord>> {
        match self.cache.get(key).await? {
            Some(value) => WeatherRecord::from_cache_value(&value).map(Some).map_err(|e| {
                WeatherError::CacheError(format!("corrupt cache entry {}: {}", key, e))
            }),
            None => Ok(None),
        }
    }

    async fn fetch_today(&self, cell: GridCell, today: TimeWindow) -> WeatherResult<TodayForecast> {
        let batch = self
            .source
            .fetch(&ForecastQuery::new(cell, today.batch()))
            .await?;

        let date = today.forecast_date();
        let hour = today.forecast_time();

        Ok(TodayForecast {
            max_temp: batch.value_on(Category::MaxTemp, &date, &hour)?,
            min_temp: batch.value_on(Category::MinTemp, &date, &hour)?,
            rain_probability: batch.value_on(Category::RainProbability, &date, &hour)?,
            current_temp: batch.value_on(Category::Temperature, &date, &hour)?,
        })
    }

    async fn fetch_yesterday_temp(
        &self,
        cell: GridCell,
        yesterday: TimeWindow,
    ) -> WeatherResult<i32> {
        let batch = self
            .source
            .fetch(&ForecastQuery::new(cell, yesterday.batch()))
            .await?;

        batch.value(
            Category::Temperature,
            &yesterday.forecast_date(),
            &yesterday.forecast_time(),
        )
    }

    /// Write-back is best effort; the resolved record is returned either way.
    async fn store(&self, key: &str, record: &WeatherRecord) {
        let result = match record.to_cache_value() {
            Ok(value) => self.cache.set(key, &value, RECORD_TTL).await,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = result {
            counter!("weather_cache_write_failures_total").increment(1);
            warn!(key = %key, error = %e, "Failed to cache weather record");
        }
    }
}
