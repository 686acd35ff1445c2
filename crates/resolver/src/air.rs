//! PM10 mask advice, cached per district for the rest of the hour.

use metrics::counter;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use forecast_client::{select_pm10, AirQualitySource, Geocoder};
use storage::{KeyValueCache, MaskCacheKey};
use weather_common::{Clock, GeoPoint, MaskAdvice, TimeWindow, WeatherError, WeatherResult};

/// Resolves a point to mask advice for its district.
#[derive(Clone)]
pub struct AirQualityResolver {
    geocoder: Arc<dyn Geocoder>,
    source: Arc<dyn AirQualitySource>,
    cache: Arc<dyn KeyValueCache>,
    clock: Arc<dyn Clock>,
}

impl AirQualityResolver {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        source: Arc<dyn AirQualitySource>,
        cache: Arc<dyn KeyValueCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            geocoder,
            source,
            cache,
            clock,
        }
    }

    #[instrument(skip(self), fields(point = %point))]
    pub async fn resolve(&self, point: GeoPoint) -> WeatherResult<MaskAdvice> {
        let now = self.clock.now();
        let window = TimeWindow::containing(now);

        let address = self.geocoder.address(point).await?;
        let key = MaskCacheKey::new(&address, window).to_string();

        if let Some(value) = self.cache.get(&key).await? {
            let pm10 = value.trim().parse::<i32>().map_err(|e| {
                WeatherError::CacheError(format!("corrupt cache entry {}: {}", key, e))
            })?;
            counter!("mask_cache_hits_total").increment(1);
            debug!(key = %key, pm10, "Mask cache hit");
            return Ok(MaskAdvice::from_pm10(pm10, address));
        }
        counter!("mask_cache_misses_total").increment(1);

        let measurements = self.source.measurements(&address.sido_name).await?;
        let pm10 = select_pm10(&measurements, &address.city_name)?;

        // Measurements are hourly; the entry lives until the window closes.
        let ttl = window.remaining(now);
        if let Err(e) = self.cache.set(&key, &pm10.to_string(), ttl).await {
            counter!("mask_cache_write_failures_total").increment(1);
            warn!(key = %key, error = %e, "Failed to cache PM10 reading");
        }

        Ok(MaskAdvice::from_pm10(pm10, address))
    }
}
