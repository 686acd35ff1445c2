//! Point-level weather facade: projection followed by cell resolution.

use tracing::instrument;

use projection::LambertConformal;
use weather_common::{GeoPoint, GridCell, WeatherRecord, WeatherResult, WeatherSummary};

use crate::weather::{validate_cell, WeatherResolver};

/// Resolves geographic points to forecast records.
#[derive(Clone)]
pub struct WeatherService {
    projector: LambertConformal,
    resolver: WeatherResolver,
}

impl WeatherService {
    pub fn new(projector: LambertConformal, resolver: WeatherResolver) -> Self {
        Self {
            projector,
            resolver,
        }
    }

    /// Service over the national forecast grid.
    pub fn kma(resolver: WeatherResolver) -> Self {
        Self::new(LambertConformal::kma(), resolver)
    }

    /// The forecast cell containing `point`.
    pub fn resolve_grid(&self, point: GeoPoint) -> WeatherResult<GridCell> {
        let cell = self.projector.to_grid(point)?;
        validate_cell(cell)
    }

    #[instrument(skip(self), fields(point = %point))]
    pub async fn resolve_weather(&self, point: GeoPoint) -> WeatherResult<WeatherRecord> {
        let cell = self.resolve_grid(point)?;
        self.resolver.resolve(cell).await
    }

    /// Umbrella advice and day-over-day trend for `point`.
    pub async fn resolve_summary(&self, point: GeoPoint) -> WeatherResult<WeatherSummary> {
        let record = self.resolve_weather(point).await?;
        Ok(WeatherSummary::from_record(&record))
    }
}
