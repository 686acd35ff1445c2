//! Short-term (village) forecast client.
//!
//! A batch for one grid cell is a flat list of observations, each tagged
//! with a category code and the forecast date/time it applies to. Values
//! are always looked up by that exact triple, never by position.

use async_trait::async_trait;
use metrics::counter;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, instrument};

use weather_common::{BaseDateTime, GridCell, WeatherError, WeatherResult};

use crate::config::KmaConfig;
use crate::http::{build_client, check_status, read_json, transport_error};

const API: &str = "forecast";

/// Forecast categories the resolver consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Daily maximum temperature (TMX), published in the 15:00 slot
    MaxTemp,
    /// Daily minimum temperature (TMN), published in the 06:00 slot
    MinTemp,
    /// Probability of precipitation in percent (POP)
    RainProbability,
    /// Hourly temperature (TMP)
    Temperature,
}

impl Category {
    pub fn code(&self) -> &'static str {
        match self {
            Category::MaxTemp => "TMX",
            Category::MinTemp => "TMN",
            Category::RainProbability => "POP",
            Category::Temperature => "TMP",
        }
    }

    /// Fixed forecast slot for daily categories; `None` for hourly ones.
    pub fn daily_slot(&self) -> Option<&'static str> {
        match self {
            Category::MaxTemp => Some("1500"),
            Category::MinTemp => Some("0600"),
            Category::RainProbability | Category::Temperature => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Which batch to request for which cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastQuery {
    pub cell: GridCell,
    pub batch: BaseDateTime,
}

impl ForecastQuery {
    pub fn new(cell: GridCell, batch: BaseDateTime) -> Self {
        Self { cell, batch }
    }
}

/// One observation in a forecast batch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastItem {
    pub category: String,
    pub fcst_date: String,
    pub fcst_time: String,
    /// Sent as a string ("24.0", "30"), occasionally as a bare number
    pub fcst_value: serde_json::Value,
}

impl ForecastItem {
    /// Numeric value rounded to the nearest integer.
    pub fn numeric_value(&self) -> Option<i32> {
        let value = match &self.fcst_value {
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
            serde_json::Value::Number(n) => n.as_f64()?,
            _ => return None,
        };
        value.is_finite().then(|| value.round() as i32)
    }
}

/// All observations returned for one query.
#[derive(Debug, Clone, Default)]
pub struct ForecastBatch {
    items: Vec<ForecastItem>,
}

impl ForecastBatch {
    pub fn new(items: Vec<ForecastItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ForecastItem] {
        &self.items
    }

    /// Value of `category` at exactly (`fcst_date`, `fcst_time`).
    pub fn value(&self, category: Category, fcst_date: &str, fcst_time: &str) -> WeatherResult<i32> {
        let item = self
            .items
            .iter()
            .find(|item| {
                item.category == category.code()
                    && item.fcst_date == fcst_date
                    && item.fcst_time == fcst_time
            })
            .ok_or_else(|| {
                WeatherError::DataNotFound(format!(
                    "no {} observation for {} {}",
                    category, fcst_date, fcst_time
                ))
            })?;

        item.numeric_value().ok_or_else(|| {
            WeatherError::DataNotFound(format!(
                "{} observation for {} {} is not numeric: {}",
                category, fcst_date, fcst_time, item.fcst_value
            ))
        })
    }

    /// Value of a category on `fcst_date`, at its daily slot or at `hour` (`HH00`).
    ///
    /// A batch only covers slots after its publication time, so later batches
    /// drop the day's 0600 TMN and, from the evening on, the 1500 TMX. A missing
    /// daily extreme is then taken from the hourly TMP entries of the same date.
    pub fn value_on(&self, category: Category, fcst_date: &str, hour: &str) -> WeatherResult<i32> {
        let Some(slot) = category.daily_slot() else {
            return self.value(category, fcst_date, hour);
        };

        match self.value(category, fcst_date, slot) {
            Err(WeatherError::DataNotFound(_)) if !self.has_item(category, fcst_date, slot) => {
                self.hourly_extreme(category, fcst_date)
            }
            other => other,
        }
    }

    fn has_item(&self, category: Category, fcst_date: &str, fcst_time: &str) -> bool {
        self.items.iter().any(|item| {
            item.category == category.code()
                && item.fcst_date == fcst_date
                && item.fcst_time == fcst_time
        })
    }

    /// Max or min of the TMP entries on `fcst_date`.
    fn hourly_extreme(&self, category: Category, fcst_date: &str) -> WeatherResult<i32> {
        let temps = self
            .items
            .iter()
            .filter(|item| {
                item.category == Category::Temperature.code() && item.fcst_date == fcst_date
            })
            .filter_map(ForecastItem::numeric_value);

        let extreme = match category {
            Category::MaxTemp => temps.max(),
            _ => temps.min(),
        };

        extreme.ok_or_else(|| {
            WeatherError::DataNotFound(format!(
                "no {} or hourly TMP observation for {}",
                category, fcst_date
            ))
        })
    }
}

/// Source of forecast batches.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Fetch the batch described by `query`.
    async fn fetch(&self, query: &ForecastQuery) -> WeatherResult<ForecastBatch>;
}

#[derive(Debug, Deserialize)]
struct Envelope {
    response: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    header: Header,
    #[serde(default)]
    body: Option<Body>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Header {
    result_code: String,
    #[serde(default)]
    result_msg: String,
}

#[derive(Debug, Deserialize)]
struct Body {
    items: Items,
}

#[derive(Debug, Deserialize)]
struct Items {
    #[serde(default)]
    item: Vec<ForecastItem>,
}

/// HTTP client for the village forecast operation.
#[derive(Debug, Clone)]
pub struct KmaForecastClient {
    client: Client,
    config: KmaConfig,
}

impl KmaForecastClient {
    /// Create a new client with the given configuration.
    pub fn new(config: KmaConfig) -> WeatherResult<Self> {
        let client = build_client(config.timeout())?;
        Ok(Self { client, config })
    }

    fn query_params(&self, query: &ForecastQuery) -> Vec<(&'static str, String)> {
        vec![
            ("pageNo", "1".to_string()),
            ("numOfRows", self.config.num_of_rows.to_string()),
            ("dataType", "JSON".to_string()),
            ("base_date", query.batch.base_date()),
            ("base_time", query.batch.base_time()),
            ("nx", query.cell.x.to_string()),
            ("ny", query.cell.y.to_string()),
            ("authKey", self.config.auth_key.clone()),
        ]
    }
}

#[async_trait]
impl ForecastSource for KmaForecastClient {
    #[instrument(skip(self), fields(cell = %query.cell, batch = %query.batch))]
    async fn fetch(&self, query: &ForecastQuery) -> WeatherResult<ForecastBatch> {
        counter!("upstream_requests_total", "api" => API).increment(1);

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&self.query_params(query))
            .send()
            .await
            .map_err(|e| transport_error(API, e))?;

        let response = check_status(API, response).await?;
        let envelope: Envelope = read_json(API, response).await?;

        let header = envelope.response.header;
        if header.result_code != "00" {
            return Err(WeatherError::DataNotFound(format!(
                "forecast result code {}: {}",
                header.result_code, header.result_msg
            )));
        }

        let items = envelope
            .response
            .body
            .map(|body| body.items.item)
            .unwrap_or_default();
        debug!(items = items.len(), "Fetched forecast batch");

        Ok(ForecastBatch::new(items))
    }
}
