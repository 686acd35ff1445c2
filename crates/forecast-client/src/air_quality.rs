//! Air-quality (PM10) measurement client.

use async_trait::async_trait;
use metrics::counter;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use weather_common::{WeatherError, WeatherResult};

use crate::config::AirKoreaConfig;
use crate::http::{build_client, check_status, read_json, transport_error};

const API: &str = "air_quality";

/// Latest hourly measurement for one city/district.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityMeasurement {
    pub city_name: String,
    /// "-" while a station is offline
    #[serde(default)]
    pub pm10_value: serde_json::Value,
}

impl CityMeasurement {
    pub fn pm10(&self) -> Option<i32> {
        match &self.pm10_value {
            serde_json::Value::String(s) => s.trim().parse().ok(),
            serde_json::Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
            _ => None,
        }
    }
}

/// PM10 for `city_name`, falling back to the first city of the province.
pub fn select_pm10(measurements: &[CityMeasurement], city_name: &str) -> WeatherResult<i32> {
    let chosen = match measurements.iter().find(|m| m.city_name == city_name) {
        Some(m) => m,
        None => {
            let first = measurements.first().ok_or_else(|| {
                WeatherError::DataNotFound("air-quality response has no measurements".to_string())
            })?;
            info!(
                city = %city_name,
                fallback = %first.city_name,
                "No measurement for city, using first entry"
            );
            first
        }
    };

    chosen.pm10().ok_or_else(|| {
        WeatherError::DataNotFound(format!("no PM10 reading for {}", chosen.city_name))
    })
}

/// Source of per-province air-quality measurements.
#[async_trait]
pub trait AirQualitySource: Send + Sync {
    /// Latest hourly measurements for every city in `sido_name`.
    async fn measurements(&self, sido_name: &str) -> WeatherResult<Vec<CityMeasurement>>;
}

#[derive(Debug, Deserialize)]
struct Envelope {
    response: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    body: Option<Body>,
}

#[derive(Debug, Deserialize)]
struct Body {
    #[serde(default)]
    items: Vec<CityMeasurement>,
}

/// HTTP client for the province measurement statistics operation.
#[derive(Debug, Clone)]
pub struct AirKoreaClient {
    client: Client,
    config: AirKoreaConfig,
}

impl AirKoreaClient {
    pub fn new(config: AirKoreaConfig) -> WeatherResult<Self> {
        let client = build_client(config.timeout())?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl AirQualitySource for AirKoreaClient {
    #[instrument(skip(self))]
    async fn measurements(&self, sido_name: &str) -> WeatherResult<Vec<CityMeasurement>> {
        counter!("upstream_requests_total", "api" => API).increment(1);

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("serviceKey", self.config.service_key.as_str()),
                ("sidoName", sido_name),
                ("pageNo", "1"),
                ("numOfRows", "100"),
                ("searchCondition", "HOUR"),
                ("returnType", "json"),
            ])
            .send()
            .await
            .map_err(|e| transport_error(API, e))?;

        let response = check_status(API, response).await?;
        let envelope: Envelope = read_json(API, response).await?;

        let items = envelope
            .response
            .body
            .map(|body| body.items)
            .unwrap_or_default();
        debug!(items = items.len(), "Fetched air-quality measurements");

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str, pm10: &str) -> CityMeasurement {
        CityMeasurement {
            city_name: name.into(),
            pm10_value: pm10.into(),
        }
    }

    #[test]
    fn test_select_matching_city() {
        let items = vec![city("강남구", "40"), city("중구", "85")];
        assert_eq!(select_pm10(&items, "중구").unwrap(), 85);
    }

    #[test]
    fn test_fallback_to_first_city() {
        let items = vec![city("강남구", "40"), city("중구", "85")];
        assert_eq!(select_pm10(&items, "종로구").unwrap(), 40);
    }

    #[test]
    fn test_empty_is_data_not_found() {
        assert!(matches!(select_pm10(&[], "중구"), Err(WeatherError::DataNotFound(_))));
    }

    #[test]
    fn test_offline_station_is_data_not_found() {
        let items = vec![city("중구", "-")];
        assert!(matches!(select_pm10(&items, "중구"), Err(WeatherError::DataNotFound(_))));
    }
}
