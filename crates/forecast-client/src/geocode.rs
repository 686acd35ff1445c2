//! Reverse geocoding to administrative districts.

use async_trait::async_trait;
use metrics::counter;
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::instrument;

use weather_common::{Address, GeoPoint, WeatherError, WeatherResult};

use crate::config::KakaoConfig;
use crate::http::{build_client, check_status, read_json, transport_error};

const API: &str = "geocode";

/// Resolves a point to the district that contains it.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn address(&self, point: GeoPoint) -> WeatherResult<Address>;
}

#[derive(Debug, Deserialize)]
struct Coord2AddressResponse {
    #[serde(default)]
    documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
struct Document {
    address: Option<RegionAddress>,
}

#[derive(Debug, Deserialize)]
struct RegionAddress {
    region_1depth_name: String,
    region_2depth_name: String,
    #[serde(default)]
    region_3depth_name: String,
}

/// HTTP client for the coordinate-to-address operation.
#[derive(Debug, Clone)]
pub struct KakaoGeocoder {
    client: Client,
    config: KakaoConfig,
}

impl KakaoGeocoder {
    pub fn new(config: KakaoConfig) -> WeatherResult<Self> {
        let client = build_client(config.timeout())?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Geocoder for KakaoGeocoder {
    #[instrument(skip(self), fields(point = %point))]
    async fn address(&self, point: GeoPoint) -> WeatherResult<Address> {
        counter!("upstream_requests_total", "api" => API).increment(1);

        // The API takes x = longitude, y = latitude.
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("x", point.longitude.to_string()),
                ("y", point.latitude.to_string()),
            ])
            .header(
                header::AUTHORIZATION,
                format!("KakaoAK {}", self.config.rest_api_key),
            )
            .send()
            .await
            .map_err(|e| transport_error(API, e))?;

        let response = check_status(API, response).await?;
        let body: Coord2AddressResponse = read_json(API, response).await?;

        let region = body
            .documents
            .into_iter()
            .find_map(|doc| doc.address)
            .ok_or_else(|| WeatherError::AddressNotFound(point.to_string()))?;

        Ok(Address {
            sido_name: region.region_1depth_name,
            city_name: region.region_2depth_name,
            dong_name: region.region_3depth_name,
        })
    }
}
