//! Shared HTTP plumbing for the upstream clients.

use reqwest::{Client, Response};
use std::time::Duration;
use tracing::warn;

use weather_common::{WeatherError, WeatherResult};

/// Build a client whose every request is bounded by `timeout`.
pub(crate) fn build_client(timeout: Duration) -> WeatherResult<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()
        .map_err(|e| WeatherError::UpstreamServer(format!("Failed to create HTTP client: {}", e)))
}

/// Map a transport failure (connect, timeout, body read) to the error taxonomy.
pub(crate) fn transport_error(api: &str, err: reqwest::Error) -> WeatherError {
    if err.is_timeout() {
        WeatherError::UpstreamServer(format!("{} request timed out", api))
    } else {
        WeatherError::UpstreamServer(format!("{} request failed: {}", api, err))
    }
}

/// Reject 4xx/5xx responses, keeping a snippet of the body for diagnostics.
pub(crate) async fn check_status(api: &str, response: Response) -> WeatherResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message: String = body.chars().take(200).collect();
    warn!(api = %api, status = status.as_u16(), body = %message, "Upstream returned error status");

    if status.is_client_error() {
        Err(WeatherError::UpstreamClient {
            status: status.as_u16(),
            message,
        })
    } else {
        Err(WeatherError::UpstreamServer(format!(
            "{} returned HTTP {}",
            api,
            status.as_u16()
        )))
    }
}

/// Read the body as text and parse it as JSON.
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    api: &str,
    response: Response,
) -> WeatherResult<T> {
    let body = response.text().await.map_err(|e| transport_error(api, e))?;
    serde_json::from_str(&body)
        .map_err(|e| WeatherError::DataNotFound(format!("{} returned malformed JSON: {}", api, e)))
}
