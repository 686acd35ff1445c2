//! Error types for weather resolution.

use thiserror::Error;

/// Result type alias using WeatherError.
pub type WeatherResult<T> = Result<T, WeatherError>;

/// Primary error type for weather and air-quality resolution.
#[derive(Debug, Clone, Error)]
pub enum WeatherError {
    // === Location Errors ===
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Coordinate outside projection domain: {0}")]
    ProjectionDomain(String),

    #[error("Address not found: {0}")]
    AddressNotFound(String),

    // === Upstream Errors ===
    #[error("Upstream rejected request (HTTP {status}): {message}")]
    UpstreamClient { status: u16, message: String },

    #[error("Upstream server error: {0}")]
    UpstreamServer(String),

    #[error("Data not found: {0}")]
    DataNotFound(String),

    // === Storage Errors ===
    #[error("Cache error: {0}")]
    CacheError(String),
}

impl WeatherError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            WeatherError::InvalidLocation(_) => "LOCATION_BAD_REQUEST",
            WeatherError::ProjectionDomain(_) => "LOCATION_OUT_OF_DOMAIN",
            WeatherError::AddressNotFound(_) => "GET_ADDRESS_FAIL",
            WeatherError::UpstreamClient { .. } => "UPSTREAM_CLIENT_ERROR",
            WeatherError::UpstreamServer(_) => "UPSTREAM_SERVER_ERROR",
            WeatherError::DataNotFound(_) => "DATA_NOT_FOUND",
            WeatherError::CacheError(_) => "CACHE_ERROR",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            WeatherError::InvalidLocation(_) | WeatherError::ProjectionDomain(_) => 400,

            WeatherError::AddressNotFound(_) | WeatherError::DataNotFound(_) => 404,

            // The caller's request was fine; our credentials or query to the upstream were not.
            WeatherError::UpstreamClient { .. } => 502,
            WeatherError::UpstreamServer(_) => 503,

            WeatherError::CacheError(_) => 500,
        }
    }
}

// Conversion from common error types
impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::CacheError(format!("JSON error: {}", err))
    }
}
