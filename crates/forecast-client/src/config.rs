//! Client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Short-term forecast API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KmaConfig {
    /// Endpoint of the village forecast operation
    #[serde(default = "default_kma_url")]
    pub base_url: String,

    /// API hub auth key
    #[serde(default)]
    pub auth_key: String,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Rows per page; one batch for one cell is ~1000 rows (default: 1000)
    #[serde(default = "default_num_of_rows")]
    pub num_of_rows: u32,
}

/// Air-quality API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirKoreaConfig {
    #[serde(default = "default_airkorea_url")]
    pub base_url: String,

    #[serde(default)]
    pub service_key: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Reverse-geocoding API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KakaoConfig {
    #[serde(default = "default_kakao_url")]
    pub base_url: String,

    /// REST API key, sent as `Authorization: KakaoAK <key>`
    #[serde(default)]
    pub rest_api_key: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_kma_url() -> String {
    "https://apihub.kma.go.kr/api/typ02/openApi/VilageFcstInfoService_2.0/getVilageFcst".to_string()
}

fn default_airkorea_url() -> String {
    "https://apis.data.go.kr/B552584/ArpltnStatsSvc/getCtprvnMesureSidoLIst".to_string()
}

fn default_kakao_url() -> String {
    "https://dapi.kakao.com/v2/local/geo/coord2address.json".to_string()
}

const fn default_timeout() -> u64 {
    10
}

const fn default_num_of_rows() -> u32 {
    1000
}

impl KmaConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AirKoreaConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl KakaoConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for KmaConfig {
    fn default() -> Self {
        Self {
            base_url: default_kma_url(),
            auth_key: String::new(),
            timeout_secs: default_timeout(),
            num_of_rows: default_num_of_rows(),
        }
    }
}

impl Default for AirKoreaConfig {
    fn default() -> Self {
        Self {
            base_url: default_airkorea_url(),
            service_key: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for KakaoConfig {
    fn default() -> Self {
        Self {
            base_url: default_kakao_url(),
            rest_api_key: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}
