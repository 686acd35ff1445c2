//! Weather and air-quality records returned to callers.

use serde::{Deserialize, Serialize};

use crate::Address;

/// Rain probability (percent) at which an umbrella is recommended.
pub const UMBRELLA_RAIN_PROBABILITY: i32 = 50;

/// PM10 concentration (µg/m³) at which a mask is recommended.
pub const MASK_PM10: i32 = 80;

/// PM10 concentration (µg/m³) at which an alert is raised.
pub const ALERT_PM10: i32 = 300;

/// Forecast values for one grid cell and one hour window.
///
/// Field order is the canonical cache serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub max_temp: i32,
    pub min_temp: i32,
    #[serde(alias = "rainPer")]
    pub rain_probability: i32,
    pub current_temp: i32,
    pub yesterday_temp: i32,
}

impl WeatherRecord {
    /// Serialize to the canonical cache value.
    pub fn to_cache_value(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a cache value written by [`WeatherRecord::to_cache_value`].
    pub fn from_cache_value(value: &str) -> serde_json::Result<Self> {
        serde_json::from_str(value)
    }
}

/// Day-over-day temperature direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureTrend {
    Hot,
    Cold,
    Same,
}

/// User-facing view derived from a [`WeatherRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSummary {
    pub status: TemperatureTrend,
    pub is_umbrella: bool,
    pub high_temp: i32,
    pub low_temp: i32,
    pub current_temp: i32,
    pub diff_temp: i32,
    pub rain_probability: i32,
}

impl WeatherSummary {
    pub fn from_record(record: &WeatherRecord) -> Self {
        let diff_temp = record.current_temp - record.yesterday_temp;
        let status = match diff_temp.signum() {
            1 => TemperatureTrend::Hot,
            -1 => TemperatureTrend::Cold,
            _ => TemperatureTrend::Same,
        };

        Self {
            status,
            is_umbrella: record.rain_probability >= UMBRELLA_RAIN_PROBABILITY,
            high_temp: record.max_temp,
            low_temp: record.min_temp,
            current_temp: record.current_temp,
            diff_temp,
            rain_probability: record.rain_probability,
        }
    }
}

/// Mask recommendation for a location's current PM10 level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskAdvice {
    pub alert: bool,
    pub is_mask: bool,
    pub pm10: i32,
    pub address: Address,
}

impl MaskAdvice {
    pub fn from_pm10(pm10: i32, address: Address) -> Self {
        Self {
            alert: pm10 >= ALERT_PM10,
            is_mask: pm10 >= MASK_PM10,
            pm10,
            address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(current: i32, yesterday: i32, pop: i32) -> WeatherRecord {
        WeatherRecord {
            max_temp: 24,
            min_temp: 13,
            rain_probability: pop,
            current_temp: current,
            yesterday_temp: yesterday,
        }
    }

    #[test]
    fn test_cache_value_field_order() {
        let json = record(20, 18, 30).to_cache_value().unwrap();
        assert_eq!(
            json,
            r#"{"maxTemp":24,"minTemp":13,"rainProbability":30,"currentTemp":20,"yesterdayTemp":18}"#
        );
    }

    #[test]
    fn test_reads_legacy_rain_field() {
        let legacy = r#"{"maxTemp":1,"minTemp":-5,"rainPer":60,"currentTemp":0,"yesterdayTemp":2}"#;
        let parsed = WeatherRecord::from_cache_value(legacy).unwrap();
        assert_eq!(parsed.rain_probability, 60);
    }

    #[test]
    fn test_summary_trend() {
        assert_eq!(WeatherSummary::from_record(&record(20, 18, 0)).status, TemperatureTrend::Hot);
        assert_eq!(WeatherSummary::from_record(&record(15, 18, 0)).status, TemperatureTrend::Cold);
        assert_eq!(WeatherSummary::from_record(&record(18, 18, 0)).status, TemperatureTrend::Same);
        assert_eq!(WeatherSummary::from_record(&record(15, 18, 0)).diff_temp, -3);
    }

    #[test]
    fn test_umbrella_threshold() {
        assert!(!WeatherSummary::from_record(&record(0, 0, 49)).is_umbrella);
        assert!(WeatherSummary::from_record(&record(0, 0, 50)).is_umbrella);
    }

    #[test]
    fn test_mask_thresholds() {
        let address = Address {
            sido_name: "서울".into(),
            city_name: "중구".into(),
            dong_name: "태평로1가".into(),
        };
        let clean = MaskAdvice::from_pm10(79, address.clone());
        assert!(!clean.is_mask && !clean.alert);
        let dusty = MaskAdvice::from_pm10(80, address.clone());
        assert!(dusty.is_mask && !dusty.alert);
        let severe = MaskAdvice::from_pm10(300, address);
        assert!(severe.is_mask && severe.alert);
    }
}
