//! Common test fixtures for weather resolution tests.
//!
//! Canned locations plus builders for the JSON bodies returned by the
//! upstream forecast, air-quality and geocoding APIs.

use serde_json::{json, Value};

/// Well-known locations as (latitude, longitude) with their grid cells.
pub mod locations {
    /// Seoul City Hall
    pub const SEOUL: (f64, f64) = (37.5665, 126.978);
    pub const SEOUL_CELL: (i32, i32) = (60, 127);

    /// Central inland reference point
    pub const CHEONGJU_AREA: (f64, f64) = (36.5, 127.5);
    pub const CHEONGJU_AREA_CELL: (i32, i32) = (69, 104);

    /// Busan City Hall
    pub const BUSAN: (f64, f64) = (35.1796, 129.0756);
    pub const BUSAN_CELL: (i32, i32) = (98, 76);

    /// Jeju
    pub const JEJU: (f64, f64) = (33.5, 126.5);
    pub const JEJU_CELL: (i32, i32) = (52, 38);

    /// Projection origin (olat, olon), maps to cell (43, 136)
    pub const ORIGIN: (f64, f64) = (38.0, 126.0);

    /// Maps to the (0, 0) sentinel cell
    pub const SENTINEL: (f64, f64) = (31.747_865_619_672_52, 123.709_514_071_976_98);
}

/// One entry of a short-term forecast `items.item` array.
pub fn forecast_item(category: &str, fcst_date: &str, fcst_time: &str, value: &str) -> Value {
    json!({
        "baseDate": fcst_date,
        "baseTime": "0200",
        "category": category,
        "fcstDate": fcst_date,
        "fcstTime": fcst_time,
        "fcstValue": value,
        "nx": 60,
        "ny": 127
    })
}

/// Wrap forecast items in the full response envelope.
pub fn forecast_response(items: Vec<Value>) -> Value {
    let total = items.len();
    json!({
        "response": {
            "header": { "resultCode": "00", "resultMsg": "NORMAL_SERVICE" },
            "body": {
                "dataType": "JSON",
                "items": { "item": items },
                "pageNo": 1,
                "numOfRows": 1000,
                "totalCount": total
            }
        }
    })
}

/// A forecast response carrying every category for `date` at `hour` (`HH00`).
pub fn full_forecast_response(
    date: &str,
    hour: &str,
    max: i32,
    min: i32,
    pop: i32,
    tmp: i32,
) -> Value {
    forecast_response(vec![
        forecast_item("TMP", date, hour, &tmp.to_string()),
        forecast_item("POP", date, hour, &pop.to_string()),
        forecast_item("SKY", date, hour, "1"),
        forecast_item("TMN", date, "0600", &format!("{}.0", min)),
        forecast_item("TMX", date, "1500", &format!("{}.0", max)),
    ])
}

/// An error envelope as returned for invalid queries (HTTP 200, non-00 code).
pub fn forecast_error_response(code: &str, message: &str) -> Value {
    json!({
        "response": {
            "header": { "resultCode": code, "resultMsg": message }
        }
    })
}

/// Hourly PM10 measurements per city within a province.
pub fn air_quality_response(cities: &[(&str, &str)]) -> Value {
    let items: Vec<Value> = cities
        .iter()
        .map(|(city, pm10)| {
            json!({
                "sidoName": "서울",
                "cityName": city,
                "pm10Value": pm10,
                "pm25Value": "15",
                "dataTime": "2024-05-14 13:00"
            })
        })
        .collect();
    json!({
        "response": {
            "header": { "resultCode": "00", "resultMsg": "NORMAL_CODE" },
            "body": { "items": items, "totalCount": cities.len() }
        }
    })
}

/// Reverse-geocoding body with a single address document.
pub fn geocode_response(sido: &str, city: &str, dong: &str) -> Value {
    json!({
        "meta": { "total_count": 1 },
        "documents": [{
            "address": {
                "address_name": format!("{} {} {}", sido, city, dong),
                "region_1depth_name": sido,
                "region_2depth_name": city,
                "region_3depth_name": dong
            },
            "road_address": null
        }]
    })
}

/// Reverse-geocoding body with no documents (e.g. a point at sea).
pub fn empty_geocode_response() -> Value {
    json!({ "meta": { "total_count": 0 }, "documents": [] })
}
