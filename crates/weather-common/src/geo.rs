//! Geographic points and forecast grid cells.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 position in decimal degrees.
///
/// There is deliberately no `new(a, b)` constructor: latitude/longitude order is
/// easy to transpose, so callers must name the ordering they hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build from a (latitude, longitude) pair.
    pub fn from_lat_lon(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build from a (longitude, latitude) pair, i.e. x/y order.
    pub fn from_lon_lat(longitude: f64, latitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Great-circle distance to another point in kilometres.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat={:.6},lon={:.6}", self.latitude, self.longitude)
    }
}

/// A cell of the upstream 5 km forecast grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    /// Number of columns in the forecast grid.
    pub const MAX_X: i32 = 149;
    /// Number of rows in the forecast grid.
    pub const MAX_Y: i32 = 253;

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The (0,0) cell never carries forecast data and marks a bad input.
    pub fn is_sentinel(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Whether the cell lies inside the published grid (1-based, inclusive).
    pub fn in_bounds(&self) -> bool {
        (1..=Self::MAX_X).contains(&self.x) && (1..=Self::MAX_Y).contains(&self.y)
    }

    /// Cache key fragment, e.g. `X60Y127`.
    pub fn key_fragment(&self) -> String {
        format!("X{}Y{}", self.x, self.y)
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Administrative address returned by reverse geocoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Province / metropolitan city (시도)
    pub sido_name: String,
    /// City / county / district (시군구)
    pub city_name: String,
    /// Neighbourhood (동/읍/면)
    pub dong_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_name_the_order() {
        let a = GeoPoint::from_lat_lon(37.5665, 126.978);
        let b = GeoPoint::from_lon_lat(126.978, 37.5665);
        assert_eq!(a, b);
        assert_eq!(a.latitude, 37.5665);
    }

    #[test]
    fn test_distance_seoul_busan() {
        let seoul = GeoPoint::from_lat_lon(37.5665, 126.978);
        let busan = GeoPoint::from_lat_lon(35.1796, 129.0756);
        let d = seoul.distance_km(&busan);
        assert!(d > 310.0 && d < 335.0, "got {}", d);
    }

    #[test]
    fn test_cell_bounds() {
        assert!(GridCell::new(0, 0).is_sentinel());
        assert!(!GridCell::new(0, 0).in_bounds());
        assert!(GridCell::new(1, 1).in_bounds());
        assert!(GridCell::new(149, 253).in_bounds());
        assert!(!GridCell::new(150, 100).in_bounds());
        assert!(!GridCell::new(60, -3).in_bounds());
    }

    #[test]
    fn test_key_fragment() {
        assert_eq!(GridCell::new(60, 127).key_fragment(), "X60Y127");
    }
}
