//! Tests for the forecast grid projection.

use projection::LambertConformal;
use test_utils::fixtures::locations;
use test_utils::{assert_approx_eq, assert_coords_approx_eq, korea_sample_points};
use weather_common::{GeoPoint, GridCell, WeatherError};

fn lat_lon((lat, lon): (f64, f64)) -> GeoPoint {
    GeoPoint::from_lat_lon(lat, lon)
}

// ============================================================================
// Known cells
// ============================================================================

#[test]
fn test_known_locations() {
    let proj = LambertConformal::kma();
    let cases = [
        (locations::SEOUL, locations::SEOUL_CELL),
        (locations::CHEONGJU_AREA, locations::CHEONGJU_AREA_CELL),
        (locations::BUSAN, locations::BUSAN_CELL),
        (locations::JEJU, locations::JEJU_CELL),
        (locations::ORIGIN, (43, 136)),
    ];

    for (point, (x, y)) in cases {
        let cell = proj.to_grid(lat_lon(point)).unwrap();
        assert_eq!(cell, GridCell::new(x, y), "point {:?}", point);
    }
}

#[test]
fn test_sentinel_location_projects_to_zero_cell() {
    let proj = LambertConformal::kma();
    let cell = proj.to_grid(lat_lon(locations::SENTINEL)).unwrap();
    assert!(cell.is_sentinel(), "got {}", cell);
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_roundtrip_within_half_cell() {
    let proj = LambertConformal::kma();
    let half_cell = 0.5 + 1e-9;

    for (lat, lon) in korea_sample_points() {
        let point = GeoPoint::from_lat_lon(lat, lon);
        let cell = proj.to_grid(point).unwrap();
        let centre = proj.to_geo(cell);

        // The recovered centre is exactly the cell position.
        let (cx, cy) = proj.project(centre).unwrap();
        assert_coords_approx_eq!((cx, cy), (f64::from(cell.x), f64::from(cell.y)), 1e-6);

        // And the original point is no more than GRID/2 km from it per axis.
        let (px, py) = proj.project(point).unwrap();
        assert!((px - cx).abs() <= half_cell, "x off by {} at {:?}", px - cx, (lat, lon));
        assert!((py - cy).abs() <= half_cell, "y off by {} at {:?}", py - cy, (lat, lon));

        let grid_km = proj.params().grid_km;
        assert!(point.distance_km(&centre) <= grid_km * std::f64::consts::FRAC_1_SQRT_2 + 0.05);
    }
}

#[test]
fn test_cell_centre_roundtrip() {
    let proj = LambertConformal::kma();
    for (x, y) in [(1, 1), (60, 127), (149, 253), (98, 76)] {
        let cell = GridCell::new(x, y);
        assert_eq!(proj.to_grid(proj.to_geo(cell)).unwrap(), cell);
    }
}

#[test]
fn test_seoul_centre_is_close_to_city_hall() {
    let proj = LambertConformal::kma();
    let centre = proj.to_geo(GridCell::new(60, 127));
    assert_approx_eq!(centre.latitude, 37.5799, 0.001);
    assert_approx_eq!(centre.longitude, 126.9894, 0.001);
}

// ============================================================================
// Argument order
// ============================================================================

#[test]
fn test_explicit_and_swapped_ordering() {
    let proj = LambertConformal::kma();
    let (lat, lon) = locations::CHEONGJU_AREA;

    let explicit = GeoPoint::from_lat_lon(lat, lon);
    assert_eq!(proj.to_grid(explicit).unwrap(), GridCell::new(69, 104));

    let via_xy = GeoPoint::from_lon_lat(lon, lat);
    assert_eq!(proj.to_grid(via_xy).unwrap(), GridCell::new(69, 104));

    // Longitude passed as latitude lands beyond the pole limit.
    let swapped = GeoPoint::from_lat_lon(lon, lat);
    let err = proj.to_grid(swapped).unwrap_err();
    assert!(matches!(err, WeatherError::ProjectionDomain(_)), "got {:?}", err);
}

#[test]
fn test_distant_point_projects_outside_grid() {
    let proj = LambertConformal::kma();
    // Tokyo is inside the projection domain but outside the published grid.
    let cell = proj.to_grid(GeoPoint::from_lat_lon(35.6762, 139.6503)).unwrap();
    assert!(!cell.in_bounds(), "got {}", cell);
}
