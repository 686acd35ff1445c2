//! Test data generators for creating sample coordinates.
//!
//! These generators create predictable, verifiable coordinate sets that
//! can be used across the test suite.

/// Creates a regular lattice of (latitude, longitude) points.
///
/// Points run from `(min_lat, min_lon)` to `(max_lat, max_lon)` inclusive,
/// with `steps` intervals along each axis, so `(steps + 1)^2` points total.
///
/// # Example
///
/// ```
/// use test_utils::create_point_lattice;
///
/// let points = create_point_lattice((33.0, 125.0), (38.0, 130.0), 5);
/// assert_eq!(points.len(), 36);
/// assert_eq!(points[0], (33.0, 125.0));
/// assert_eq!(points[35], (38.0, 130.0));
/// ```
pub fn create_point_lattice(
    (min_lat, min_lon): (f64, f64),
    (max_lat, max_lon): (f64, f64),
    steps: usize,
) -> Vec<(f64, f64)> {
    let steps = steps.max(1);
    let mut points = Vec::with_capacity((steps + 1) * (steps + 1));
    for i in 0..=steps {
        let lat = min_lat + (max_lat - min_lat) * i as f64 / steps as f64;
        for j in 0..=steps {
            let lon = min_lon + (max_lon - min_lon) * j as f64 / steps as f64;
            points.push((lat, lon));
        }
    }
    points
}

/// Sample points covering the Korean peninsula and surrounding sea.
pub fn korea_sample_points() -> Vec<(f64, f64)> {
    create_point_lattice((33.0, 124.5), (38.5, 131.0), 12)
}
