//! Lambert Conformal Conic projection.
//!
//! The short-term forecast grid is a secant cone with two standard
//! parallels. Grid coordinates are measured in cells from a fixed origin
//! cell rather than in metres, so the earth radius is pre-divided by the
//! grid spacing.
//!
//! The projection parameters include:
//! - Reference latitude/longitude (olat, olon): the point mapped to the origin cell
//! - Standard parallels: slat1 and slat2
//! - Grid spacing in kilometres
//! - Origin cell offset (xo, yo)

use std::f64::consts::PI;

use weather_common::{GeoPoint, GridCell, WeatherError, WeatherResult};

/// Latitudes closer to a pole than this are rejected.
pub const MAX_ABS_LATITUDE: f64 = 85.0;

const DEG_TO_RAD: f64 = PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / PI;

/// Fixed parameters of a Lambert Conformal grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertParams {
    /// Earth radius (km)
    pub earth_radius_km: f64,
    /// Grid spacing (km)
    pub grid_km: f64,
    /// First standard parallel (degrees)
    pub slat1: f64,
    /// Second standard parallel (degrees)
    pub slat2: f64,
    /// Reference longitude (degrees)
    pub olon: f64,
    /// Reference latitude (degrees)
    pub olat: f64,
    /// Column of the reference point
    pub xo: f64,
    /// Row of the reference point
    pub yo: f64,
}

impl LambertParams {
    /// Parameters of the 5 km short-term forecast grid.
    pub const KMA: LambertParams = LambertParams {
        earth_radius_km: 6371.00877,
        grid_km: 5.0,
        slat1: 30.0,
        slat2: 60.0,
        olon: 126.0,
        olat: 38.0,
        xo: 43.0,
        yo: 136.0,
    };
}

/// Lambert Conformal Conic projection between WGS84 and grid cells.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    params: LambertParams,
    /// Earth radius in grid units
    re: f64,
    /// Reference longitude in radians
    olon: f64,
    /// Cone constant (n)
    sn: f64,
    /// F constant
    sf: f64,
    /// Rho at the reference latitude
    ro: f64,
}

impl LambertConformal {
    /// Build the projection, deriving the cone constants from `params`.
    pub fn new(params: LambertParams) -> Self {
        let re = params.earth_radius_km / params.grid_km;
        let slat1 = params.slat1 * DEG_TO_RAD;
        let slat2 = params.slat2 * DEG_TO_RAD;
        let olat = params.olat * DEG_TO_RAD;

        // Secant cone (two standard parallels)
        let sn = (slat1.cos() / slat2.cos()).ln()
            / ((PI * 0.25 + slat2 * 0.5).tan() / (PI * 0.25 + slat1 * 0.5).tan()).ln();
        let sf = (PI * 0.25 + slat1 * 0.5).tan().powf(sn) * slat1.cos() / sn;
        let ro = re * sf / (PI * 0.25 + olat * 0.5).tan().powf(sn);

        Self {
            params,
            re,
            olon: params.olon * DEG_TO_RAD,
            sn,
            sf,
            ro,
        }
    }

    /// The short-term forecast grid.
    pub fn kma() -> Self {
        Self::new(LambertParams::KMA)
    }

    pub fn params(&self) -> &LambertParams {
        &self.params
    }

    /// Convert a geographic point to fractional grid coordinates.
    ///
    /// Returns (x, y) where x is the column and y the row, before rounding.
    pub fn project(&self, point: GeoPoint) -> WeatherResult<(f64, f64)> {
        check_domain(point)?;

        let ra = (PI * 0.25 + point.latitude * DEG_TO_RAD * 0.5).tan();
        let ra = self.re * self.sf / ra.powf(self.sn);

        let mut theta = point.longitude * DEG_TO_RAD - self.olon;
        if theta > PI {
            theta -= 2.0 * PI;
        }
        if theta < -PI {
            theta += 2.0 * PI;
        }
        theta *= self.sn;

        let x = ra * theta.sin() + self.params.xo;
        let y = self.ro - ra * theta.cos() + self.params.yo;

        if !x.is_finite() || !y.is_finite() {
            return Err(WeatherError::ProjectionDomain(format!(
                "{} projects to a non-finite grid position",
                point
            )));
        }

        Ok((x, y))
    }

    /// Convert a geographic point to the grid cell containing it.
    pub fn to_grid(&self, point: GeoPoint) -> WeatherResult<GridCell> {
        let (x, y) = self.project(point)?;
        Ok(GridCell::new(round_index(x, point)?, round_index(y, point)?))
    }

    /// Convert a grid cell back to the geographic position of its centre.
    pub fn to_geo(&self, cell: GridCell) -> GeoPoint {
        let xn = f64::from(cell.x) - self.params.xo;
        let yn = self.ro - f64::from(cell.y) + self.params.yo;

        let mut ra = (xn * xn + yn * yn).sqrt();
        if self.sn < 0.0 {
            ra = -ra;
        }
        let alat = 2.0 * (self.re * self.sf / ra).powf(1.0 / self.sn).atan() - PI * 0.5;

        let theta = if xn.abs() <= 0.0 {
            0.0
        } else if yn.abs() <= 0.0 {
            if xn < 0.0 {
                -PI * 0.5
            } else {
                PI * 0.5
            }
        } else {
            xn.atan2(yn)
        };
        let alon = theta / self.sn + self.olon;

        GeoPoint::from_lat_lon(alat * RAD_TO_DEG, alon * RAD_TO_DEG)
    }
}

impl Default for LambertConformal {
    fn default() -> Self {
        Self::kma()
    }
}

fn check_domain(point: GeoPoint) -> WeatherResult<()> {
    if !point.latitude.is_finite() || !point.longitude.is_finite() {
        return Err(WeatherError::ProjectionDomain(format!(
            "non-finite coordinate {}",
            point
        )));
    }
    if point.latitude.abs() > MAX_ABS_LATITUDE {
        return Err(WeatherError::ProjectionDomain(format!(
            "latitude {} is beyond ±{}°",
            point.latitude, MAX_ABS_LATITUDE
        )));
    }
    if !(-180.0..=180.0).contains(&point.longitude) {
        return Err(WeatherError::ProjectionDomain(format!(
            "longitude {} is outside [-180, 180]",
            point.longitude
        )));
    }
    Ok(())
}

/// Round half away from zero for the positive grid quadrant (`floor(v + 0.5)`).
fn round_index(value: f64, point: GeoPoint) -> WeatherResult<i32> {
    let rounded = (value + 0.5).floor();
    if rounded < f64::from(i32::MIN) || rounded > f64::from(i32::MAX) {
        return Err(WeatherError::ProjectionDomain(format!(
            "{} projects outside the representable grid",
            point
        )));
    }
    Ok(rounded as i32)
}
