//! Coordinate transformations between WGS84 and the forecast grid.
//!
//! Implements the Lambert Conformal Conic projection from scratch without
//! external dependencies.

pub mod lambert;

pub use lambert::{LambertConformal, LambertParams, MAX_ABS_LATITUDE};
