//! Great-circle estimate used when no precomputed route exists.

use crate::catalog::Coordinates;

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Roads are longer than the great circle.
pub const ROAD_WINDING_FACTOR: f64 = 1.35;

/// Assumed average driving speed.
pub const AVERAGE_SPEED_MPH: f64 = 50.0;

/// Haversine distance in miles.
pub fn great_circle_miles(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().min(1.0).asin()
}

/// Estimated road miles and driving hours between two points.
pub fn estimate(a: Coordinates, b: Coordinates) -> (f64, f64) {
    let miles = great_circle_miles(a, b) * ROAD_WINDING_FACTOR;
    (miles, miles / AVERAGE_SPEED_MPH)
}
