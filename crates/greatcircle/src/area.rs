//! Areas on the sphere: spherical excess, pole triangles, lat/lon cells and caps.

use std::f64::consts::PI;

use crate::{angular_distance, LatLon, EARTH_RADIUS_KM};

/// Radicands above this (negative) value are treated as round-off of a
/// degenerate triangle and clamped to zero.
const RADICAND_TOLERANCE: f64 = -1e-10;

/// Spherical excess (steradians on the unit sphere) of the triangle with
/// angular side lengths `a`, `b`, `c` (radians), by L'Huilier's theorem.
///
/// Returns `None` if the side lengths do not form a spherical triangle
/// (the radicand is negative beyond round-off).
pub fn spherical_excess(a: f64, b: f64, c: f64) -> Option<f64> {
    let s = (a + b + c) / 2.0;
    let t = (s / 2.0).tan()
        * ((s - a) / 2.0).tan()
        * ((s - b) / 2.0).tan()
        * ((s - c) / 2.0).tan();

    if t < 0.0 {
        if t < RADICAND_TOLERANCE { return None }
        return Some(0.0);
    }
    Some(4.0 * t.sqrt().atan())
}

/// Area (km²) of the spherical triangle bounded by the great-circle arc
/// `a`–`b` and the two meridians joining its endpoints to the north pole.
pub fn polar_triangle_area(a: LatLon, b: LatLon) -> Option<f64> {
    let colat_a = (90.0 - a.lat).to_radians();
    let colat_b = (90.0 - b.lat).to_radians();
    let side = angular_distance(a, b);
    spherical_excess(colat_a, colat_b, side).map(|e| e * EARTH_RADIUS_KM * EARTH_RADIUS_KM)
}

/// Area (km²) of the lat/lon cell between parallels `lat_lo` and `lat_hi`
/// spanning `lon_width` degrees of longitude.
pub fn cell_area(lat_lo: f64, lat_hi: f64, lon_width: f64) -> f64 {
    let band = (lat_hi.to_radians().sin() - lat_lo.to_radians().sin()).abs();
    EARTH_RADIUS_KM * EARTH_RADIUS_KM * lon_width.abs().to_radians() * band
}

/// Area (km²) of a spherical cap of geodesic radius `radius_km`.
pub fn cap_area(radius_km: f64) -> f64 {
    let theta = (radius_km / EARTH_RADIUS_KM).min(PI);
    2.0 * PI * EARTH_RADIUS_KM * EARTH_RADIUS_KM * (1.0 - theta.cos())
}

/// Geodesic radius (km) of the cap with the given area; inverse of [`cap_area`].
pub fn cap_radius(area_km2: f64) -> f64 {
    let ratio = area_km2 / (2.0 * PI * EARTH_RADIUS_KM * EARTH_RADIUS_KM);
    (1.0 - ratio).clamp(-1.0, 1.0).acos() * EARTH_RADIUS_KM
}
