//! Point-to-point great-circle problems: distance, bearing, destination,
//! and the decomposition of a point's offset from a geodesic.

use crate::{LatLon, EARTH_RADIUS_KM};

/// Wrap a longitude into `[-180, 180)`.
#[inline]
pub fn normalize_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Haversine great-circle distance between `a` and `b`, in km.
pub fn distance(a: LatLon, b: LatLon) -> f64 {
    let (lat1, lon1) = a.to_radians();
    let (lat2, lon2) = b.to_radians();
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Angular separation between `a` and `b`, in radians.
#[inline]
pub fn angular_distance(a: LatLon, b: LatLon) -> f64 {
    distance(a, b) / EARTH_RADIUS_KM
}

/// Initial bearing of the great circle from `a` toward `b`, in degrees
/// clockwise from north, in `[0, 360)`.
pub fn initial_bearing(a: LatLon, b: LatLon) -> f64 {
    let (lat1, lon1) = a.to_radians();
    let (lat2, lon2) = b.to_radians();
    let dlon = lon2 - lon1;

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Solve the direct problem: the point reached from `start` after travelling
/// `distance_km` along the great circle with initial `bearing` (degrees).
pub fn destination(start: LatLon, bearing: f64, distance_km: f64) -> LatLon {
    let (lat1, lon1) = start.to_radians();
    let theta = bearing.to_radians();
    let delta = distance_km / EARTH_RADIUS_KM;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos())
        .clamp(-1.0, 1.0)
        .asin();
    let lon2 = lon1 + (theta.sin() * delta.sin() * lat1.cos())
        .atan2(delta.cos() - lat1.sin() * lat2.sin());

    LatLon::new(lat2.to_degrees(), normalize_longitude(lon2.to_degrees()))
}

/// Great-circle midpoint of `a` and `b`.
pub fn midpoint(a: LatLon, b: LatLon) -> LatLon {
    let (lat1, lon1) = a.to_radians();
    let (lat2, lon2) = b.to_radians();
    let dlon = lon2 - lon1;

    let bx = lat2.cos() * dlon.cos();
    let by = lat2.cos() * dlon.sin();
    let lat = (lat1.sin() + lat2.sin()).atan2(((lat1.cos() + bx).powi(2) + by * by).sqrt());
    let lon = lon1 + by.atan2(lat1.cos() + bx);

    LatLon::new(lat.to_degrees(), normalize_longitude(lon.to_degrees()))
}

/// Latitude (degrees) at which the great circle through `a` and `b` crosses
/// the meridian `lon`.
///
/// Returns `None` when the great circle is itself a meridian or passes
/// through a pole at one of its endpoints, where the crossing latitude is
/// undefined.
pub fn latitude_at_meridian(a: LatLon, b: LatLon, lon: f64) -> Option<f64> {
    let (lat1, lon1) = a.to_radians();
    let (lat2, lon2) = b.to_radians();
    let lon = lon.to_radians();

    let den = lat1.cos() * lat2.cos() * (lon1 - lon2).sin();
    if den.abs() < 1e-15 { return None }

    let num = lat1.sin() * lat2.cos() * (lon - lon2).sin()
        - lat2.sin() * lat1.cos() * (lon - lon1).sin();
    Some((num / den).atan().to_degrees())
}

/// Decompose a point's offset from a geodesic.
///
/// `distance_to_start` is the great-circle distance (km) from the geodesic's
/// start to the point, `angular_difference` the bearing to the point minus the
/// bearing of the geodesic (degrees). Returns `(cross_track, along_track)` in
/// km. Cross-track is signed (positive to the right of travel); along-track
/// is negative when the point projects behind the start.
pub fn cross_track_along_track(distance_to_start: f64, angular_difference: f64) -> (f64, f64) {
    let d13 = distance_to_start / EARTH_RADIUS_KM;
    let dtheta = angular_difference.to_radians();

    let xt = (d13.sin() * dtheta.sin()).clamp(-1.0, 1.0).asin();
    let cos_xt = xt.cos();
    let at = if cos_xt == 0.0 { 0.0 } else { (d13.cos() / cos_xt).clamp(-1.0, 1.0).acos() };
    let at = if dtheta.cos() < 0.0 { -at } else { at };

    (xt * EARTH_RADIUS_KM, at * EARTH_RADIUS_KM)
}
