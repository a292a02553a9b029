use greatcircle::{cross_track_along_track, distance, initial_bearing, LatLon};

use crate::edge::Edge;
use crate::indexed::IndexedPolygon;

/// Shortest great-circle distance (km) from `point` to the segment
/// `start -> end`.
///
/// Uses the cross-track distance when the point projects onto the segment,
/// and the nearer endpoint otherwise. Returns `0` when the point coincides
/// with an endpoint.
pub fn find_minimum_distance(point: LatLon, start: LatLon, end: LatLon) -> f64 {
    let d13 = distance(start, point);
    if d13 == 0.0 { return 0.0 }

    let length = distance(start, end);
    if length == 0.0 { return d13 }

    let dtheta = initial_bearing(start, point) - initial_bearing(start, end);
    let (xt, at) = cross_track_along_track(d13, dtheta);
    if at < 0.0 || at > length {
        d13.min(distance(end, point))
    } else {
        xt.abs()
    }
}

/// Shortest great-circle distance (km) from `point` to `edge`.
#[inline]
pub fn distance_to_edge(point: LatLon, edge: &Edge) -> f64 {
    find_minimum_distance(point, edge.start(), edge.end())
}

/// Minimum and maximum over all edges of the point-to-edge distance, in km.
///
/// Returns `None` for an empty polygon.
pub fn distance_to_polygon(point: LatLon, polygon: &IndexedPolygon) -> Option<(f64, f64)> {
    polygon.edges().iter()
        .map(|edge| distance_to_edge(point, edge))
        .fold(None, |acc, d| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        })
}
