use greatcircle::LatLon;
use serde::{Deserialize, Serialize};

use crate::edge::Edge;

/// A latitude/longitude box in degrees.
///
/// Longitude bounds never wrap: a box that touches the antimeridian is
/// widened to the full `[-180, 180]` range instead.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Default for Bounds {
    fn default() -> Self { Self::EMPTY }
}

impl Bounds {
    /// The empty box; extending it with anything yields that thing's bounds.
    pub const EMPTY: Self = Self {
        lat_min: f64::INFINITY,
        lat_max: f64::NEG_INFINITY,
        lon_min: f64::INFINITY,
        lon_max: f64::NEG_INFINITY,
    };

    /// The whole globe.
    pub const GLOBE: Self = Self { lat_min: -90.0, lat_max: 90.0, lon_min: -180.0, lon_max: 180.0 };

    #[inline]
    pub const fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self { lat_min, lat_max, lon_min, lon_max }
    }

    #[inline] pub fn is_empty(&self) -> bool { self.lat_min > self.lat_max || self.lon_min > self.lon_max }

    /// Returns true if the longitude bounds cover the full circle.
    #[inline] pub fn wraps(&self) -> bool { self.lon_min <= -180.0 && self.lon_max >= 180.0 }

    #[inline] pub fn contains_lat(&self, lat: f64) -> bool { self.lat_min <= lat && lat <= self.lat_max }

    #[inline]
    pub fn contains_lon(&self, lon: f64) -> bool {
        self.wraps() || (self.lon_min <= lon && lon <= self.lon_max)
    }

    #[inline]
    pub fn contains(&self, p: LatLon) -> bool { self.contains_lat(p.lat) && self.contains_lon(p.lon) }

    /// Grow the box to cover `p`.
    pub fn extend_point(&mut self, p: LatLon) {
        self.lat_min = self.lat_min.min(p.lat);
        self.lat_max = self.lat_max.max(p.lat);
        self.lon_min = self.lon_min.min(p.lon);
        self.lon_max = self.lon_max.max(p.lon);
    }

    /// Grow the box to cover `edge`. An antimeridian-crossing edge collapses
    /// the longitude bounds to the full circle.
    pub fn extend_edge(&mut self, edge: &Edge) {
        self.lat_min = self.lat_min.min(edge.lat_min());
        self.lat_max = self.lat_max.max(edge.lat_max());
        if edge.crosses_antimeridian() || edge.lon_max() > 180.0 {
            self.lon_min = -180.0;
            self.lon_max = 180.0;
        } else {
            self.lon_min = self.lon_min.min(edge.lon_min());
            self.lon_max = self.lon_max.max(edge.lon_max());
        }
    }

    /// Grow the box by the given margins (degrees), clamping latitude to the
    /// poles and collapsing to the full circle if longitude would wrap.
    pub fn expanded(&self, lat_margin: f64, lon_margin: f64) -> Self {
        let (lon_min, lon_max) = (self.lon_min - lon_margin, self.lon_max + lon_margin);
        let wraps = self.wraps() || lon_min < -180.0 || lon_max > 180.0;
        Self {
            lat_min: (self.lat_min - lat_margin).max(-90.0),
            lat_max: (self.lat_max + lat_margin).min(90.0),
            lon_min: if wraps { -180.0 } else { lon_min },
            lon_max: if wraps { 180.0 } else { lon_max },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_extends_to_first_edge() {
        let mut bounds = Bounds::EMPTY;
        assert!(bounds.is_empty());
        bounds.extend_edge(&Edge::new(LatLon::new(1.0, 2.0), LatLon::new(3.0, -4.0)));
        assert_eq!(bounds, Bounds::new(1.0, 3.0, -4.0, 2.0));
        assert!(!bounds.wraps());
    }

    #[test]
    fn crossing_edge_wraps_longitude() {
        let mut bounds = Bounds::EMPTY;
        bounds.extend_edge(&Edge::new(LatLon::new(0.0, 170.0), LatLon::new(1.0, -170.0)));
        assert!(bounds.wraps());
        assert!(bounds.contains_lon(0.0));
        assert_eq!((bounds.lat_min, bounds.lat_max), (0.0, 1.0));
    }

    #[test]
    fn expansion_clamps_at_poles_and_wraps() {
        let bounds = Bounds::new(80.0, 85.0, 170.0, 175.0).expanded(10.0, 10.0);
        assert_eq!(bounds.lat_max, 90.0);
        assert!(bounds.wraps());

        let bounds = Bounds::new(0.0, 1.0, 0.0, 1.0).expanded(1.0, 2.0);
        assert_eq!(bounds, Bounds::new(-1.0, 2.0, -2.0, 3.0));
    }

    #[test]
    fn containment_is_inclusive() {
        let bounds = Bounds::new(0.0, 1.0, 0.0, 1.0);
        assert!(bounds.contains(LatLon::new(1.0, 0.0)));
        assert!(!bounds.contains(LatLon::new(1.1, 0.5)));
    }
}
