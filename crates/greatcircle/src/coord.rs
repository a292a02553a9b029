use std::fmt;

use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

/// A position on the sphere, in degrees.
///
/// Latitude lies in `[-90, 90]` and does not wrap. Longitude lies in
/// `[-180, 180]`; `180` and `-180` name the same meridian.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const NORTH_POLE: Self = Self { lat: 90.0, lon: 0.0 };
    pub const SOUTH_POLE: Self = Self { lat: -90.0, lon: 0.0 };

    #[inline] pub const fn new(lat: f64, lon: f64) -> Self { Self { lat, lon } }

    /// Returns true if both components are finite and within their ranges.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Latitude and longitude in radians.
    #[inline] pub fn to_radians(self) -> (f64, f64) { (self.lat.to_radians(), self.lon.to_radians()) }

    /// Copy of `self` with longitude wrapped into `[-180, 180)`.
    #[inline]
    pub fn normalized(self) -> Self {
        Self { lat: self.lat, lon: crate::normalize_longitude(self.lon) }
    }

    /// Returns true if the two positions are equal once longitudes are
    /// wrapped (so `(0, 180)` matches `(0, -180)`).
    #[inline]
    pub fn same_position(&self, other: &LatLon) -> bool {
        self.lat == other.lat && crate::normalize_longitude(self.lon) == crate::normalize_longitude(other.lon)
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

// geo orders coordinates as (x = longitude, y = latitude).

impl From<LatLon> for Coord<f64> {
    fn from(p: LatLon) -> Self { Coord { x: p.lon, y: p.lat } }
}

impl From<Coord<f64>> for LatLon {
    fn from(c: Coord<f64>) -> Self { LatLon { lat: c.y, lon: c.x } }
}

impl From<LatLon> for Point<f64> {
    fn from(p: LatLon) -> Self { Point::new(p.lon, p.lat) }
}

impl From<Point<f64>> for LatLon {
    fn from(p: Point<f64>) -> Self { LatLon { lat: p.y(), lon: p.x() } }
}
