use greatcircle::{distance, initial_bearing, latitude_at_meridian, midpoint, normalize_longitude, LatLon};

/// Quantization for coordinate matching (1e-7 degrees, about 1 cm).
pub(crate) const QUANT: f64 = 1e-7;

/// A vertex rounded to the `QUANT` lattice, with `180` folded onto `-180`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct VertexKey {
    lat: i64,
    lon: i64,
}

impl VertexKey {
    pub(crate) fn new(p: LatLon) -> Self {
        Self {
            lat: (p.lat / QUANT).round() as i64,
            lon: (normalize_longitude(p.lon) / QUANT).round() as i64,
        }
    }

    pub(crate) fn to_latlon(self) -> LatLon {
        LatLon::new(self.lat as f64 * QUANT, self.lon as f64 * QUANT)
    }
}

/// Directed edge key: (start, end) vertices on the `QUANT` lattice.
pub(crate) type EdgeKey = (VertexKey, VertexKey);

/// An immutable great-circle segment between two vertices.
///
/// Derived quantities (length, bounding box, antimeridian flag and winding
/// direction) are computed once on construction. For an edge that crosses
/// the antimeridian the longitude bounds are continuous, so `lon_max` may
/// exceed 180: the edge `(0, 170) -> (0, -170)` spans `[170, 190]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    start: LatLon,
    end: LatLon,
    length_km: f64,
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    lon_max: f64,
    crosses_antimeridian: bool,
    winding: i8,
}

impl Edge {
    pub fn new(start: LatLon, end: LatLon) -> Self {
        let crosses_antimeridian = (end.lon - start.lon).abs() > 180.0;

        let (lon_min, lon_max) = match crosses_antimeridian {
            false => (start.lon.min(end.lon), start.lon.max(end.lon)),
            true if start.lon > end.lon => (start.lon, end.lon + 360.0),
            true => (end.lon, start.lon + 360.0),
        };

        // Eastward travel winds positively.
        let eastward = if crosses_antimeridian { start.lon > end.lon } else { end.lon >= start.lon };

        Self {
            start,
            end,
            length_km: distance(start, end),
            lat_min: start.lat.min(end.lat),
            lat_max: start.lat.max(end.lat),
            lon_min,
            lon_max,
            crosses_antimeridian,
            winding: if eastward { 1 } else { -1 },
        }
    }

    #[inline] pub fn start(&self) -> LatLon { self.start }
    #[inline] pub fn end(&self) -> LatLon { self.end }
    #[inline] pub fn length_km(&self) -> f64 { self.length_km }
    #[inline] pub fn lat_min(&self) -> f64 { self.lat_min }
    #[inline] pub fn lat_max(&self) -> f64 { self.lat_max }
    #[inline] pub fn lon_min(&self) -> f64 { self.lon_min }
    #[inline] pub fn lon_max(&self) -> f64 { self.lon_max }

    /// Width of the edge's longitude interval, in degrees (always <= 180).
    #[inline] pub fn lon_span(&self) -> f64 { self.lon_max - self.lon_min }

    #[inline] pub fn crosses_antimeridian(&self) -> bool { self.crosses_antimeridian }

    /// `+1` if the edge travels east, `-1` if it travels west.
    #[inline] pub fn winding(&self) -> i8 { self.winding }

    /// Returns true if the edge has no length (including the `180 == -180` case).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.length_km == 0.0 || self.start.same_position(&self.end)
    }

    /// Returns true if `lon` lies in the half-open interval `[lon_min, lon_max)`.
    #[inline]
    pub fn spans_longitude(&self, lon: f64) -> bool {
        self.lon_min <= lon && lon < self.lon_max
    }

    /// Returns true if `lat` lies in the half-open interval `[lat_min, lat_max)`.
    #[inline]
    pub fn spans_latitude(&self, lat: f64) -> bool {
        self.lat_min <= lat && lat < self.lat_max
    }

    /// Latitude range actually swept by the arc, including the poleward
    /// bulge of a great circle between its endpoints.
    pub fn latitude_extent(&self) -> (f64, f64) {
        let (mut lo, mut hi) = (self.lat_min, self.lat_max);
        if self.is_degenerate() || lo <= -90.0 || hi >= 90.0 { return (lo, hi) }

        // The circle's vertex is on the arc iff both ends head toward it.
        let forward = initial_bearing(self.start, self.end).to_radians().cos();
        let backward = initial_bearing(self.end, self.start).to_radians().cos();
        let apex = || {
            let alpha = initial_bearing(self.start, self.end).to_radians();
            (alpha.sin() * self.start.lat.to_radians().cos()).abs().clamp(0.0, 1.0).acos().to_degrees()
        };
        if forward > 0.0 && backward > 0.0 { hi = hi.max(apex()) }
        if forward < 0.0 && backward < 0.0 { lo = lo.min(-apex()) }
        (lo, hi)
    }

    /// Great-circle midpoint of the edge.
    #[inline] pub fn midpoint(&self) -> LatLon { midpoint(self.start, self.end) }

    /// The same segment traversed in the opposite direction.
    #[inline] pub fn reversed(&self) -> Self { Edge::new(self.end, self.start) }

    /// Latitude at which the edge meets meridian `lon`.
    ///
    /// Falls back to linear interpolation between the endpoint latitudes when
    /// the great-circle formula is undefined (an endpoint at a pole).
    pub fn latitude_at(&self, lon: f64) -> f64 {
        if let Some(lat) = latitude_at_meridian(self.start, self.end, lon) { return lat }

        let (lon1, mut lon2) = (self.start.lon, self.end.lon);
        if self.crosses_antimeridian { lon2 += if lon1 > lon2 { 360.0 } else { -360.0 } }
        if lon1 == lon2 { return (self.start.lat + self.end.lat) / 2.0 }
        let t = ((lon - lon1) / (lon2 - lon1)).clamp(0.0, 1.0);
        self.start.lat + t * (self.end.lat - self.start.lat)
    }

    /// Split an antimeridian-crossing edge at `±180`.
    ///
    /// Returns `None` if the edge does not cross. The first piece ends on the
    /// meridian on the start's side, the second starts on the end's side.
    pub fn split_at_antimeridian(&self) -> Option<(Edge, Edge)> {
        if !self.crosses_antimeridian { return None }

        let lat = latitude_at_meridian(self.start, self.end, 180.0)
            .unwrap_or((self.start.lat + self.end.lat) / 2.0);
        let (near, far) = if self.start.lon > 0.0 { (180.0, -180.0) } else { (-180.0, 180.0) };

        Some((
            Edge::new(self.start, LatLon::new(lat, near)),
            Edge::new(LatLon::new(lat, far), self.end),
        ))
    }

    #[inline]
    pub(crate) fn key(&self) -> EdgeKey {
        (VertexKey::new(self.start), VertexKey::new(self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn bounds_and_length() {
        let edge = Edge::new(LatLon::new(1.0, 5.0), LatLon::new(-2.0, 3.0));
        assert_eq!((edge.lat_min(), edge.lat_max()), (-2.0, 1.0));
        assert_eq!((edge.lon_min(), edge.lon_max()), (3.0, 5.0));
        assert!(!edge.crosses_antimeridian());
        assert_eq!(edge.winding(), -1);
        assert_abs_diff_eq!(edge.length_km(), distance(edge.start(), edge.end()));
    }

    #[test]
    fn antimeridian_edge_has_continuous_bounds() {
        let edge = Edge::new(LatLon::new(0.0, 170.0), LatLon::new(0.0, -170.0));
        assert!(edge.crosses_antimeridian());
        assert_eq!((edge.lon_min(), edge.lon_max()), (170.0, 190.0));
        assert_eq!(edge.lon_span(), 20.0);
        assert_eq!(edge.winding(), 1);

        let westward = edge.reversed();
        assert_eq!((westward.lon_min(), westward.lon_max()), (170.0, 190.0));
        assert_eq!(westward.winding(), -1);
    }

    #[test]
    fn split_preserves_span_and_direction() {
        let edge = Edge::new(LatLon::new(0.0, 170.0), LatLon::new(0.0, -170.0));
        let (a, b) = edge.split_at_antimeridian().unwrap();

        assert_eq!(a.start(), edge.start());
        assert_eq!(b.end(), edge.end());
        assert_abs_diff_eq!(a.end().lon, 180.0);
        assert_abs_diff_eq!(b.start().lon, -180.0);
        assert_abs_diff_eq!(a.lon_span() + b.lon_span(), edge.lon_span(), epsilon = 1e-9);
        assert!(!a.crosses_antimeridian() && !b.crosses_antimeridian());
        assert_eq!((a.winding(), b.winding()), (1, 1));
        assert_abs_diff_eq!(a.length_km() + b.length_km(), edge.length_km(), epsilon = 1e-6);
    }

    #[test]
    fn non_crossing_edge_is_not_split() {
        assert!(Edge::new(LatLon::new(0.0, 0.0), LatLon::new(1.0, 1.0)).split_at_antimeridian().is_none());
    }

    #[test]
    fn antimeridian_twins_are_degenerate() {
        assert!(Edge::new(LatLon::new(3.0, 180.0), LatLon::new(3.0, -180.0)).is_degenerate());
        assert!(Edge::new(LatLon::new(3.0, 1.0), LatLon::new(3.0, 1.0)).is_degenerate());
        assert!(!Edge::new(LatLon::new(3.0, 1.0), LatLon::new(3.0, 2.0)).is_degenerate());
    }

    #[test]
    fn half_open_spans() {
        let edge = Edge::new(LatLon::new(0.0, 0.0), LatLon::new(2.0, 2.0));
        assert!(edge.spans_longitude(0.0));
        assert!(edge.spans_longitude(1.9));
        assert!(!edge.spans_longitude(2.0));
        assert!(edge.spans_latitude(0.0));
        assert!(!edge.spans_latitude(2.0));
    }

    #[test]
    fn latitude_at_pole_endpoint_interpolates() {
        let edge = Edge::new(LatLon::new(90.0, 0.0), LatLon::new(80.0, 10.0));
        assert_abs_diff_eq!(edge.latitude_at(5.0), 85.0, epsilon = 1e-9);
    }

    #[test]
    fn latitude_extent_includes_bulge() {
        let edge = Edge::new(LatLon::new(60.0, -40.0), LatLon::new(60.0, 40.0));
        let (lo, hi) = edge.latitude_extent();
        assert_eq!(lo, 60.0);
        assert!(hi > 60.0);
        assert_abs_diff_eq!(hi, edge.midpoint().lat, epsilon = 1e-9);

        let southern = Edge::new(LatLon::new(-60.0, 40.0), LatLon::new(-60.0, -40.0));
        assert_abs_diff_eq!(southern.latitude_extent().0, -hi, epsilon = 1e-9);

        let meridian = Edge::new(LatLon::new(10.0, 5.0), LatLon::new(20.0, 5.0));
        assert_eq!(meridian.latitude_extent(), (10.0, 20.0));
    }

    #[test]
    fn keys_fold_the_antimeridian() {
        assert_eq!(VertexKey::new(LatLon::new(1.0, 180.0)), VertexKey::new(LatLon::new(1.0, -180.0)));
        let p = LatLon::new(12.3456789, -45.6789012);
        let q = VertexKey::new(p).to_latlon();
        assert_abs_diff_eq!(p.lat, q.lat, epsilon = 1e-7);
        assert_abs_diff_eq!(p.lon, q.lon, epsilon = 1e-7);
    }
}
