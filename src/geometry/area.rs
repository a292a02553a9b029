use greatcircle::{polar_triangle_area, LatLon};
use tracing::debug;

use crate::error::{Error, Result};
use crate::indexed::IndexedPolygon;

use super::contains::is_in_polygon;
use super::Rule;

/// Latitude offset (degrees) of the probe used to find which side of an
/// edge is interior.
const PROBE_OFFSET: f64 = 1e-6;

/// Exact spherical area of `polygon` in km².
///
/// Sums, over every edge, the area of the triangle the edge forms with the
/// north pole. A triangle counts positively when the polygon interior lies
/// north of its edge (probed just off the edge midpoint) and negatively
/// otherwise. Orientation-independent.
pub fn area_exact(polygon: &IndexedPolygon, rule: Rule) -> Result<f64> {
    if polygon.is_empty() {
        return Err(Error::DegenerateInput("polygon has no edges".into()));
    }

    let mut total = 0.0;
    for edge in polygon.edges() {
        // Meridional edges bound no pole triangle.
        if edge.lon_span() == 0.0 { continue }

        let triangle = polar_triangle_area(edge.start(), edge.end()).ok_or_else(|| {
            Error::NumericDomain(format!("no spherical triangle for edge {} -> {}", edge.start(), edge.end()))
        })?;

        let mid = edge.midpoint();
        let probe = LatLon::new((mid.lat + PROBE_OFFSET).min(90.0), mid.lon);
        if is_in_polygon(probe, polygon, rule) { total += triangle } else { total -= triangle }
    }

    if total < 0.0 {
        debug!(area = total, "pole triangles summed negative; polygon may enclose the south pole");
    }
    Ok(total.abs())
}
