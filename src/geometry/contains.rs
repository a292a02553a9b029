use greatcircle::{normalize_longitude, LatLon, KM_PER_DEGREE};

use crate::error::{Error, Result};
use crate::indexed::IndexedPolygon;

use super::distance::distance_to_edge;
use super::Rule;

/// Returns true if `point` lies inside `polygon` under `rule`.
///
/// A ray is cast due south (toward decreasing latitude, not north) along
/// the point's meridian and tested against the edges whose longitude
/// interval holds that meridian. A polygon may therefore contain the north
/// pole but is assumed not to contain the south pole.
///
/// An edge's endpoint latitudes never decide a crossing on their own: a
/// great-circle arc bulges poleward past both endpoints, so each candidate
/// is evaluated at the point's longitude. Points exactly on the boundary
/// may classify either way.
pub fn is_in_polygon(point: LatLon, polygon: &IndexedPolygon, rule: Rule) -> bool {
    let lon = normalize_longitude(point.lon);
    let bounds = polygon.bounds();
    if polygon.is_empty() || !bounds.contains_lon(lon) { return false }

    // Endpoint latitudes do not bound a great-circle arc, so every candidate
    // is evaluated on the meridian itself.
    let mut crossings = 0u32;
    let mut winding = 0i32;
    for i in polygon.intervals().edges_at_longitude(lon) {
        let edge = polygon.edge(i);
        if edge.latitude_at(lon) < point.lat {
            crossings += 1;
            winding += edge.winding() as i32;
        }
    }

    match rule {
        Rule::EvenOdd => crossings % 2 == 1,
        Rule::Winding => winding != 0,
    }
}

/// Returns true if the disk of `radius_km` around `point` touches `polygon`:
/// the centre is inside, or some edge comes within the radius.
pub fn disk_intersects_polygon(point: LatLon, polygon: &IndexedPolygon, radius_km: f64, rule: Rule) -> Result<bool> {
    if !(radius_km >= 0.0) || radius_km.is_infinite() {
        return Err(Error::invalid_parameter("radius_km", radius_km, "must be finite and non-negative"));
    }
    if is_in_polygon(point, polygon, rule) { return Ok(true) }

    if polygon.is_empty() { return Ok(false) }
    let reach = radius_km / KM_PER_DEGREE;

    let window = longitude_window(point, reach);
    let lon = normalize_longitude(point.lon);
    Ok(polygon.regions().find_edges_within_radius(point, radius_km).into_iter()
        .map(|i| polygon.edge(i))
        .filter(|edge| window.is_none_or(|w| longitude_gap(edge.lon_min(), edge.lon_max(), lon) <= w))
        .any(|edge| distance_to_edge(point, edge) <= radius_km))
}

/// Largest longitude offset (degrees) at which a point within `reach`
/// degrees of `point` can lie, or `None` if every longitude is reachable.
fn longitude_window(point: LatLon, reach: f64) -> Option<f64> {
    let poleward = point.lat.abs() + reach;
    if poleward >= 90.0 || reach >= 90.0 { return None }

    let ratio = reach.to_radians().sin() / poleward.to_radians().cos();
    (ratio < 1.0).then(|| ratio.asin().to_degrees())
}

/// Circular distance (degrees) from `lon` to the interval `[lo, hi]`.
fn longitude_gap(lo: f64, hi: f64, lon: f64) -> f64 {
    let offset = (lon - lo).rem_euclid(360.0);
    let width = hi - lo;
    if offset <= width { return 0.0 }
    (offset - width).min(360.0 - offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::Polygon;
    use crate::vertex_list::VertexList;

    fn ring(vertices: &[(f64, f64)]) -> IndexedPolygon {
        let list = VertexList::from_loops(vec![vertices.iter().map(|&(lat, lon)| LatLon::new(lat, lon)).collect()]);
        Polygon::from_vertex_list(&list, true).unwrap().with_index()
    }

    fn unit_square() -> IndexedPolygon {
        ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)])
    }

    #[test]
    fn centre_of_square_is_inside() {
        let square = unit_square();
        assert!(is_in_polygon(LatLon::new(0.5, 0.5), &square, Rule::EvenOdd));
        assert!(is_in_polygon(LatLon::new(0.5, 0.5), &square, Rule::Winding));
        assert!(!is_in_polygon(LatLon::new(2.0, 2.0), &square, Rule::EvenOdd));
        assert!(!is_in_polygon(LatLon::new(0.5, 1.5), &square, Rule::EvenOdd));
        // Between the top edge's endpoint latitude and its northward bulge.
        assert!(is_in_polygon(LatLon::new(1.00002, 0.5), &square, Rule::EvenOdd));
        assert!(!is_in_polygon(LatLon::new(-0.5, 0.5), &square, Rule::EvenOdd));
        assert!(!is_in_polygon(LatLon::new(1.5, 0.5), &square, Rule::EvenOdd));
    }

    #[test]
    fn endpoint_latitudes_do_not_decide_crossings() {
        // The top and bottom arcs bulge north of their endpoints, peaking near
        // 66.1° and 57.3° at longitude 0.
        let band = ring(&[(50.0, -40.0), (50.0, 40.0), (60.0, 40.0), (60.0, -40.0)]);
        assert!(is_in_polygon(LatLon::new(63.0, 0.0), &band, Rule::EvenOdd));
        assert!(!is_in_polygon(LatLon::new(53.0, 0.0), &band, Rule::EvenOdd));
        assert!(is_in_polygon(LatLon::new(58.0, 39.5), &band, Rule::Winding));
        assert!(!is_in_polygon(LatLon::new(68.0, 0.0), &band, Rule::EvenOdd));
    }

    #[test]
    fn orientation_does_not_matter() {
        let cw = ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        assert!(is_in_polygon(LatLon::new(0.5, 0.5), &cw, Rule::EvenOdd));
        assert!(is_in_polygon(LatLon::new(0.5, 0.5), &cw, Rule::Winding));
    }

    #[test]
    fn hole_is_outside_under_even_odd() {
        let list = VertexList::from_loops(vec![
            vec![LatLon::new(0.0, 0.0), LatLon::new(0.0, 4.0), LatLon::new(4.0, 4.0), LatLon::new(4.0, 0.0)],
            vec![LatLon::new(1.0, 1.0), LatLon::new(3.0, 1.0), LatLon::new(3.0, 3.0), LatLon::new(1.0, 3.0)],
        ]);
        let polygon = Polygon::from_vertex_list(&list, true).unwrap().with_index();
        assert!(!is_in_polygon(LatLon::new(2.0, 2.0), &polygon, Rule::EvenOdd));
        assert!(!is_in_polygon(LatLon::new(2.0, 2.0), &polygon, Rule::Winding));
        assert!(is_in_polygon(LatLon::new(0.5, 2.0), &polygon, Rule::EvenOdd));
    }

    #[test]
    fn rules_differ_on_doubly_wound_region() {
        let list = VertexList::from_loops(vec![
            vec![LatLon::new(0.0, 0.0), LatLon::new(0.0, 4.0), LatLon::new(4.0, 4.0), LatLon::new(4.0, 0.0)],
            vec![LatLon::new(1.0, 1.0), LatLon::new(1.0, 3.0), LatLon::new(3.0, 3.0), LatLon::new(3.0, 1.0)],
        ]);
        let polygon = Polygon::from_vertex_list(&list, true).unwrap().with_index();
        assert!(!is_in_polygon(LatLon::new(2.0, 2.0), &polygon, Rule::EvenOdd));
        assert!(is_in_polygon(LatLon::new(2.0, 2.0), &polygon, Rule::Winding));
    }

    #[test]
    fn antimeridian_polygon_contains_points_on_both_sides() {
        let polygon = ring(&[(0.0, 179.0), (0.0, -179.0), (1.0, -179.0), (1.0, 179.0)]);
        assert!(is_in_polygon(LatLon::new(0.5, 179.5), &polygon, Rule::EvenOdd));
        assert!(is_in_polygon(LatLon::new(0.5, -179.5), &polygon, Rule::EvenOdd));
        assert!(is_in_polygon(LatLon::new(0.5, 180.0), &polygon, Rule::EvenOdd));
        assert!(!is_in_polygon(LatLon::new(0.5, 178.5), &polygon, Rule::EvenOdd));
        assert!(!is_in_polygon(LatLon::new(0.5, 0.0), &polygon, Rule::EvenOdd));
    }

    #[test]
    fn polar_cap_contains_the_north_pole() {
        let polygon = ring(&[(80.0, 0.0), (80.0, 90.0), (80.0, 180.0), (80.0, -90.0)]);
        assert!(is_in_polygon(LatLon::new(89.0, 45.0), &polygon, Rule::EvenOdd));
        assert!(is_in_polygon(LatLon::new(85.0, -135.0), &polygon, Rule::EvenOdd));
        assert!(!is_in_polygon(LatLon::new(70.0, 10.0), &polygon, Rule::EvenOdd));
    }

    #[test]
    fn disk_reaches_nearby_edge() {
        let square = unit_square();
        let outside = LatLon::new(0.5, 1.1);
        assert!(!disk_intersects_polygon(outside, &square, 5.0, Rule::EvenOdd).unwrap());
        assert!(disk_intersects_polygon(outside, &square, 15.0, Rule::EvenOdd).unwrap());
        assert!(disk_intersects_polygon(LatLon::new(0.5, 0.5), &square, 0.0, Rule::EvenOdd).unwrap());
    }

    #[test]
    fn negative_radius_is_rejected() {
        let square = unit_square();
        assert!(matches!(
            disk_intersects_polygon(LatLon::new(0.0, 0.0), &square, -1.0, Rule::EvenOdd),
            Err(Error::InvalidParameter { name: "radius_km", .. })
        ));
        assert!(disk_intersects_polygon(LatLon::new(0.0, 0.0), &square, f64::NAN, Rule::EvenOdd).is_err());
    }

    #[test]
    fn longitude_gap_is_circular() {
        assert_eq!(longitude_gap(10.0, 20.0, 15.0), 0.0);
        assert_eq!(longitude_gap(10.0, 20.0, 25.0), 5.0);
        assert_eq!(longitude_gap(10.0, 20.0, 5.0), 5.0);
        assert_eq!(longitude_gap(170.0, 180.0, -175.0), 5.0);
        assert_eq!(longitude_gap(-180.0, -170.0, 175.0), 5.0);
    }
}
