// Integration tests for geodesic buffering:
//   area growth with radius, antimeridian wrapping and pole closure.

use rangepoly::{buffer, is_in_polygon, BufferOptions, IndexedPolygon, LatLon, Polygon, Rule, VertexList};

fn ring(vertices: &[(f64, f64)]) -> IndexedPolygon {
    let ring = vertices.iter().map(|&(lat, lon)| LatLon::new(lat, lon)).collect();
    Polygon::from_vertex_list(&VertexList::from_loops(vec![ring]), true).unwrap().with_index()
}

fn off_grid_box() -> IndexedPolygon {
    ring(&[(10.03, 20.04), (10.03, 20.87), (10.94, 20.87), (10.94, 20.04)])
}

#[test]
fn buffered_area_grows_with_radius() {
    let polygon = off_grid_box();
    let original = polygon.area_exact(Rule::EvenOdd).unwrap();

    let mut previous = 0.0;
    for radius in [0.0, 10.0, 50.0, 100.0] {
        let buffered = buffer(&polygon, &BufferOptions::new(radius, 0.1)).unwrap().with_index();
        let area = buffered.area_exact(Rule::EvenOdd).unwrap();
        assert!(area > previous, "area {area} at {radius} km did not exceed {previous}");
        previous = area;

        if radius == 0.0 {
            assert!((area - original).abs() / original < 0.05, "zero buffer {area} vs polygon {original}");
        }
    }
}

#[test]
fn buffered_area_matches_the_planar_estimate() {
    let polygon = off_grid_box();
    let area = polygon.area_exact(Rule::EvenOdd).unwrap();
    let perimeter = polygon.perimeter(None);

    let radius = 100.0;
    let expected = area + perimeter * radius + std::f64::consts::PI * radius * radius;
    let buffered = buffer(&polygon, &BufferOptions::new(radius, 0.1)).unwrap().with_index();
    let got = buffered.area_exact(Rule::EvenOdd).unwrap();
    assert!((got - expected).abs() / expected < 0.05, "buffered {got} vs estimate {expected}");
}

#[test]
fn buffer_covers_points_within_the_radius_only() {
    let polygon = off_grid_box();
    let buffered = buffer(&polygon, &BufferOptions::new(50.0, 0.1)).unwrap().with_index();

    // 0.3 degrees of latitude is about 33 km; 0.7 is about 78 km.
    assert!(is_in_polygon(LatLon::new(10.94 + 0.3, 20.4), &buffered, Rule::EvenOdd));
    assert!(!is_in_polygon(LatLon::new(10.94 + 0.7, 20.4), &buffered, Rule::EvenOdd));
    assert!(is_in_polygon(LatLon::new(10.5, 20.04 - 0.3), &buffered, Rule::EvenOdd));
    assert!(!is_in_polygon(LatLon::new(10.5, 20.04 - 0.7), &buffered, Rule::EvenOdd));
}

#[test]
fn buffer_wraps_across_the_antimeridian() {
    let polygon = ring(&[(0.0, 179.5), (0.0, -179.5), (1.0, -179.5), (1.0, 179.5)]);
    let buffered = buffer(&polygon, &BufferOptions::new(20.0, 0.1)).unwrap().with_index();

    assert!(buffered.edges().iter().all(|edge| !edge.crosses_antimeridian()));
    for lon in [179.4, 179.9, -179.9, -179.4] {
        assert!(is_in_polygon(LatLon::new(0.5, lon), &buffered, Rule::EvenOdd), "lon {lon} not covered");
    }
    assert!(!is_in_polygon(LatLon::new(0.5, 178.5), &buffered, Rule::EvenOdd));
    assert!(!is_in_polygon(LatLon::new(0.5, -178.5), &buffered, Rule::EvenOdd));
}

#[test]
fn buffer_reaching_the_north_pole_covers_the_far_side() {
    let polygon = ring(&[(85.0, 0.0), (85.0, 10.0), (86.0, 10.0), (86.0, 0.0)]);
    let buffered = buffer(&polygon, &BufferOptions::new(600.0, 0.5)).unwrap().with_index();

    assert!(is_in_polygon(LatLon::new(89.5, -170.0), &buffered, Rule::EvenOdd));
    assert!(is_in_polygon(LatLon::new(85.5, 5.0), &buffered, Rule::EvenOdd));
    assert!(!is_in_polygon(LatLon::new(75.0, -170.0), &buffered, Rule::EvenOdd));
}

#[test]
fn buffer_reaching_the_south_pole_covers_the_far_side() {
    let polygon = ring(&[(-86.0, 0.0), (-86.0, 10.0), (-85.0, 10.0), (-85.0, 0.0)]);
    let buffered = buffer(&polygon, &BufferOptions::new(600.0, 0.5)).unwrap().with_index();

    assert!(is_in_polygon(LatLon::new(-89.5, -170.0), &buffered, Rule::EvenOdd));
    assert!(is_in_polygon(LatLon::new(-85.5, 5.0), &buffered, Rule::EvenOdd));
    assert!(!is_in_polygon(LatLon::new(-75.0, -170.0), &buffered, Rule::EvenOdd));
}
