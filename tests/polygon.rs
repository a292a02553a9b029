// Integration tests for polygon assembly and whole-polygon queries:
//   vertex-list round trips, fill rules, tiled areas and region counts.

use approx::assert_relative_eq;
use geo::{LineString, MultiPolygon, Polygon as GeoPolygon};
use rangepoly::{
    distance_to_polygon, is_in_polygon, remove_duplicate_edges, Bounds, IndexedPolygon, LatLon, Polygon,
    Rule, VertexList,
};

fn square(lat: f64, lon: f64, size: f64) -> Vec<LatLon> {
    vec![
        LatLon::new(lat, lon),
        LatLon::new(lat, lon + size),
        LatLon::new(lat + size, lon + size),
        LatLon::new(lat + size, lon),
        LatLon::new(lat, lon),
    ]
}

fn build(loops: Vec<Vec<LatLon>>) -> Polygon {
    Polygon::from_vertex_list(&VertexList::from_loops(loops), true).unwrap()
}

#[test]
fn geo_multipolygon_round_trips_through_edges() {
    let exterior = LineString::from(vec![(20.0, 10.0), (22.0, 10.0), (22.0, 12.0), (20.0, 12.0), (20.0, 10.0)]);
    let hole = LineString::from(vec![(20.5, 10.5), (20.5, 11.5), (21.5, 11.5), (21.5, 10.5), (20.5, 10.5)]);
    let shape = GeoPolygon::new(exterior, vec![hole]);
    let list = VertexList::from(&MultiPolygon::new(vec![shape]));
    assert_eq!(list.len(), 2);

    let polygon = Polygon::from_vertex_list(&list, true).unwrap();
    assert_eq!(polygon.len(), 8);
    assert_eq!(polygon.to_vertex_list(), list);

    let indexed = polygon.with_index();
    assert!(is_in_polygon(LatLon::new(10.2, 20.2), &indexed, Rule::EvenOdd));
    assert!(!is_in_polygon(LatLon::new(11.0, 21.0), &indexed, Rule::EvenOdd));
    assert!(!is_in_polygon(LatLon::new(11.0, 21.0), &indexed, Rule::Winding));
}

#[test]
fn overlapping_loops_differ_by_fill_rule() {
    let indexed = build(vec![square(0.0, 0.0, 2.0), square(1.0, 1.0, 2.0)]).with_index();

    let overlap = LatLon::new(1.5, 1.5);
    assert!(!is_in_polygon(overlap, &indexed, Rule::EvenOdd));
    assert!(is_in_polygon(overlap, &indexed, Rule::Winding));

    for single in [LatLon::new(0.5, 0.5), LatLon::new(2.5, 2.5)] {
        assert!(is_in_polygon(single, &indexed, Rule::EvenOdd));
        assert!(is_in_polygon(single, &indexed, Rule::Winding));
    }
}

#[test]
fn tiled_squares_dissolve_to_their_outline() {
    let mut tiles = Vec::new();
    for i in 0..3 {
        for j in 0..3 {
            tiles.push(square(10.0 + i as f64, 20.0 + j as f64, 1.0));
        }
    }
    let tiled = build(tiles);
    assert_eq!(tiled.len(), 36);

    let outline = remove_duplicate_edges(&tiled);
    assert_eq!(outline.len(), 12);

    let outline = outline.with_index();
    assert_eq!(outline.component_count(), 1);
    assert!(is_in_polygon(LatLon::new(11.5, 21.5), &outline, Rule::EvenOdd));

    let whole = build(vec![vec![
        LatLon::new(10.0, 20.0), LatLon::new(10.0, 21.0), LatLon::new(10.0, 22.0), LatLon::new(10.0, 23.0),
        LatLon::new(11.0, 23.0), LatLon::new(12.0, 23.0), LatLon::new(13.0, 23.0),
        LatLon::new(13.0, 22.0), LatLon::new(13.0, 21.0), LatLon::new(13.0, 20.0),
        LatLon::new(12.0, 20.0), LatLon::new(11.0, 20.0), LatLon::new(10.0, 20.0),
    ]])
    .with_index();

    let dissolved = outline.area_exact(Rule::EvenOdd).unwrap();
    assert_relative_eq!(dissolved, whole.area_exact(Rule::EvenOdd).unwrap(), max_relative = 1e-9);
    assert_relative_eq!(outline.perimeter(None), whole.perimeter(None), max_relative = 1e-9);
}

#[test]
fn tile_areas_add_up() {
    let single = |lat: f64, lon: f64| build(vec![square(lat, lon, 1.0)]).with_index().area_exact(Rule::EvenOdd).unwrap();
    let pair = build(vec![square(10.0, 20.0, 1.0), square(10.0, 21.0, 1.0)]).with_index();

    let sum = single(10.0, 20.0) + single(10.0, 21.0);
    assert_relative_eq!(pair.area_exact(Rule::EvenOdd).unwrap(), sum, max_relative = 1e-9);
}

#[test]
fn disjoint_regions_respect_the_window() {
    let indexed = build(vec![square(0.0, 0.0, 1.0), square(0.0, 5.0, 1.0), square(0.0, 10.0, 1.0)]).with_index();
    assert_eq!(indexed.disjoint_regions(None), 3);

    // The window holds the first square whole and clips the second.
    let window = Bounds::new(-1.0, 2.0, -1.0, 5.5);
    assert_eq!(indexed.disjoint_regions(Some(&window)), 2);

    let empty_window = Bounds::new(50.0, 60.0, 50.0, 60.0);
    assert_eq!(indexed.disjoint_regions(Some(&empty_window)), 0);
}

#[test]
fn distances_span_nearest_and_farthest_edges() {
    let indexed: IndexedPolygon = build(vec![square(0.0, 0.0, 1.0)]).into();
    let (near, far) = distance_to_polygon(LatLon::new(0.5, 2.0), &indexed).unwrap();

    assert!(near < far);
    // One degree of longitude at the equator, less a sliver at 0.5 N.
    assert_relative_eq!(near, 111.19, max_relative = 0.01);
    assert!(distance_to_polygon(LatLon::new(0.0, 0.0), &Polygon::new().with_index()).is_none());
}

#[test]
fn antimeridian_loop_keeps_its_seam_vertices() {
    let polygon = build(vec![vec![
        LatLon::new(-1.0, 179.0), LatLon::new(-1.0, -179.0), LatLon::new(1.0, -179.0), LatLon::new(1.0, 179.0),
    ]]);
    assert!(polygon.edges().iter().all(|edge| !edge.crosses_antimeridian()));
    assert!(polygon.bounds().wraps());

    let indexed = polygon.with_index();
    assert_eq!(indexed.component_count(), 1);
    assert!(is_in_polygon(LatLon::new(0.0, 179.5), &indexed, Rule::EvenOdd));
    assert!(is_in_polygon(LatLon::new(0.0, -179.5), &indexed, Rule::EvenOdd));
    assert!(!is_in_polygon(LatLon::new(0.0, 0.0), &indexed, Rule::EvenOdd));
}
