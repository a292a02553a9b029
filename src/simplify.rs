use ahash::{AHashMap, AHashSet};
use greatcircle::{LatLon, KM_PER_DEGREE};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geometry::find_minimum_distance;
use crate::polygon::Polygon;

/// Cancel shared boundaries between adjacent pieces.
///
/// Vertices are rounded to the 1e-7° lattice and each directed edge counted.
/// An edge survives, once and in its first position, only if it occurs more
/// often in its own direction than reversed. Edges shared by two pieces in
/// opposite directions thus cancel, leaving the outer boundary.
pub fn remove_duplicate_edges(polygon: &Polygon) -> Polygon {
    let mut counts = AHashMap::<_, usize>::new();
    for edge in polygon.edges() {
        *counts.entry(edge.key()).or_default() += 1;
    }

    let mut emitted = AHashSet::new();
    let mut result = Polygon::new();
    for edge in polygon.edges() {
        let (a, b) = edge.key();
        let forward = counts.get(&(a, b)).copied().unwrap_or(0);
        let backward = counts.get(&(b, a)).copied().unwrap_or(0);
        if forward > backward && emitted.insert((a, b)) {
            result.add_and_correct_edge(*edge);
        }
    }

    debug!(before = polygon.len(), after = result.len(), "removed duplicate edges");
    result
}

/// Simplify every loop of `polygon` with Douglas-Peucker at tolerance
/// `epsilon_deg` (degrees of arc).
///
/// Each loop is cut into thirds that are simplified independently, so a
/// closed loop can never collapse onto its own start/end vertex.
pub fn simplify(polygon: &Polygon, epsilon_deg: f64) -> Result<Polygon> {
    if !(epsilon_deg >= 0.0) {
        return Err(Error::invalid_parameter("epsilon_deg", epsilon_deg, "must be non-negative"));
    }

    let mut result = Polygon::new();
    for ring in polygon.to_vertex_list().loops() {
        let simplified = simplify_loop(ring, epsilon_deg);
        for pair in simplified.windows(2) {
            result.add_segment(pair[0], pair[1], false)?;
        }
    }

    debug!(before = polygon.len(), after = result.len(), epsilon_deg, "simplified polygon");
    Ok(result)
}

fn simplify_loop(ring: &[LatLon], epsilon_deg: f64) -> Vec<LatLon> {
    let n = ring.len();
    if n < 4 { return ring.to_vec() }

    let (first, second) = ((n - 1) / 3, 2 * (n - 1) / 3);
    let mut out = douglas_peucker(&ring[..=first], epsilon_deg);
    for part in [&ring[first..=second], &ring[second..]] {
        out.extend(douglas_peucker(part, epsilon_deg).into_iter().skip(1));
    }
    out
}

/// Douglas-Peucker simplification of an open vertex chain.
///
/// The chain's endpoints are always kept. An interior vertex is kept when it
/// lies at least `epsilon_deg` degrees of arc from the chord of the span it
/// splits. With `epsilon_deg == 0` nothing is removed.
pub fn douglas_peucker(vertices: &[LatLon], epsilon_deg: f64) -> Vec<LatLon> {
    let n = vertices.len();
    if n < 3 { return vertices.to_vec() }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0, n - 1)];
    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 { continue }

        let (index, farthest) = (first + 1..last)
            .map(|i| (i, find_minimum_distance(vertices[i], vertices[first], vertices[last]) / KM_PER_DEGREE))
            .fold((first + 1, f64::NEG_INFINITY), |best, cur| if cur.1 > best.1 { cur } else { best });

        if farthest >= epsilon_deg {
            keep[index] = true;
            stack.push((first, index));
            stack.push((index, last));
        }
    }

    vertices.iter().zip(&keep).filter_map(|(&v, &k)| k.then_some(v)).collect()
}
