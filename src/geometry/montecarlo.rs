use std::f64::consts::PI;

use greatcircle::{cap_area, destination, distance, LatLon, EARTH_RADIUS_KM};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::indexed::IndexedPolygon;

use super::contains::is_in_polygon;
use super::Rule;

/// Samples drawn per parallel work unit; each unit gets its own seeded RNG.
const CHUNK: usize = 4096;

/// Draw a point uniformly at random from the spherical cap of `radius_km`
/// around `center`.
pub fn sample_in_cap<R: Rng + ?Sized>(center: LatLon, radius_km: f64, rng: &mut R) -> LatLon {
    let theta_max = (radius_km / EARTH_RADIUS_KM).clamp(0.0, PI);
    let u: f64 = rng.random();
    let theta = (1.0 - u * (1.0 - theta_max.cos())).clamp(-1.0, 1.0).acos();
    let bearing = rng.random::<f64>() * 360.0;
    destination(center, bearing, theta * EARTH_RADIUS_KM)
}

/// A cap guaranteed to hold the whole polygon: centred on the normalised
/// mean of the vertex unit vectors, reaching the farthest vertex plus half
/// the longest edge.
fn enclosing_cap(polygon: &IndexedPolygon) -> (LatLon, f64) {
    let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
    for edge in polygon.edges() {
        let (lat, lon) = edge.start().to_radians();
        x += lat.cos() * lon.cos();
        y += lat.cos() * lon.sin();
        z += lat.sin();
    }

    let norm = (x * x + y * y + z * z).sqrt();
    if norm < 1e-9 { return (LatLon::NORTH_POLE, PI * EARTH_RADIUS_KM) }
    let center = LatLon::new((z / norm).clamp(-1.0, 1.0).asin().to_degrees(), y.atan2(x).to_degrees());

    let (reach, longest) = polygon.edges().iter().fold((0.0_f64, 0.0_f64), |(reach, longest), edge| {
        (reach.max(distance(center, edge.start())).max(distance(center, edge.end())), longest.max(edge.length_km()))
    });
    (center, (reach + longest / 2.0).min(PI * EARTH_RADIUS_KM))
}

fn check_samples(polygon: &IndexedPolygon, samples: usize) -> Result<()> {
    if samples == 0 {
        return Err(Error::invalid_parameter("samples", samples, "must be positive"));
    }
    if polygon.is_empty() {
        return Err(Error::DegenerateInput("polygon has no edges".into()));
    }
    Ok(())
}

/// Monte-Carlo estimate of the area of `polygon` in km², from `samples`
/// points drawn uniformly from an enclosing cap.
pub fn estimate_area<R: Rng + ?Sized>(polygon: &IndexedPolygon, rule: Rule, samples: usize, rng: &mut R) -> Result<f64> {
    check_samples(polygon, samples)?;
    let (center, radius) = enclosing_cap(polygon);

    let hits = (0..samples)
        .filter(|_| is_in_polygon(sample_in_cap(center, radius, rng), polygon, rule))
        .count();
    Ok(cap_area(radius) * hits as f64 / samples as f64)
}

/// Monte-Carlo estimate of the area (km²) covered by both `a` and `b`.
/// Points are drawn from a cap enclosing `a`.
pub fn estimate_intersection_area<R: Rng + ?Sized>(
    a: &IndexedPolygon,
    b: &IndexedPolygon,
    rule: Rule,
    samples: usize,
    rng: &mut R,
) -> Result<f64> {
    check_samples(a, samples)?;
    if b.is_empty() { return Ok(0.0) }
    let (center, radius) = enclosing_cap(a);

    let hits = (0..samples)
        .map(|_| sample_in_cap(center, radius, rng))
        .filter(|&p| is_in_polygon(p, a, rule) && is_in_polygon(p, b, rule))
        .count();
    Ok(cap_area(radius) * hits as f64 / samples as f64)
}

/// Count hits over `samples` points, split into seeded chunks on the rayon
/// pool. Deterministic for a given seed regardless of thread count.
fn parallel_hits(center: LatLon, radius: f64, samples: usize, seed: u64, hit: impl Fn(LatLon) -> bool + Sync) -> usize {
    let chunks = samples.div_ceil(CHUNK);
    (0..chunks).into_par_iter()
        .map(|chunk| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(chunk as u64));
            let n = CHUNK.min(samples - chunk * CHUNK);
            (0..n).filter(|_| hit(sample_in_cap(center, radius, &mut rng))).count()
        })
        .sum()
}

/// Parallel [`estimate_area`], seeded per chunk from `seed`.
pub fn estimate_area_par(polygon: &IndexedPolygon, rule: Rule, samples: usize, seed: u64) -> Result<f64> {
    check_samples(polygon, samples)?;
    let (center, radius) = enclosing_cap(polygon);

    let hits = parallel_hits(center, radius, samples, seed, |p| is_in_polygon(p, polygon, rule));
    Ok(cap_area(radius) * hits as f64 / samples as f64)
}

/// Parallel [`estimate_intersection_area`], seeded per chunk from `seed`.
pub fn estimate_intersection_area_par(
    a: &IndexedPolygon,
    b: &IndexedPolygon,
    rule: Rule,
    samples: usize,
    seed: u64,
) -> Result<f64> {
    check_samples(a, samples)?;
    if b.is_empty() { return Ok(0.0) }
    let (center, radius) = enclosing_cap(a);

    let hits = parallel_hits(center, radius, samples, seed, |p| is_in_polygon(p, a, rule) && is_in_polygon(p, b, rule));
    Ok(cap_area(radius) * hits as f64 / samples as f64)
}
