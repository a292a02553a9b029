//! Geodesic buffering: the region within a fixed great-circle distance of a
//! polygon, traced with marching squares over a lat/lon grid.

mod grid;
mod march;

use greatcircle::{LatLon, KM_PER_DEGREE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::edge::Edge;
use crate::error::{Error, Result};
use crate::geometry::{disk_intersects_polygon, Rule};
use crate::indexed::IndexedPolygon;
use crate::polygon::Polygon;

use grid::Grid;
use march::Marcher;

/// Grid rows stop this far (degrees) short of the poles.
const POLE_GAP: f64 = 1e-4;

/// Refuse grids with more corners than this.
const MAX_CORNERS: usize = 50_000_000;

/// Parameters of a buffer operation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferOptions {
    /// Buffer distance in km.
    pub radius_km: f64,
    /// Grid spacing in degrees.
    pub resolution_deg: f64,
    /// Fill rule for the input polygon.
    pub rule: Rule,
    /// Bisection steps used to place each boundary crossing.
    pub bisection_rounds: u32,
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self { radius_km: 0.0, resolution_deg: 0.1, rule: Rule::EvenOdd, bisection_rounds: 5 }
    }
}

impl BufferOptions {
    pub fn new(radius_km: f64, resolution_deg: f64) -> Self {
        Self { radius_km, resolution_deg, ..Self::default() }
    }

    #[inline] pub fn with_rule(self, rule: Rule) -> Self { Self { rule, ..self } }

    #[inline] pub fn with_bisection_rounds(self, bisection_rounds: u32) -> Self { Self { bisection_rounds, ..self } }

    pub fn validate(&self) -> Result<()> {
        if !(self.radius_km >= 0.0) || self.radius_km.is_infinite() {
            return Err(Error::invalid_parameter("radius_km", self.radius_km, "must be finite and non-negative"));
        }
        if !(self.resolution_deg > 0.0 && self.resolution_deg <= 90.0) {
            return Err(Error::invalid_parameter("resolution_deg", self.resolution_deg, "must be in (0, 90]"));
        }
        if self.bisection_rounds > 52 {
            return Err(Error::invalid_parameter("bisection_rounds", self.bisection_rounds, "must be at most 52"));
        }
        Ok(())
    }
}

/// Buffer `polygon` outward by `options.radius_km`.
///
/// Every grid corner is classified as inside when its disk of the buffer
/// radius touches the polygon, and the inside region's boundary is traced
/// into a new polygon whose loops keep the buffered region on their left.
/// If a pole lies within the buffer, the grid wraps the full circle of
/// longitude and the loop around that pole closes along the outermost
/// parallel.
pub fn buffer(polygon: &IndexedPolygon, options: &BufferOptions) -> Result<Polygon> {
    options.validate()?;
    if polygon.is_empty() {
        return Err(Error::DegenerateInput("cannot buffer an empty polygon".into()));
    }

    let grid = plan_grid(polygon, options)?;
    info!(
        radius_km = options.radius_km,
        resolution_deg = options.resolution_deg,
        rows = grid.rows(),
        cols = grid.cols(),
        wraps = grid.wraps(),
        "buffering polygon"
    );

    let loops = Marcher::new(polygon, options.radius_km, options.rule, options.bisection_rounds, grid).run()?;

    let mut result = Polygon::new();
    for ring in &loops {
        for pair in ring.windows(2) {
            result.add_and_correct_edge(Edge::new(pair[0], pair[1]));
        }
    }

    debug!(loops = loops.len(), edges = result.len(), "buffer traced");
    Ok(result)
}

/// Size the grid: the polygon's true latitude range and longitude bounds,
/// grown by the radius plus one cell.
fn plan_grid(polygon: &IndexedPolygon, options: &BufferOptions) -> Result<Grid> {
    let res = options.resolution_deg;
    let reach = options.radius_km / KM_PER_DEGREE;

    let (lat_min, lat_max) = polygon.edges().iter()
        .map(|edge| edge.latitude_extent())
        .fold((90.0_f64, -90.0_f64), |(lo, hi), (a, b)| (lo.min(a), hi.max(b)));

    let south = disk_intersects_polygon(LatLon::SOUTH_POLE, polygon, options.radius_km, options.rule)?;
    let north = disk_intersects_polygon(LatLon::NORTH_POLE, polygon, options.radius_km, options.rule)?;
    if south { debug!("south pole lies within the buffer") }
    if north { debug!("north pole lies within the buffer") }

    let lat_lo = (if south { -90.0 } else { lat_min - reach - res }).max(-90.0 + POLE_GAP);
    let lat_hi = (if north { 90.0 } else { lat_max + reach + res }).min(90.0 - POLE_GAP);

    // Meridians converge poleward, so the longitude margin is set by the
    // most poleward latitude on the grid.
    let bounds = polygon.bounds();
    let poleward = lat_lo.abs().max(lat_hi.abs());
    let ratio = reach.to_radians().sin() / poleward.to_radians().cos();
    let lon_range = match ratio < 1.0 && !south && !north && !bounds.wraps() {
        true => {
            let margin = ratio.asin().to_degrees() + res;
            let (lo, hi) = (bounds.lon_min - margin, bounds.lon_max + margin);
            (lo - res >= -180.0 && hi + res <= 180.0).then_some((lo, hi))
        }
        false => None,
    };

    let grid = Grid::new(lat_lo, lat_hi, lon_range, res);
    if grid.corner_count() > MAX_CORNERS {
        return Err(Error::invalid_parameter(
            "resolution_deg",
            res,
            format!("grid would need {} corners", grid.corner_count()),
        ));
    }
    Ok(grid)
}
