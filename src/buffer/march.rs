use ahash::{AHashMap, AHashSet};
use greatcircle::LatLon;
use ndarray::Array2;
use smallvec::SmallVec;
use tracing::trace;

use crate::error::{Error, Result};
use crate::geometry::{disk_intersects_polygon, Rule};
use crate::indexed::IndexedPolygon;

use super::grid::{Cell, Grid, Side, SideKey};

/// Marching-squares tracer over a corner grid classified by "within the
/// buffer radius of the polygon".
///
/// Corner classifications and side crossings are computed lazily and
/// cached. Boundary segments run from a cell's inside-to-outside side to its
/// outside-to-inside side (corners taken counter-clockwise), which keeps the
/// buffered region on the left of every traced loop.
pub(crate) struct Marcher<'a> {
    polygon: &'a IndexedPolygon,
    radius_km: f64,
    rule: Rule,
    bisection_rounds: u32,
    grid: Grid,
    corners: Array2<Option<bool>>,
    crossings: AHashMap<SideKey, LatLon>,
    used: AHashSet<(Cell, Side)>,
    saddle_visits: AHashMap<Cell, u8>,
}

impl<'a> Marcher<'a> {
    pub(crate) fn new(polygon: &'a IndexedPolygon, radius_km: f64, rule: Rule, bisection_rounds: u32, grid: Grid) -> Self {
        Self {
            polygon,
            radius_km,
            rule,
            bisection_rounds,
            grid,
            corners: Array2::from_elem((grid.rows(), grid.cols()), None),
            crossings: AHashMap::new(),
            used: AHashSet::new(),
            saddle_visits: AHashMap::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Classification
    // -----------------------------------------------------------------------

    #[inline]
    fn within(&self, point: LatLon) -> Result<bool> {
        disk_intersects_polygon(point, self.polygon, self.radius_km, self.rule)
    }

    /// Classification of a corner; virtual corners are always outside.
    fn inside(&mut self, row: isize, col: isize) -> Result<bool> {
        let Some(index) = self.grid.corner(row, col) else { return Ok(false) };
        if let Some(inside) = self.corners[[index.0, index.1]] { return Ok(inside) }

        let inside = self.within(self.grid.location(index))?;
        self.corners[[index.0, index.1]] = Some(inside);
        Ok(inside)
    }

    fn corner_states(&mut self, cell: Cell) -> Result<[bool; 4]> {
        let mut states = [false; 4];
        for (state, (row, col)) in states.iter_mut().zip(self.grid.cell_corners(cell)) {
            *state = self.inside(row, col)?;
        }
        Ok(states)
    }

    /// Sides through which the boundary enters `cell`: those running from an
    /// inside corner to an outside one.
    fn entries(&mut self, cell: Cell) -> Result<SmallVec<[Side; 2]>> {
        let states = self.corner_states(cell)?;
        Ok(Side::ALL.into_iter()
            .filter(|side| states[side.index()] && !states[(side.index() + 1) % 4])
            .collect())
    }

    /// The side the boundary leaves `cell` by after entering through `entry`.
    ///
    /// Saddle cells pair each entry with the next side counter-clockwise,
    /// joining the two inside corners. A saddle used more than twice is
    /// ambiguous.
    fn exit(&mut self, cell: Cell, entry: Side) -> Result<Option<Side>> {
        let states = self.corner_states(cell)?;
        let is_entry = |side: Side| states[side.index()] && !states[(side.index() + 1) % 4];
        let is_exit = |side: Side| !states[side.index()] && states[(side.index() + 1) % 4];

        if !is_entry(entry) { return Ok(None) }

        if Side::ALL.into_iter().filter(|&side| is_entry(side)).count() == 2 {
            // `used` stops a closed trace from entering the same side twice,
            // so a third visit means a walk re-entered an already paired saddle.
            let visits = self.saddle_visits.entry(cell).or_default();
            *visits += 1;
            if *visits > 2 {
                let center = self.grid.cell_center(cell);
                return Err(Error::AmbiguousSaddle { lat: center.lat, lon: center.lon });
            }
            return Ok(Some(entry.next()));
        }

        Ok(Side::ALL.into_iter().find(|&side| is_exit(side)))
    }

    // -----------------------------------------------------------------------
    // Crossings
    // -----------------------------------------------------------------------

    /// Where the boundary crosses `side` of `cell`.
    ///
    /// Between two real corners the crossing is refined by bisection. When
    /// one corner is virtual the crossing sits on the real corner, which
    /// closes loops along the outermost parallel.
    fn crossing(&mut self, cell: Cell, side: Side) -> Result<LatLon> {
        let key = self.grid.side_key(cell, side);
        if let Some(&point) = self.crossings.get(&key) { return Ok(point) }

        let (a, b) = self.grid.side_ends(key);
        let point = match (self.grid.corner(a.0, a.1), self.grid.corner(b.0, b.1)) {
            (Some(_), Some(_)) => {
                let (mut t_in, mut t_out) = if self.inside(a.0, a.1)? { (0.0, 1.0) } else { (1.0, 0.0) };
                for _ in 0..self.bisection_rounds {
                    let t = (t_in + t_out) / 2.0;
                    if self.within(self.grid.side_point(key, t))? { t_in = t } else { t_out = t }
                }
                self.grid.side_point(key, (t_in + t_out) / 2.0)
            }
            (Some(real), None) | (None, Some(real)) => self.grid.location(real),
            (None, None) => return Err(self.unclosed(cell)),
        };

        self.crossings.insert(key, point);
        Ok(point)
    }

    fn unclosed(&self, cell: Cell) -> Error {
        let center = self.grid.cell_center(cell);
        Error::UnclosedBoundary { lat: center.lat, lon: center.lon }
    }

    // -----------------------------------------------------------------------
    // Tracing
    // -----------------------------------------------------------------------

    /// Follow the boundary from `entry` of `start` until it returns there.
    fn trace(&mut self, start: Cell, entry: Side) -> Result<Vec<LatLon>> {
        let limit = 4 * self.grid.cell_count() + 4;
        let mut points = vec![self.crossing(start, entry)?];
        let (mut cell, mut side) = (start, entry);

        for _ in 0..limit {
            let exit = self.exit(cell, side)?.ok_or_else(|| self.unclosed(cell))?;
            if !self.used.insert((cell, side)) { return Err(self.unclosed(cell)) }
            points.push(self.crossing(cell, exit)?);

            let next = self.grid.neighbor(cell, exit).ok_or_else(|| self.unclosed(cell))?;
            let next_side = exit.opposite();
            if next == start && next_side == entry {
                trace!(start = ?start, points = points.len(), "closed boundary loop");
                return Ok(points);
            }
            (cell, side) = (next, next_side);
        }

        Err(self.unclosed(start))
    }

    /// Trace every boundary loop in the grid.
    pub(crate) fn run(mut self) -> Result<Vec<Vec<LatLon>>> {
        let grid = self.grid;
        let mut loops = Vec::new();

        for cell in grid.cells() {
            for entry in self.entries(cell)? {
                if self.used.contains(&(cell, entry)) { continue }
                loops.push(self.trace(cell, entry)?);
            }
        }

        Ok(loops)
    }
}
