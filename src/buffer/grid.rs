use greatcircle::{normalize_longitude, LatLon};

/// Side of a grid cell, numbered counter-clockwise from the bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Side {
    Bottom = 0,
    Right = 1,
    Top = 2,
    Left = 3,
}

impl Side {
    pub(crate) const ALL: [Side; 4] = [Side::Bottom, Side::Right, Side::Top, Side::Left];

    #[inline] pub(crate) fn index(self) -> usize { self as usize }

    /// The next side counter-clockwise.
    #[inline] pub(crate) fn next(self) -> Side { Side::ALL[(self.index() + 1) % 4] }

    #[inline] pub(crate) fn opposite(self) -> Side { Side::ALL[(self.index() + 2) % 4] }
}

/// A grid cell, named by its bottom-left corner. Row `-1` and row
/// `rows - 1` are the virtual cells beyond the outermost parallels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Cell {
    pub(crate) row: isize,
    pub(crate) col: isize,
}

/// A cell side shared by two neighbouring cells.
///
/// `Horizontal { row, col }` runs along corner row `row` from column `col`
/// to `col + 1`; `Vertical { row, col }` runs along corner column `col` from
/// row `row` to `row + 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum SideKey {
    Horizontal { row: isize, col: isize },
    Vertical { row: isize, col: isize },
}

/// Regular lat/lon lattice of corner points covering the buffer region.
///
/// A wrapping grid spans the full circle of longitude and its column
/// indices are taken modulo `cols`. Corner rows outside `0..rows` (and, in a
/// non-wrapping grid, corner columns outside `0..cols`) are virtual.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Grid {
    lat0: f64,
    lat_top: f64,
    lon0: f64,
    res_lat: f64,
    res_lon: f64,
    rows: usize,
    cols: usize,
    wraps: bool,
}

impl Grid {
    /// A grid from `lat_lo` to `lat_hi`, over `[lon_lo, lon_hi]` or the full
    /// circle when `lon_range` is `None`.
    pub(crate) fn new(lat_lo: f64, lat_hi: f64, lon_range: Option<(f64, f64)>, resolution: f64) -> Self {
        debug_assert!(lat_hi > lat_lo && resolution > 0.0, "grid must have positive extent");

        let rows = ((lat_hi - lat_lo) / resolution).ceil() as usize + 1;
        match lon_range {
            Some((lon_lo, lon_hi)) => Self {
                lat0: lat_lo,
                lat_top: lat_hi,
                lon0: lon_lo,
                res_lat: resolution,
                res_lon: resolution,
                rows,
                cols: ((lon_hi - lon_lo) / resolution).ceil() as usize + 1,
                wraps: false,
            },
            None => {
                let cols = (360.0 / resolution).ceil() as usize;
                Self {
                    lat0: lat_lo,
                    lat_top: lat_hi,
                    lon0: -180.0,
                    res_lat: resolution,
                    res_lon: 360.0 / cols as f64,
                    rows,
                    cols,
                    wraps: true,
                }
            }
        }
    }

    /// Number of corner rows.
    #[inline] pub(crate) fn rows(&self) -> usize { self.rows }

    /// Number of distinct corner columns.
    #[inline] pub(crate) fn cols(&self) -> usize { self.cols }

    #[inline] pub(crate) fn wraps(&self) -> bool { self.wraps }

    #[inline] pub(crate) fn corner_count(&self) -> usize { self.rows * self.cols }

    #[inline]
    fn lat(&self, row: isize) -> f64 {
        (self.lat0 + row as f64 * self.res_lat).min(self.lat_top)
    }

    #[inline]
    fn lon(&self, col: isize) -> f64 { self.lon0 + col as f64 * self.res_lon }

    #[inline]
    fn wrap_col(&self, col: isize) -> isize {
        if self.wraps { col.rem_euclid(self.cols as isize) } else { col }
    }

    /// Array index of a real corner, or `None` for a virtual one.
    pub(crate) fn corner(&self, row: isize, col: isize) -> Option<(usize, usize)> {
        let col = self.wrap_col(col);
        let real = (0..self.rows as isize).contains(&row) && (0..self.cols as isize).contains(&col);
        real.then_some((row as usize, col as usize))
    }

    /// Position of a real corner.
    #[inline]
    pub(crate) fn location(&self, (row, col): (usize, usize)) -> LatLon {
        LatLon::new(self.lat(row as isize), normalize_longitude(self.lon(col as isize)))
    }

    /// Canonical cell at `(row, col)`, or `None` if it lies off the grid.
    pub(crate) fn cell(&self, row: isize, col: isize) -> Option<Cell> {
        let col = self.wrap_col(col);
        let last_col = if self.wraps { self.cols as isize } else { self.cols as isize - 1 };
        let real = (-1..self.rows as isize).contains(&row) && (0..last_col).contains(&col);
        real.then_some(Cell { row, col })
    }

    /// Every cell, row by row from the south.
    pub(crate) fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let last_col = if self.wraps { self.cols as isize } else { self.cols as isize - 1 };
        (-1..self.rows as isize).flat_map(move |row| (0..last_col).map(move |col| Cell { row, col }))
    }

    /// Number of cells, virtual rows included.
    pub(crate) fn cell_count(&self) -> usize {
        let cols = if self.wraps { self.cols } else { self.cols.saturating_sub(1) };
        (self.rows + 1) * cols
    }

    /// Corners of `cell` in counter-clockwise order from the bottom left, so
    /// that side `i` runs from corner `i` to corner `i + 1`.
    pub(crate) fn cell_corners(&self, cell: Cell) -> [(isize, isize); 4] {
        let Cell { row, col } = cell;
        [(row, col), (row, col + 1), (row + 1, col + 1), (row + 1, col)]
    }

    /// The shared-side key for `side` of `cell`.
    pub(crate) fn side_key(&self, cell: Cell, side: Side) -> SideKey {
        let Cell { row, col } = cell;
        match side {
            Side::Bottom => SideKey::Horizontal { row, col },
            Side::Top => SideKey::Horizontal { row: row + 1, col },
            Side::Left => SideKey::Vertical { row, col },
            Side::Right => SideKey::Vertical { row, col: self.wrap_col(col + 1) },
        }
    }

    /// Endpoints of a side, as corner coordinates.
    pub(crate) fn side_ends(&self, key: SideKey) -> ((isize, isize), (isize, isize)) {
        match key {
            SideKey::Horizontal { row, col } => ((row, col), (row, col + 1)),
            SideKey::Vertical { row, col } => ((row, col), (row + 1, col)),
        }
    }

    /// The point a fraction `t` of the way along a side between two real
    /// corners.
    pub(crate) fn side_point(&self, key: SideKey, t: f64) -> LatLon {
        match key {
            SideKey::Horizontal { row, col } => {
                LatLon::new(self.lat(row), normalize_longitude(self.lon(col) + t * self.res_lon))
            }
            SideKey::Vertical { row, col } => {
                let (lo, hi) = (self.lat(row), self.lat(row + 1));
                LatLon::new(lo + t * (hi - lo), normalize_longitude(self.lon(col)))
            }
        }
    }

    /// Centre of a cell, for error reporting.
    pub(crate) fn cell_center(&self, cell: Cell) -> LatLon {
        let lat = (self.lat0 + (cell.row as f64 + 0.5) * self.res_lat).clamp(-90.0, 90.0);
        LatLon::new(lat, normalize_longitude(self.lon(cell.col) + self.res_lon / 2.0))
    }

    /// The cell across `side` of `cell`, or `None` off the grid.
    pub(crate) fn neighbor(&self, cell: Cell, side: Side) -> Option<Cell> {
        let Cell { row, col } = cell;
        match side {
            Side::Bottom => self.cell(row - 1, col),
            Side::Right => self.cell(row, col + 1),
            Side::Top => self.cell(row + 1, col),
            Side::Left => self.cell(row, col - 1),
        }
    }
}
