use tracing::trace;

use crate::edge::Edge;

/// Breakpoint index over half-open intervals on one axis.
///
/// Breakpoints are the sorted, distinct interval endpoints. Each interval
/// `[lo, hi)` is registered at every breakpoint `b` with `lo <= b < hi`, so
/// a query for `v` only needs the list at the greatest breakpoint `<= v`.
#[derive(Clone, Debug, Default)]
pub struct AxisIndex {
    breakpoints: Vec<f64>,
    offsets: Vec<u32>,
    entries: Vec<u32>,
}

impl AxisIndex {
    /// Build from one `(lo, hi)` interval per item; item ids are positions.
    pub fn new(intervals: &[(f64, f64)]) -> Self {
        let mut breakpoints = intervals.iter()
            .flat_map(|&(lo, hi)| [lo, hi])
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        breakpoints.sort_by(f64::total_cmp);
        breakpoints.dedup();

        let mut buckets = vec![Vec::new(); breakpoints.len()];
        for (i, &(lo, hi)) in intervals.iter().enumerate() {
            let first = breakpoints.partition_point(|&b| b < lo);
            for (bucket, _) in buckets[first..].iter_mut()
                .zip(&breakpoints[first..])
                .take_while(|&(_, &b)| b < hi)
            {
                bucket.push(i as u32);
            }
        }

        let (offsets, entries) = super::compress(&buckets);
        Self { breakpoints, offsets, entries }
    }

    /// Number of distinct breakpoints.
    #[inline] pub fn breakpoint_count(&self) -> usize { self.breakpoints.len() }

    /// Total number of (breakpoint, item) registrations.
    #[inline] pub fn entry_count(&self) -> usize { self.entries.len() }

    /// Items whose interval contains `value` (half-open).
    #[inline]
    pub fn query(&self, value: f64) -> &[u32] {
        match self.breakpoints.partition_point(|&b| b <= value) {
            0 => &[],
            i => &self.entries[self.offsets[i - 1] as usize .. self.offsets[i] as usize],
        }
    }
}

/// Per-axis breakpoint indexes over a polygon's edges.
///
/// The longitude index answers "which edges span this meridian", the
/// latitude index "which edges span this parallel". Both are exact: a query
/// returns precisely the edges whose half-open bounding interval contains
/// the value.
#[derive(Clone, Debug, Default)]
pub struct IntervalIndex {
    latitude: AxisIndex,
    longitude: AxisIndex,
}

impl IntervalIndex {
    pub fn new(edges: &[Edge]) -> Self {
        let latitude = AxisIndex::new(&edges.iter().map(|e| (e.lat_min(), e.lat_max())).collect::<Vec<_>>());
        let longitude = AxisIndex::new(&edges.iter().map(|e| (e.lon_min(), e.lon_max())).collect::<Vec<_>>());

        trace!(
            edges = edges.len(),
            lat_breakpoints = latitude.breakpoint_count(),
            lon_breakpoints = longitude.breakpoint_count(),
            "built interval index"
        );

        Self { latitude, longitude }
    }

    #[inline] pub fn latitude(&self) -> &AxisIndex { &self.latitude }

    #[inline] pub fn longitude(&self) -> &AxisIndex { &self.longitude }

    /// Edges whose longitude interval contains `lon`.
    #[inline]
    pub fn edges_at_longitude(&self, lon: f64) -> impl Iterator<Item = usize> + '_ {
        self.longitude.query(lon).iter().map(|&i| i as usize)
    }

    /// Edges whose latitude interval contains `lat`.
    #[inline]
    pub fn edges_at_latitude(&self, lat: f64) -> impl Iterator<Item = usize> + '_ {
        self.latitude.query(lat).iter().map(|&i| i as usize)
    }
}
