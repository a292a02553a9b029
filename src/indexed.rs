use std::collections::VecDeque;
use std::sync::OnceLock;

use ahash::AHashMap;
use tracing::debug;

use crate::bounds::Bounds;
use crate::edge::{Edge, VertexKey};
use crate::error::Result;
use crate::index::{IntervalIndex, RegionBounds};
use crate::polygon::Polygon;

/// Connected components of the polygon's edge graph.
#[derive(Clone, Debug)]
struct Components {
    count: usize,
    of_edge: Vec<u32>,
}

/// A frozen [`Polygon`] with spatial indexes built on first use.
///
/// Indexes are never patched incrementally: to edit the polygon, take it
/// back with [`IndexedPolygon::into_inner`] and re-index afterwards.
#[derive(Debug)]
pub struct IndexedPolygon {
    polygon: Polygon,
    band_width: f64,

    // ----- Lazy indexes -----

    intervals: OnceLock<IntervalIndex>,
    regions: OnceLock<RegionBounds>,
    components: OnceLock<Components>,
}

impl IndexedPolygon {
    pub fn new(polygon: Polygon) -> Self {
        Self {
            polygon,
            band_width: RegionBounds::DEFAULT_BAND_WIDTH,
            intervals: OnceLock::new(),
            regions: OnceLock::new(),
            components: OnceLock::new(),
        }
    }

    /// Index `polygon` with a custom latitude band width (degrees) for
    /// radius queries. The width must be in `(0, 180]`.
    pub fn with_band_width(polygon: Polygon, band_width: f64) -> Result<Self> {
        RegionBounds::check_width(band_width)?;
        Ok(Self { band_width, ..Self::new(polygon) })
    }

    #[inline] pub fn polygon(&self) -> &Polygon { &self.polygon }

    /// Release the polygon, dropping its indexes.
    #[inline] pub fn into_inner(self) -> Polygon { self.polygon }

    #[inline] pub fn edges(&self) -> &[Edge] { self.polygon.edges() }

    #[inline] pub fn edge(&self, i: usize) -> &Edge { self.polygon.edge(i) }

    #[inline] pub fn len(&self) -> usize { self.polygon.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.polygon.is_empty() }

    #[inline] pub fn bounds(&self) -> &Bounds { self.polygon.bounds() }

    /// Per-axis breakpoint index, built on first use.
    pub fn intervals(&self) -> &IntervalIndex {
        self.intervals.get_or_init(|| IntervalIndex::new(self.polygon.edges()))
    }

    /// Latitude-band index, built on first use.
    pub fn regions(&self) -> &RegionBounds {
        self.regions.get_or_init(|| RegionBounds::build(self.polygon.edges(), self.band_width))
    }

    fn components(&self) -> &Components {
        self.components.get_or_init(|| self.find_components())
    }

    /// Number of connected edge loops (edges joined through shared vertices).
    #[inline] pub fn component_count(&self) -> usize { self.components().count }

    /// Component id of edge `i`, in `0..component_count()`.
    #[inline] pub fn component_of(&self, i: usize) -> usize { self.components().of_edge[i] as usize }

    /// Label edges by connected component, joining edges through vertices
    /// that coincide on the rounding lattice.
    fn find_components(&self) -> Components {
        let edges = self.polygon.edges();

        let mut ids = AHashMap::new();
        let mut id = |p| { let next = ids.len() as u32; *ids.entry(VertexKey::new(p)).or_insert(next) };
        let ends = edges.iter().map(|e| (id(e.start()), id(e.end()))).collect::<Vec<_>>();

        let mut adjacent = vec![Vec::new(); ids.len()];
        for &(a, b) in &ends {
            adjacent[a as usize].push(b);
            adjacent[b as usize].push(a);
        }

        let mut label = vec![u32::MAX; adjacent.len()];
        let mut count = 0;
        for u in 0..adjacent.len() {
            if label[u] != u32::MAX { continue }
            label[u] = count;
            let mut queue = VecDeque::from([u]);
            while let Some(v) = queue.pop_front() {
                for &w in &adjacent[v] {
                    if label[w as usize] == u32::MAX {
                        label[w as usize] = count;
                        queue.push_back(w as usize);
                    }
                }
            }
            count += 1;
        }

        debug!(edges = edges.len(), components = count, "labelled polygon components");

        Components {
            count: count as usize,
            of_edge: ends.iter().map(|&(a, _)| label[a as usize]).collect(),
        }
    }

    /// Number of disjoint regions.
    ///
    /// With `bounds`, components lying wholly inside the box count once each,
    /// and a component that leaves the box counts once per two boundary
    /// crossings (at least once). Components with no vertex inside the box
    /// are not counted.
    pub fn disjoint_regions(&self, bounds: Option<&Bounds>) -> usize {
        let Some(bounds) = bounds else { return self.component_count() };

        let mut inside = vec![false; self.component_count()];
        let mut outside = vec![false; self.component_count()];
        let mut crossings = vec![0usize; self.component_count()];

        for (i, edge) in self.edges().iter().enumerate() {
            let c = self.component_of(i);
            let (a, b) = (bounds.contains(edge.start()), bounds.contains(edge.end()));
            inside[c] |= a || b;
            outside[c] |= !a || !b;
            if a != b { crossings[c] += 1 }
        }

        (0..self.component_count())
            .filter(|&c| inside[c])
            .map(|c| if outside[c] { (crossings[c] / 2).max(1) } else { 1 })
            .sum()
    }

    /// Exact spherical area in km²; see [`crate::geometry::area_exact`].
    #[inline]
    pub fn area_exact(&self, rule: crate::geometry::Rule) -> Result<f64> {
        crate::geometry::area_exact(self, rule)
    }

    /// Total edge length in km; see [`Polygon::perimeter`].
    #[inline] pub fn perimeter(&self, bounds: Option<&Bounds>) -> f64 { self.polygon.perimeter(bounds) }

    /// Largest vertex-to-vertex distance in km; see [`Polygon::diameter`].
    #[inline] pub fn diameter(&self) -> f64 { self.polygon.diameter() }
}

impl From<Polygon> for IndexedPolygon {
    fn from(polygon: Polygon) -> Self { IndexedPolygon::new(polygon) }
}
