use ahash::AHashSet;
use greatcircle::{distance, normalize_longitude, LatLon};

use crate::bounds::Bounds;
use crate::edge::{Edge, EdgeKey, VertexKey};
use crate::error::{Error, Result};
use crate::indexed::IndexedPolygon;
use crate::vertex_list::VertexList;

/// An ordered collection of great-circle edges forming one or more closed
/// loops.
///
/// Edges keep their insertion order, which need not be loop order. Every
/// stored edge has positive length and a longitude span of at most 180°:
/// antimeridian-crossing edges are split at `±180` on insertion.
#[derive(Clone, Debug, Default)]
pub struct Polygon {
    edges: Vec<Edge>,
    bounds: Bounds,
    keys: AHashSet<EdgeKey>,
}

impl Polygon {
    /// Create an empty polygon.
    pub fn new() -> Self { Self::default() }

    /// Build a polygon from vertex loops, closing any loop whose last vertex
    /// does not repeat its first.
    ///
    /// With `validate`, out-of-range coordinates are rejected; otherwise they
    /// are clipped. Loops with fewer than three distinct vertices are
    /// rejected either way.
    pub fn from_vertex_list(list: &VertexList, validate: bool) -> Result<Self> {
        let mut polygon = Polygon::new();

        for (i, ring) in list.loops().iter().enumerate() {
            let distinct = ring.iter().map(|&v| VertexKey::new(v)).collect::<AHashSet<_>>().len();
            if distinct < 3 {
                return Err(Error::DegenerateInput(format!("loop {i} has {distinct} distinct vertices")));
            }

            for pair in ring.windows(2) {
                polygon.add_segment(pair[0], pair[1], validate)?;
            }
            if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
                if first != last { polygon.add_segment(last, first, validate)?; }
            }
        }

        Ok(polygon)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline] pub fn edges(&self) -> &[Edge] { &self.edges }

    #[inline] pub fn edge(&self, i: usize) -> &Edge { &self.edges[i] }

    /// Number of stored edges.
    #[inline] pub fn len(&self) -> usize { self.edges.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.edges.is_empty() }

    /// Number of distinct vertices, matched on the rounding lattice.
    pub fn vertex_count(&self) -> usize {
        self.edges.iter()
            .flat_map(|edge| [VertexKey::new(edge.start()), VertexKey::new(edge.end())])
            .collect::<AHashSet<_>>()
            .len()
    }

    /// Aggregate bounding box of all stored edges.
    #[inline] pub fn bounds(&self) -> &Bounds { &self.bounds }

    /// Returns true if an edge with the same (rounded) endpoints and
    /// direction is already stored.
    #[inline] pub fn contains_edge(&self, edge: &Edge) -> bool { self.keys.contains(&edge.key()) }

    /// Freeze the polygon and attach lazily-built spatial indexes.
    #[inline] pub fn with_index(self) -> IndexedPolygon { IndexedPolygon::new(self) }

    // -----------------------------------------------------------------------
    // Insertion
    // -----------------------------------------------------------------------

    /// Insert an edge.
    ///
    /// Zero-length edges are dropped. Out-of-range endpoints are rejected
    /// when `validate` is set and clipped otherwise. Edges crossing the
    /// antimeridian are stored as two pieces split at `±180`, and the
    /// polygon's longitude bounds collapse to the full circle.
    ///
    /// Returns whether anything was stored.
    pub fn add_edge(&mut self, edge: Edge, validate: bool) -> Result<bool> {
        let edge = Self::checked(edge, validate)?;
        if edge.is_degenerate() { return Ok(false) }

        match edge.split_at_antimeridian() {
            Some((a, b)) => {
                self.bounds.extend_edge(&edge);
                let stored_a = self.push(a);
                let stored_b = self.push(b);
                Ok(stored_a || stored_b)
            }
            None => Ok(self.push(edge)),
        }
    }

    /// Insert the edge `start -> end`; see [`Polygon::add_edge`].
    #[inline]
    pub fn add_segment(&mut self, start: LatLon, end: LatLon, validate: bool) -> Result<bool> {
        self.add_edge(Edge::new(start, end), validate)
    }

    /// Insert an edge unless it (or every antimeridian piece of it) is
    /// already present. Used when assembling or merging polygons to
    /// suppress duplicates.
    ///
    /// Returns false if nothing new was stored.
    pub fn add_and_correct_edge(&mut self, edge: Edge) -> bool {
        let Ok(edge) = Self::checked(edge, false) else { return false };
        if edge.is_degenerate() { return false }

        match edge.split_at_antimeridian() {
            Some((a, b)) => {
                if self.contains_edge(&a) && self.contains_edge(&b) { return false }
                self.bounds.extend_edge(&edge);
                let stored_a = !self.contains_edge(&a) && self.push(a);
                let stored_b = !self.contains_edge(&b) && self.push(b);
                stored_a || stored_b
            }
            None => !self.contains_edge(&edge) && self.push(edge),
        }
    }

    /// Add every edge of `other` that is not already present. Returns the
    /// number of edges added.
    pub fn merge(&mut self, other: &Polygon) -> usize {
        other.edges.iter().filter(|&&edge| self.add_and_correct_edge(edge)).count()
    }

    /// The same loops traversed in the opposite direction.
    pub fn reversed(&self) -> Polygon {
        let mut polygon = Polygon::new();
        for edge in self.edges.iter().rev() {
            polygon.push(edge.reversed());
        }
        polygon
    }

    fn push(&mut self, edge: Edge) -> bool {
        if edge.is_degenerate() { return false }
        self.bounds.extend_edge(&edge);
        self.keys.insert(edge.key());
        self.edges.push(edge);
        true
    }

    fn checked(edge: Edge, validate: bool) -> Result<Edge> {
        let fix = |p: LatLon| -> Result<LatLon> {
            if !p.lat.is_finite() || !p.lon.is_finite() {
                return Err(Error::InvalidCoordinate { lat: p.lat, lon: p.lon });
            }
            if p.is_valid() { return Ok(p) }
            if validate { return Err(Error::InvalidCoordinate { lat: p.lat, lon: p.lon }) }
            Ok(LatLon::new(p.lat.clamp(-90.0, 90.0), normalize_longitude(p.lon)))
        };

        let (start, end) = (fix(edge.start())?, fix(edge.end())?);
        if start == edge.start() && end == edge.end() { return Ok(edge) }
        Ok(Edge::new(start, end))
    }

    // -----------------------------------------------------------------------
    // Conversion
    // -----------------------------------------------------------------------

    /// Reconstruct vertex loops from the edge sequence.
    ///
    /// A new loop starts wherever an edge does not begin at the previous
    /// edge's end, or once the current loop has closed. Antimeridian seams
    /// are kept as consecutive `180` / `-180` vertices.
    pub fn to_vertex_list(&self) -> VertexList {
        let mut list = VertexList::new();
        let mut current: Vec<LatLon> = Vec::new();

        for edge in &self.edges {
            let continues = match (current.first(), current.last()) {
                (Some(first), Some(last)) => {
                    let closed = current.len() > 2 && first.same_position(last);
                    !closed && last.same_position(&edge.start())
                }
                _ => false,
            };

            if continues {
                if current.last() != Some(&edge.start()) { current.push(edge.start()) }
            } else {
                if !current.is_empty() { list.push_loop(std::mem::take(&mut current)) }
                current.push(edge.start());
            }
            current.push(edge.end());
        }
        if !current.is_empty() { list.push_loop(current) }

        list
    }

    // -----------------------------------------------------------------------
    // Measures
    // -----------------------------------------------------------------------

    /// Total edge length in km. With `bounds`, only edges whose midpoint
    /// falls inside the box are counted.
    pub fn perimeter(&self, bounds: Option<&Bounds>) -> f64 {
        self.edges.iter()
            .filter(|edge| bounds.is_none_or(|b| b.contains(edge.midpoint())))
            .map(Edge::length_km)
            .sum()
    }

    /// Largest great-circle distance (km) between any two vertices.
    pub fn diameter(&self) -> f64 {
        let mut seen = AHashSet::new();
        let vertices = self.edges.iter()
            .flat_map(|edge| [edge.start(), edge.end()])
            .filter(|&v| seen.insert(VertexKey::new(v)))
            .collect::<Vec<_>>();

        let mut best = 0.0_f64;
        for (i, &a) in vertices.iter().enumerate() {
            for &b in &vertices[i + 1..] {
                best = best.max(distance(a, b));
            }
        }
        best
    }
}
