use geo::{Coord, LineString, MultiLineString, MultiPolygon, Polygon as GeoPolygon};
use greatcircle::LatLon;
use serde::{Deserialize, Serialize};

/// Plain vertex chains: the interchange shape consumed and produced by the
/// engine.
///
/// Each loop is an ordered list of vertices. Closed loops repeat their first
/// vertex at the end.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexList {
    loops: Vec<Vec<LatLon>>,
}

impl VertexList {
    #[inline] pub fn new() -> Self { Self::default() }

    #[inline] pub fn from_loops(loops: Vec<Vec<LatLon>>) -> Self { Self { loops } }

    /// Split a flat vertex sequence into loops: a loop ends when its first
    /// vertex is repeated. A trailing unclosed run becomes a final loop.
    pub fn from_vertices(vertices: impl IntoIterator<Item = LatLon>) -> Self {
        let mut loops = Vec::new();
        let mut current: Vec<LatLon> = Vec::new();

        for v in vertices {
            let closes = current.len() > 1 && current[0] == v;
            current.push(v);
            if closes { loops.push(std::mem::take(&mut current)) }
        }
        if !current.is_empty() { loops.push(current) }

        Self { loops }
    }

    /// Group `(polygon_id, lat, lon)` rows by id, in order of first
    /// appearance, splitting each id's run into closed loops.
    pub fn from_triples(rows: impl IntoIterator<Item = (u32, f64, f64)>) -> Vec<(u32, VertexList)> {
        let mut grouped: Vec<(u32, Vec<LatLon>)> = Vec::new();
        for (id, lat, lon) in rows {
            match grouped.iter_mut().find(|(gid, _)| *gid == id) {
                Some((_, vertices)) => vertices.push(LatLon::new(lat, lon)),
                None => grouped.push((id, vec![LatLon::new(lat, lon)])),
            }
        }
        grouped.into_iter()
            .map(|(id, vertices)| (id, VertexList::from_vertices(vertices)))
            .collect()
    }

    /// Flatten into `(polygon_id, lat, lon)` rows, all tagged with `id`.
    pub fn to_triples(&self, id: u32) -> Vec<(u32, f64, f64)> {
        self.vertices().map(|v| (id, v.lat, v.lon)).collect()
    }

    #[inline] pub fn loops(&self) -> &[Vec<LatLon>] { &self.loops }

    #[inline] pub fn into_loops(self) -> Vec<Vec<LatLon>> { self.loops }

    #[inline] pub fn push_loop(&mut self, vertices: Vec<LatLon>) { self.loops.push(vertices) }

    /// Number of loops.
    #[inline] pub fn len(&self) -> usize { self.loops.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.loops.is_empty() }

    /// Total number of vertices across all loops (closing repeats included).
    #[inline] pub fn vertex_count(&self) -> usize { self.loops.iter().map(Vec::len).sum() }

    /// Iterate over every vertex of every loop, in order.
    #[inline]
    pub fn vertices(&self) -> impl Iterator<Item = LatLon> + '_ {
        self.loops.iter().flatten().copied()
    }

    /// Loops as a `MultiLineString` in (lon, lat) order.
    pub fn to_multi_line_string(&self) -> MultiLineString<f64> {
        MultiLineString::new(self.loops.iter()
            .map(|ring| LineString::new(ring.iter().map(|&v| Coord::from(v)).collect()))
            .collect())
    }
}

impl From<&GeoPolygon<f64>> for VertexList {
    fn from(polygon: &GeoPolygon<f64>) -> Self {
        let mut list = VertexList::new();
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            let vertices = ring.coords().map(|&c| LatLon::from(c)).collect::<Vec<_>>();
            if !vertices.is_empty() { list.push_loop(vertices) }
        }
        list
    }
}

impl From<&MultiPolygon<f64>> for VertexList {
    fn from(polygons: &MultiPolygon<f64>) -> Self {
        VertexList::from_loops(polygons.iter()
            .flat_map(|polygon| VertexList::from(polygon).into_loops())
            .collect())
    }
}
